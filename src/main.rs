//! Guided TRIZ MCP server
//!
//! Walks engineering problems through a 60-step TRIZ research protocol.
//!
//! Run with: cargo run -- start "your problem"
//! Or via MCP: add to your claude_desktop_config.json

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use triz_mcp::{engine::GuidedEngine, mcp, steps::TrizProtocol, store::SqliteStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--tools" => {
                // Output MCP tool definitions as JSON
                let tools = mcp::get_tools();
                println!("{}", serde_json::to_string_pretty(&tools)?);
                return Ok(());
            }
            "start" => {
                let problem: String = args[2..]
                    .iter()
                    .filter(|a| !a.starts_with("--"))
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" ");
                return run_start(&problem, &args);
            }
            "submit" => {
                let session_id = args.get(2).context("Usage: submit <session_id> <findings-json | @file>")?;
                let findings = args.get(3).context("Usage: submit <session_id> <findings-json | @file>")?;
                return run_submit(session_id, findings, &args);
            }
            "status" => {
                let session_id = args.get(2).context("Usage: status <session_id>")?;
                return run_status(session_id, &args);
            }
            "--list" => {
                return run_list(&args);
            }
            "--serve" => {
                // HTTP server mode for agent integration
                let port: u16 = args
                    .iter()
                    .find(|a| a.starts_with("--port="))
                    .and_then(|a| a.strip_prefix("--port=").and_then(|p| p.parse().ok()))
                    .unwrap_or(3200);
                return run_http_server(port, &args);
            }
            _ => {}
        }
    }

    print_usage();
    Ok(())
}

fn print_usage() {
    println!("triz - guided 60-step TRIZ research protocol");
    println!();
    println!("Usage:");
    println!("  triz start <problem>                      Start a new guided session");
    println!("  triz submit <session_id> <json | @file>   Submit findings for the current step");
    println!("  triz status <session_id>                  Show session position and next instruction");
    println!("  triz --list                               List recent sessions");
    println!("  triz --serve [--port=N]                   JSON-RPC server mode (default port 3200)");
    println!("  triz --tools                              Print MCP tool definitions");
    println!();
    println!("  --db=PATH overrides the default database location for any command");
}

fn run_start(problem: &str, args: &[String]) -> Result<()> {
    let store = open_store(args)?;
    let engine = GuidedEngine::new(TrizProtocol, store);
    let started = engine.start(problem)?;
    println!("{}", serde_json::to_string_pretty(&started)?);
    Ok(())
}

fn run_submit(session_id: &str, findings_arg: &str, args: &[String]) -> Result<()> {
    let raw = match findings_arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read findings file {}", path))?,
        None => findings_arg.to_string(),
    };
    let findings = match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => map,
        _ => bail!("findings must be a JSON object"),
    };

    let store = open_store(args)?;
    let engine = GuidedEngine::new(TrizProtocol, store);
    let result = engine.submit(session_id, &findings)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_status(session_id: &str, args: &[String]) -> Result<()> {
    let store = open_store(args)?;
    let engine = GuidedEngine::new(TrizProtocol, store);
    let view = engine.current(session_id)?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn run_list(args: &[String]) -> Result<()> {
    let store = open_store(args)?;
    let sessions = store.list(20)?;
    if sessions.is_empty() {
        println!("No sessions yet. Start one with: triz start <problem>");
        return Ok(());
    }
    for (id, problem, completed) in sessions {
        let marker = if completed { "done" } else { "open" };
        println!("{}  [{}]  {}", id, marker, problem);
    }
    Ok(())
}

/// HTTP server mode for agent integration
fn run_http_server(port: u16, args: &[String]) -> Result<()> {
    use std::net::TcpListener;

    let db_path = resolve_db_path(args)?;
    eprintln!("🚀 TRIZ MCP Server starting on port {}...", port);

    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))?;
    eprintln!("✅ Listening on http://localhost:{}/mcp", port);

    for stream in listener.incoming() {
        let stream = stream?;
        let db_path = db_path.clone();

        // Handle each connection; each opens its own connection to the db
        std::thread::spawn(move || {
            if let Err(e) = handle_http_request(stream, &db_path) {
                eprintln!("Request error: {}", e);
            }
        });
    }

    Ok(())
}

fn handle_http_request(mut stream: std::net::TcpStream, db_path: &Path) -> Result<()> {
    use std::io::{BufRead, BufReader, Write};

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Read headers
    let mut content_length: usize = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        if header.trim().is_empty() {
            break;
        }
        if header.to_lowercase().starts_with("content-length:") {
            content_length = header
                .split(':')
                .nth(1)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0);
        }
    }

    // Read body
    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        std::io::Read::read_exact(&mut reader, &mut body)?;
    }

    // Parse JSON-RPC request
    let body_str = String::from_utf8_lossy(&body);
    let json_req: Value = serde_json::from_str(&body_str).unwrap_or(json!({}));

    let method = json_req.get("method").and_then(|m| m.as_str()).unwrap_or("");
    let params = json_req.get("params").cloned().unwrap_or(json!({}));
    let id = json_req.get("id").cloned().unwrap_or(json!(1));

    let result = dispatch(db_path, method, &params);

    let response_body = match result {
        Ok(r) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": r
        }),
        Err(e) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32000, "message": e.to_string()}
        }),
    };

    let response_str = serde_json::to_string(&response_body)?;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\n\r\n{}",
        response_str.len(),
        response_str
    );

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok(())
}

fn dispatch(db_path: &Path, method: &str, params: &Value) -> Result<Value> {
    match method {
        "tools/list" => Ok(json!({"tools": mcp::get_tools()})),
        "tools/call" => {
            let store = SqliteStore::open(db_path)?;
            let engine = GuidedEngine::new(TrizProtocol, store);
            let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
            match tool_name {
                "triz_start_guided" => mcp::handle_start_tool(&engine, params),
                "triz_submit_research" => mcp::handle_submit_tool(&engine, params),
                "triz_session_status" => mcp::handle_status_tool(&engine, params),
                _ => Ok(json!({"error": format!("Unknown tool: {}", tool_name)})),
            }
        }
        _ => Ok(json!({"error": format!("Unknown method: {}", method)})),
    }
}

fn open_store(args: &[String]) -> Result<SqliteStore> {
    SqliteStore::open(&resolve_db_path(args)?)
}

fn resolve_db_path(args: &[String]) -> Result<PathBuf> {
    if let Some(path) = args
        .iter()
        .find(|a| a.starts_with("--db="))
        .and_then(|a| a.strip_prefix("--db="))
    {
        return Ok(PathBuf::from(path));
    }
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir.join("sessions.db"))
}

fn get_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base.join("triz-mcp"))
}
