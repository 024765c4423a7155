//! Session persistence
//!
//! Uses SQLite - single file, zero network dependencies, works offline.
//! Each save writes the entire session document as one row, so any reader
//! gets a complete, independently resumable snapshot. The row upsert runs
//! inside SQLite's transaction machinery, so a crash mid-write never leaves
//! a partial document.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::types::Session;

/// Durable key-value persistence of session documents
///
/// Implementations must treat `save` as an idempotent full overwrite and
/// `load` as returning the latest complete snapshot, or `None` when the id
/// is unknown.
pub trait SessionStore {
    fn save(&self, session: &Session) -> Result<()>;
    fn load(&self, session_id: &str) -> Result<Option<Session>>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn save(&self, session: &Session) -> Result<()> {
        (**self).save(session)
    }

    fn load(&self, session_id: &str) -> Result<Option<Session>> {
        (**self).load(session_id)
    }
}

/// SQLite-backed session store
pub struct SqliteStore {
    conn: Connection,
}

const SCHEMA: &str = r#"
-- Sessions: one full JSON document per research session
CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    problem TEXT NOT NULL,
    current_step INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    document TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions(updated_at);
"#;

impl SqliteStore {
    /// Open (or create) the store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open session database at {:?}", path))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests and one-shot tooling
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Session ids with their problem statements, most recently updated first
    pub fn list(&self, limit: usize) -> Result<Vec<(String, String, bool)>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, problem, completed FROM sessions
             ORDER BY updated_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)? != 0,
            ))
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

impl SessionStore for SqliteStore {
    fn save(&self, session: &Session) -> Result<()> {
        let document = serde_json::to_string(session)
            .with_context(|| format!("Failed to serialize session {}", session.session_id))?;
        self.conn
            .execute(
                "INSERT INTO sessions
                     (session_id, problem, current_step, completed, document, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(session_id) DO UPDATE SET
                     current_step = excluded.current_step,
                     completed = excluded.completed,
                     document = excluded.document,
                     updated_at = excluded.updated_at",
                params![
                    session.session_id,
                    session.problem,
                    session.current_step,
                    session.completed as i64,
                    document,
                    session.created_at.to_rfc3339(),
                    session.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to persist session {}", session.session_id))?;
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<Session>> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(doc) => {
                let session = serde_json::from_str(&doc)
                    .with_context(|| format!("Corrupt session document for {}", session_id))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Phase, Step, StepStatus, TOTAL_STEPS};
    use chrono::Utc;
    use serde_json::json;

    fn setup_test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("sessions.db")).unwrap();
        (store, dir)
    }

    fn sample_session(id: &str) -> Session {
        let now = Utc::now();
        let steps = (1..=TOTAL_STEPS)
            .map(|n| Step {
                step_number: n,
                phase: Phase::for_step(n),
                title: format!("Step {}", n),
                status: if n == 1 {
                    StepStatus::AwaitingResearch
                } else {
                    StepStatus::Pending
                },
                findings: None,
                validation_result: None,
            })
            .collect();
        Session {
            session_id: id.to_string(),
            problem: "Reduce vibration without increasing mass".to_string(),
            current_step: 1,
            accumulated_knowledge: serde_json::Map::new(),
            completed: false,
            created_at: now,
            updated_at: now,
            steps,
        }
    }

    #[test]
    fn round_trips_full_session() {
        let (store, _dir) = setup_test_store();
        let mut session = sample_session("ab12cd34");
        session
            .accumulated_knowledge
            .insert("step_1".to_string(), json!({"components": ["frame"]}));

        store.save(&session).unwrap();
        let loaded = store.load("ab12cd34").unwrap().unwrap();

        assert_eq!(loaded.session_id, session.session_id);
        assert_eq!(loaded.problem, session.problem);
        assert_eq!(loaded.current_step, 1);
        assert_eq!(loaded.steps.len(), 60);
        assert_eq!(loaded.steps[0].status, StepStatus::AwaitingResearch);
        assert_eq!(
            loaded.accumulated_knowledge["step_1"],
            json!({"components": ["frame"]})
        );
    }

    #[test]
    fn save_overwrites_existing_document() {
        let (store, _dir) = setup_test_store();
        let mut session = sample_session("ab12cd34");
        store.save(&session).unwrap();

        session.current_step = 5;
        session.step_mut(1).unwrap().status = StepStatus::Validated;
        store.save(&session).unwrap();

        let loaded = store.load("ab12cd34").unwrap().unwrap();
        assert_eq!(loaded.current_step, 5);
        assert_eq!(loaded.steps[0].status, StepStatus::Validated);
    }

    #[test]
    fn load_missing_returns_none() {
        let (store, _dir) = setup_test_store();
        assert!(store.load("no-such-id").unwrap().is_none());
    }

    #[test]
    fn list_orders_by_recency() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut a = sample_session("aaaa1111");
        let mut b = sample_session("bbbb2222");
        a.updated_at = Utc::now() - chrono::Duration::hours(1);
        b.updated_at = Utc::now();
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        let listed = store.list(10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].0, "bbbb2222");
    }
}
