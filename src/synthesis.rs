//! Final deliverable assembly
//!
//! Step 60's findings carry the researcher-written synthesis; this module
//! wraps them into the final report together with a methodology trace built
//! from the session itself. Total over any session shape: a sparse or
//! damaged document still yields a well-formed report with placeholder text
//! rather than an error.

use serde_json::{json, Value};

use crate::types::{Session, StepStatus};

/// Build the final deliverable for a completed session
pub fn synthesize(session: &Session) -> Value {
    let report = session.accumulated_knowledge.get("step_60");
    let field = |name: &str, default: Value| -> Value {
        report
            .and_then(|r| r.get(name))
            .cloned()
            .unwrap_or(default)
    };

    let validated = session
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Validated)
        .count();

    let methodology_trace: Vec<Value> = session
        .phase_summary()
        .iter()
        .map(|p| {
            let evidence_steps: Vec<u32> = session
                .steps
                .iter()
                .filter(|s| s.phase == p.phase && s.status == StepStatus::Validated)
                .map(|s| s.step_number)
                .collect();
            json!({
                "phase": p.phase.name(),
                "steps_validated": p.validated,
                "steps_total": p.total,
                "evidence_steps": evidence_steps,
            })
        })
        .collect();

    json!({
        "session_id": session.session_id,
        "problem": session.problem,
        "executive_summary": field(
            "executive_summary",
            json!("Synthesis not provided; see accumulated research steps."),
        ),
        "triz_methodology_applied": field(
            "triz_methodology_applied",
            json!([
                "9 Boxes", "Ideality audit", "Function Analysis",
                "Contradiction Matrix", "Standard Solutions", "Effects Database"
            ]),
        ),
        "recommended_solution_details": field("recommended_solution_details", json!({})),
        "supporting_evidence": field("supporting_evidence", json!([])),
        "implementation_roadmap": field("implementation_roadmap", json!("")),
        "future_triz_iterations": field("future_triz_iterations", json!([])),
        "conclusion": field(
            "conclusion",
            json!(format!(
                "Guided TRIZ protocol completed for: {}",
                session.problem
            )),
        ),
        "methodology_trace": methodology_trace,
        "steps_validated": validated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Phase, Step, TOTAL_STEPS};
    use chrono::Utc;

    fn session_with_validated(validated_through: u32) -> Session {
        let now = Utc::now();
        let steps = (1..=TOTAL_STEPS)
            .map(|n| Step {
                step_number: n,
                phase: Phase::for_step(n),
                title: format!("Step {}", n),
                status: if n <= validated_through {
                    StepStatus::Validated
                } else {
                    StepStatus::Pending
                },
                findings: None,
                validation_result: None,
            })
            .collect();
        Session {
            session_id: "ab12cd34".to_string(),
            problem: "Reduce vibration without increasing mass".to_string(),
            current_step: validated_through.clamp(1, TOTAL_STEPS),
            accumulated_knowledge: serde_json::Map::new(),
            completed: validated_through == TOTAL_STEPS,
            created_at: now,
            updated_at: now,
            steps,
        }
    }

    #[test]
    fn sparse_session_gets_placeholder_report() {
        let session = session_with_validated(0);
        let report = synthesize(&session);
        assert_eq!(report["problem"], "Reduce vibration without increasing mass");
        assert!(report["executive_summary"]
            .as_str()
            .unwrap()
            .contains("not provided"));
        assert_eq!(report["steps_validated"], 0);
        assert_eq!(report["methodology_trace"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn step_60_findings_flow_through() {
        let mut session = session_with_validated(TOTAL_STEPS);
        session.accumulated_knowledge.insert(
            "step_60".to_string(),
            json!({
                "executive_summary": "Replace aluminum with segmented magnesium panels.",
                "recommended_solution_details": {"solution": "Modular Magnesium Segments"},
                "supporting_evidence": [{"claim": "35% lighter", "source_step": 49}],
                "conclusion": "Implement with warm forming."
            }),
        );
        let report = synthesize(&session);
        assert_eq!(
            report["executive_summary"],
            "Replace aluminum with segmented magnesium panels."
        );
        assert_eq!(
            report["recommended_solution_details"]["solution"],
            "Modular Magnesium Segments"
        );
        assert_eq!(report["conclusion"], "Implement with warm forming.");
        assert_eq!(report["steps_validated"], 60);
    }

    #[test]
    fn methodology_trace_counts_per_phase() {
        let session = session_with_validated(16);
        let report = synthesize(&session);
        let trace = report["methodology_trace"].as_array().unwrap();
        assert_eq!(trace[0]["phase"], "UNDERSTAND_SCOPE");
        assert_eq!(trace[0]["steps_validated"], 10);
        assert_eq!(trace[1]["steps_validated"], 6);
        assert_eq!(trace[2]["steps_validated"], 0);
        assert_eq!(trace[1]["evidence_steps"], json!([11, 12, 13, 14, 15, 16]));
    }
}
