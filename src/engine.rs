//! The guided protocol engine
//!
//! Drives a session through the 60 steps: serves one instruction at a time,
//! validates submitted findings, accumulates knowledge for later steps, and
//! persists the full session document after every accepted mutation. A
//! rejected submission mutates nothing; a provider or storage failure aborts
//! the call before anything is persisted, so the stored document always
//! reflects a consistent position.

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::steps::{step_title, InstructionProvider};
use crate::store::SessionStore;
use crate::synthesis;
use crate::types::{
    CurrentView, Instruction, Phase, Session, StartResult, Step, StepStatus, SubmitResult,
    TOTAL_STEPS,
};
use crate::validator::{self, Validation};

pub struct GuidedEngine<P, S> {
    provider: P,
    store: S,
}

impl<P: InstructionProvider, S: SessionStore> GuidedEngine<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    /// Start a new session and serve the instruction for step 1
    pub fn start(&self, problem: &str) -> EngineResult<StartResult> {
        let problem = problem.trim();
        if problem.is_empty() {
            return Err(EngineError::EmptyProblem);
        }

        let session_id: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect();

        let instruction = self.instruction_for(1, problem, &Map::new())?;

        let now = Utc::now();
        let steps = (1..=TOTAL_STEPS)
            .map(|n| Step {
                step_number: n,
                phase: Phase::for_step(n),
                title: step_title(n).to_string(),
                status: if n == 1 {
                    StepStatus::AwaitingResearch
                } else {
                    StepStatus::Pending
                },
                findings: None,
                validation_result: None,
            })
            .collect();

        let session = Session {
            session_id: session_id.clone(),
            problem: problem.to_string(),
            current_step: 1,
            accumulated_knowledge: Map::new(),
            completed: false,
            created_at: now,
            updated_at: now,
            steps,
        };
        self.store.save(&session).map_err(EngineError::Storage)?;

        tracing::info!(session_id = %session_id, "Started guided session");
        Ok(StartResult {
            session_id,
            total_steps: TOTAL_STEPS,
            current_step: 1,
            phase: Phase::for_step(1),
            instruction,
        })
    }

    /// Submit research findings for the session's current step
    pub fn submit(
        &self,
        session_id: &str,
        findings: &Map<String, Value>,
    ) -> EngineResult<SubmitResult> {
        let mut session = self.load(session_id)?;
        if session.completed {
            return Err(EngineError::SessionCompleted(session_id.to_string()));
        }

        let step = session.current_step;
        let instruction =
            self.instruction_for(step, &session.problem, &session.accumulated_knowledge)?;

        let message = match validator::validate(&instruction, findings) {
            Validation::Invalid { error, hint } => {
                tracing::warn!(session_id = %session_id, step, %error, "Findings rejected");
                return Ok(SubmitResult::Rejected {
                    step,
                    error,
                    hint,
                    instruction,
                });
            }
            Validation::Valid { message } => message,
        };

        {
            // Step slot always exists for 1..=60; a miss means a corrupt document
            let record = session.step_mut(step).ok_or_else(|| {
                EngineError::Storage(anyhow::anyhow!(
                    "session {} has no step slot {}",
                    session_id,
                    step
                ))
            })?;
            record.status = StepStatus::Validated;
            record.findings = Some(findings.clone());
            record.validation_result = Some(message.clone());
        }
        session
            .accumulated_knowledge
            .insert(format!("step_{}", step), Value::Object(findings.clone()));
        for (field, alias) in &instruction.knowledge_aliases {
            if let Some(key) = validator::find_key(findings, field) {
                let value = findings[key].clone();
                session.accumulated_knowledge.insert(alias.clone(), value);
            }
        }
        session.updated_at = Utc::now();

        if step == TOTAL_STEPS {
            session.completed = true;
            let final_deliverable = synthesis::synthesize(&session);
            let summary = session.phase_summary();
            self.store.save(&session).map_err(EngineError::Storage)?;
            tracing::info!(session_id = %session_id, "Session completed all 60 steps");
            return Ok(SubmitResult::Completed {
                total_steps: TOTAL_STEPS,
                final_deliverable,
                summary,
            });
        }

        let next_step = step + 1;
        let next_instruction =
            self.instruction_for(next_step, &session.problem, &session.accumulated_knowledge)?;
        session.current_step = next_step;
        if let Some(record) = session.step_mut(next_step) {
            record.status = StepStatus::AwaitingResearch;
        }
        self.store.save(&session).map_err(EngineError::Storage)?;

        tracing::debug!(session_id = %session_id, completed = step, next = next_step, "Step validated");
        Ok(SubmitResult::Progressed {
            completed_step: step,
            message,
            next_step,
            phase: Phase::for_step(next_step),
            instruction: next_instruction,
            progress_fraction: next_step as f64 / TOTAL_STEPS as f64,
        })
    }

    /// Resume view: where the session stands and what to research next
    pub fn current(&self, session_id: &str) -> EngineResult<CurrentView> {
        let session = self.load(session_id)?;

        let (instruction, progress_fraction) = if session.completed {
            (None, 1.0)
        } else {
            let instruction = self.instruction_for(
                session.current_step,
                &session.problem,
                &session.accumulated_knowledge,
            )?;
            (
                Some(instruction),
                session.current_step as f64 / TOTAL_STEPS as f64,
            )
        };

        Ok(CurrentView {
            session_id: session.session_id,
            problem: session.problem,
            current_step: session.current_step,
            total_steps: TOTAL_STEPS,
            phase: Phase::for_step(session.current_step),
            completed: session.completed,
            progress_fraction,
            instruction,
        })
    }

    fn load(&self, session_id: &str) -> EngineResult<Session> {
        self.store
            .load(session_id)
            .map_err(EngineError::Storage)?
            .ok_or_else(|| EngineError::SessionNotFound(session_id.to_string()))
    }

    fn instruction_for(
        &self,
        step: u32,
        problem: &str,
        knowledge: &Map<String, Value>,
    ) -> EngineResult<Instruction> {
        self.provider
            .generate(step, problem, knowledge)
            .map_err(|source| EngineError::Provider { step, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::TrizProtocol;
    use crate::store::SqliteStore;
    use serde_json::json;

    const PROBLEM: &str = "Reduce robot chassis weight while keeping formability";

    fn setup_engine(store: &SqliteStore) -> GuidedEngine<TrizProtocol, &SqliteStore> {
        GuidedEngine::new(TrizProtocol, store)
    }

    /// Findings that satisfy any instruction's structural validation
    fn passing_findings(instruction: &Instruction) -> Map<String, Value> {
        instruction
            .required_fields
            .iter()
            .map(|f| {
                (
                    f.clone(),
                    json!(format!("substantive research finding for {}", f)),
                )
            })
            .collect()
    }

    fn drive_to_completion(
        engine: &GuidedEngine<TrizProtocol, &SqliteStore>,
        session_id: &str,
        mut instruction: Instruction,
    ) -> SubmitResult {
        loop {
            let findings = passing_findings(&instruction);
            match engine.submit(session_id, &findings).unwrap() {
                SubmitResult::Progressed { instruction: next, .. } => instruction = next,
                done @ SubmitResult::Completed { .. } => return done,
                SubmitResult::Rejected { step, error, .. } => {
                    panic!("step {} unexpectedly rejected: {}", step, error)
                }
            }
        }
    }

    #[test]
    fn start_serves_step_one() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();

        assert_eq!(started.session_id.len(), 8);
        assert_eq!(started.current_step, 1);
        assert_eq!(started.total_steps, 60);
        assert_eq!(started.phase, Phase::UnderstandScope);
        assert_eq!(started.instruction.title, "Create 9 Boxes context map");
    }

    #[test]
    fn rejects_empty_problem() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        assert!(matches!(engine.start("   "), Err(EngineError::EmptyProblem)));
    }

    #[test]
    fn unknown_session_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        assert!(matches!(
            engine.current("no-such-id"),
            Err(EngineError::SessionNotFound(_))
        ));
        assert!(matches!(
            engine.submit("no-such-id", &Map::new()),
            Err(EngineError::SessionNotFound(_))
        ));
    }

    #[test]
    fn rejection_leaves_session_unchanged() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();

        let result = engine.submit(&started.session_id, &Map::new()).unwrap();
        match result {
            SubmitResult::Rejected { step, error, instruction, .. } => {
                assert_eq!(step, 1);
                assert!(error.contains("Missing required fields"));
                assert_eq!(instruction, started.instruction);
            }
            other => panic!("expected rejection, got {:?}", other),
        }

        let view = engine.current(&started.session_id).unwrap();
        assert_eq!(view.current_step, 1);
        assert!((view.progress_fraction - 1.0 / 60.0).abs() < 1e-9);

        let session = store.load(&started.session_id).unwrap().unwrap();
        assert!(session.accumulated_knowledge.is_empty());
        assert_eq!(session.steps[0].status, StepStatus::AwaitingResearch);
    }

    #[test]
    fn progression_accumulates_knowledge_and_advances() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();

        let findings = passing_findings(&started.instruction);
        let result = engine.submit(&started.session_id, &findings).unwrap();
        match result {
            SubmitResult::Progressed {
                completed_step,
                next_step,
                phase,
                progress_fraction,
                ref message,
                ..
            } => {
                assert_eq!(completed_step, 1);
                assert_eq!(next_step, 2);
                assert_eq!(phase, Phase::UnderstandScope);
                assert!((progress_fraction - 2.0 / 60.0).abs() < 1e-9);
                assert!(message.contains("validated successfully"));
            }
            other => panic!("expected progression, got {:?}", other),
        }

        let session = store.load(&started.session_id).unwrap().unwrap();
        assert_eq!(session.current_step, 2);
        assert_eq!(session.steps[0].status, StepStatus::Validated);
        assert_eq!(session.steps[1].status, StepStatus::AwaitingResearch);
        assert!(session.accumulated_knowledge.contains_key("step_1"));
    }

    #[test]
    fn resume_serves_identical_instruction() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();

        let a = engine.current(&started.session_id).unwrap();
        let b = engine.current(&started.session_id).unwrap();
        assert_eq!(a.instruction, b.instruction);
        assert_eq!(a.instruction.unwrap(), started.instruction);
    }

    #[test]
    fn full_run_completes_with_phase_summary() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();
        let session_id = started.session_id.clone();

        let done = drive_to_completion(&engine, &session_id, started.instruction);
        match done {
            SubmitResult::Completed {
                total_steps,
                final_deliverable,
                summary,
            } => {
                assert_eq!(total_steps, 60);
                assert_eq!(final_deliverable["problem"], PROBLEM);
                assert_eq!(final_deliverable["steps_validated"], 60);
                let counts: Vec<u32> = summary.iter().map(|p| p.validated).collect();
                assert_eq!(counts, vec![10, 6, 10, 6, 18, 10]);
                assert!(summary.iter().all(|p| p.validated == p.total));
            }
            other => panic!("expected completion, got {:?}", other),
        }

        let view = engine.current(&session_id).unwrap();
        assert!(view.completed);
        assert_eq!(view.progress_fraction, 1.0);
        assert!(view.instruction.is_none());
    }

    #[test]
    fn completed_session_refuses_further_submissions() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();
        let session_id = started.session_id.clone();
        drive_to_completion(&engine, &session_id, started.instruction);

        assert!(matches!(
            engine.submit(&session_id, &Map::new()),
            Err(EngineError::SessionCompleted(_))
        ));
    }

    #[test]
    fn provider_aliases_populate_accumulated_knowledge() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = setup_engine(&store);
        let started = engine.start(PROBLEM).unwrap();
        let session_id = started.session_id.clone();
        drive_to_completion(&engine, &session_id, started.instruction);

        let session = store.load(&session_id).unwrap().unwrap();
        let knowledge = &session.accumulated_knowledge;
        // Declared by steps 29, 50, and 57 respectively
        assert_eq!(
            knowledge["principles_to_apply"],
            knowledge["step_29"]["recommended_principles"]
        );
        assert_eq!(
            knowledge["candidate_solutions"],
            knowledge["step_50"]["complete_solutions"]
        );
        assert_eq!(
            knowledge["final_selection"],
            knowledge["step_57"]["selected_solutions"]
        );
    }
}
