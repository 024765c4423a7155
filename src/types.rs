//! Core types for the guided TRIZ research protocol
//!
//! A session walks a problem through 60 ordered research steps grouped into
//! 6 phases. Every mutation persists the whole session document, so any
//! snapshot is sufficient to resume after a crash or context loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Total number of research steps in the protocol
pub const TOTAL_STEPS: u32 = 60;

/// The six methodological phases, each covering a contiguous step range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Steps 1-10: 9 Boxes context mapping and Ideality audit
    UnderstandScope,
    /// Steps 11-16: Ideal Outcome and resource analysis
    DefineIdeal,
    /// Steps 17-26: function mapping and contradiction identification
    FunctionAnalysis,
    /// Steps 27-32: matching problems to TRIZ tools
    SelectTools,
    /// Steps 33-50: applying principles and synthesizing solution concepts
    GenerateSolutions,
    /// Steps 51-60: Ideality ranking and implementation planning
    RankImplement,
}

impl Phase {
    /// Phase for a given step number (valid range 1..=60)
    pub fn for_step(step: u32) -> Phase {
        match step {
            1..=10 => Phase::UnderstandScope,
            11..=16 => Phase::DefineIdeal,
            17..=26 => Phase::FunctionAnalysis,
            27..=32 => Phase::SelectTools,
            33..=50 => Phase::GenerateSolutions,
            _ => Phase::RankImplement,
        }
    }

    /// Inclusive step range covered by this phase
    pub fn step_range(&self) -> (u32, u32) {
        match self {
            Phase::UnderstandScope => (1, 10),
            Phase::DefineIdeal => (11, 16),
            Phase::FunctionAnalysis => (17, 26),
            Phase::SelectTools => (27, 32),
            Phase::GenerateSolutions => (33, 50),
            Phase::RankImplement => (51, 60),
        }
    }

    /// Number of steps in this phase
    pub fn step_count(&self) -> u32 {
        let (lo, hi) = self.step_range();
        hi - lo + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::UnderstandScope => "UNDERSTAND_SCOPE",
            Phase::DefineIdeal => "DEFINE_IDEAL",
            Phase::FunctionAnalysis => "FUNCTION_ANALYSIS",
            Phase::SelectTools => "SELECT_TOOLS",
            Phase::GenerateSolutions => "GENERATE_SOLUTIONS",
            Phase::RankImplement => "RANK_IMPLEMENT",
        }
    }

    /// All phases in protocol order
    pub fn all() -> [Phase; 6] {
        [
            Phase::UnderstandScope,
            Phase::DefineIdeal,
            Phase::FunctionAnalysis,
            Phase::SelectTools,
            Phase::GenerateSolutions,
            Phase::RankImplement,
        ]
    }
}

/// Lifecycle state of a single step
///
/// Legal transitions: Pending -> AwaitingResearch -> Validated. A step never
/// regresses. Skipped is reserved for forward compatibility and never
/// assigned by the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    AwaitingResearch,
    Validated,
    Skipped,
}

/// A generated research instruction for one step
///
/// Produced by an [`InstructionProvider`](crate::steps::InstructionProvider);
/// deterministic for identical (step, problem, knowledge) inputs so resumed
/// sessions reproduce the same content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instruction {
    pub title: String,
    pub task: String,
    pub search_queries: Vec<String>,
    /// Field names the submitted findings must contain
    pub required_fields: Vec<String>,
    pub validation_criteria: String,
    /// Example JSON shape the findings should follow
    pub expected_output_shape: String,
    /// Why this step matters in the methodology
    pub rationale: String,
    /// (field, alias) pairs: on validation, the named finding is also
    /// written into accumulated knowledge under the alias
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub knowledge_aliases: Vec<(String, String)>,
}

/// One of the 60 fixed step slots in a session
///
/// The instruction content is not persisted; it is regenerated from the
/// provider on load, which keeps the session document compact and stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_number: u32,
    pub phase: Phase,
    pub title: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<String>,
}

/// One complete run of the 60-step protocol for a single problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub problem: String,
    /// Lowest-numbered step not yet validated; advances strictly by +1
    pub current_step: u32,
    /// Findings keyed by `step_<n>` plus provider-declared aliases
    pub accumulated_knowledge: Map<String, Value>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub steps: Vec<Step>,
}

impl Session {
    /// Step record at the given step number
    pub fn step(&self, step_number: u32) -> Option<&Step> {
        self.steps.get(step_number as usize - 1)
    }

    pub fn step_mut(&mut self, step_number: u32) -> Option<&mut Step> {
        self.steps.get_mut(step_number as usize - 1)
    }

    /// Count of validated steps in each phase, in protocol order
    pub fn phase_summary(&self) -> Vec<PhaseSummary> {
        Phase::all()
            .iter()
            .map(|phase| {
                let validated = self
                    .steps
                    .iter()
                    .filter(|s| s.phase == *phase && s.status == StepStatus::Validated)
                    .count() as u32;
                PhaseSummary {
                    phase: *phase,
                    validated,
                    total: phase.step_count(),
                }
            })
            .collect()
    }
}

/// Validated-step count for one phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub validated: u32,
    pub total: u32,
}

/// Result of starting a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResult {
    pub session_id: String,
    pub total_steps: u32,
    pub current_step: u32,
    pub phase: Phase,
    pub instruction: Instruction,
}

/// Outcome of submitting findings for the current step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitResult {
    /// Findings failed structural validation; the same instruction is
    /// re-served and the session is unchanged
    Rejected {
        step: u32,
        error: String,
        hint: String,
        instruction: Instruction,
    },
    /// Step validated and the session advanced to the next step
    Progressed {
        completed_step: u32,
        message: String,
        next_step: u32,
        phase: Phase,
        instruction: Instruction,
        progress_fraction: f64,
    },
    /// Step 60 validated; the session is complete
    Completed {
        total_steps: u32,
        final_deliverable: Value,
        summary: Vec<PhaseSummary>,
    },
}

/// Resume view of a session's current position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentView {
    pub session_id: String,
    pub problem: String,
    pub current_step: u32,
    pub total_steps: u32,
    pub phase: Phase,
    pub completed: bool,
    pub progress_fraction: f64,
    /// Regenerated instruction for the current step; absent once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_table_boundaries() {
        assert_eq!(Phase::for_step(1), Phase::UnderstandScope);
        assert_eq!(Phase::for_step(10), Phase::UnderstandScope);
        assert_eq!(Phase::for_step(11), Phase::DefineIdeal);
        assert_eq!(Phase::for_step(16), Phase::DefineIdeal);
        assert_eq!(Phase::for_step(17), Phase::FunctionAnalysis);
        assert_eq!(Phase::for_step(26), Phase::FunctionAnalysis);
        assert_eq!(Phase::for_step(27), Phase::SelectTools);
        assert_eq!(Phase::for_step(32), Phase::SelectTools);
        assert_eq!(Phase::for_step(33), Phase::GenerateSolutions);
        assert_eq!(Phase::for_step(50), Phase::GenerateSolutions);
        assert_eq!(Phase::for_step(51), Phase::RankImplement);
        assert_eq!(Phase::for_step(60), Phase::RankImplement);
    }

    #[test]
    fn phase_counts_sum_to_total() {
        let sum: u32 = Phase::all().iter().map(|p| p.step_count()).sum();
        assert_eq!(sum, TOTAL_STEPS);
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&Phase::UnderstandScope).unwrap();
        assert_eq!(json, "\"understand_scope\"");
        let json = serde_json::to_string(&StepStatus::AwaitingResearch).unwrap();
        assert_eq!(json, "\"awaiting_research\"");
    }
}
