//! The built-in instruction provider for the 60-step TRIZ protocol
//!
//! Each phase module carries the concrete research instructions for its step
//! range. Generation is a pure function of (step, problem, accumulated
//! knowledge): identical inputs always produce identical instructions, which
//! is what makes resumed sessions reproducible.

use anyhow::{bail, Result};
use serde_json::{Map, Value};

use crate::types::{Instruction, Phase, TOTAL_STEPS};

pub mod define_ideal;
pub mod function_analysis;
pub mod generate_solutions;
pub mod rank_implement;
pub mod select_tools;
pub mod understand_scope;

/// Supplies the research instruction for each step
///
/// Must be total over 1..=60 and deterministic for identical inputs.
pub trait InstructionProvider {
    fn generate(
        &self,
        step: u32,
        problem: &str,
        knowledge: &Map<String, Value>,
    ) -> Result<Instruction>;
}

/// The full 60-step TRIZ research protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct TrizProtocol;

impl InstructionProvider for TrizProtocol {
    fn generate(
        &self,
        step: u32,
        problem: &str,
        knowledge: &Map<String, Value>,
    ) -> Result<Instruction> {
        if !(1..=TOTAL_STEPS).contains(&step) {
            bail!("step number {} out of range 1..=60", step);
        }
        let instruction = match Phase::for_step(step) {
            Phase::UnderstandScope => understand_scope::generate(step, problem),
            Phase::DefineIdeal => define_ideal::generate(step, problem),
            Phase::FunctionAnalysis => function_analysis::generate(step, problem),
            Phase::SelectTools => select_tools::generate(step, problem, knowledge),
            Phase::GenerateSolutions => generate_solutions::generate(step, problem, knowledge),
            Phase::RankImplement => rank_implement::generate(step, problem, knowledge),
        };
        Ok(instruction)
    }
}

/// Fixed title for each of the 60 steps
pub fn step_title(step: u32) -> &'static str {
    const TITLES: [&str; 60] = [
        // Phase 1: Understand & Scope
        "Create 9 Boxes context map",
        "Research Sub-System components",
        "Research Super-System environment",
        "Analyze Past evolution",
        "Analyze Future trends",
        "Identify all current Benefits",
        "Identify all current Costs",
        "Identify all current Harms",
        "Calculate current Ideality score",
        "Identify root causes from 9 Boxes",
        // Phase 2: Define Ideal
        "Create Ideal Outcome wish list",
        "Research ideal systems in other domains",
        "Identify Resources (Substance, Field, Space, Time, Information)",
        "Research resource utilization examples",
        "Define Ideal System in 9 Boxes",
        "Calculate Ideal Ideality target",
        // Phase 3: Function Analysis
        "Map all Subject-Action-Object relationships",
        "Categorize: Useful functions",
        "Categorize: Insufficient functions",
        "Categorize: Excessive functions",
        "Categorize: Harmful functions",
        "Research harm elimination examples",
        "Identify Technical Contradictions",
        "Identify Physical Contradictions",
        "Research contradiction resolution examples",
        "Prioritize problems to solve",
        // Phase 4: Select Tools
        "Match problems to TRIZ tool categories",
        "Map contradictions to 39 Parameters",
        "Lookup Contradiction Matrix",
        "Identify Standard Solutions for harms",
        "Search Effects Database for functions",
        "Research Evolution Trends",
        // Phase 5: Generate Solutions
        "Deep research Principle #1",
        "Find examples of Principle #1",
        "Extract sub-principles of Principle #1",
        "Apply Principle #1 to problem",
        "Deep research Principle #2",
        "Find examples of Principle #2",
        "Extract sub-principles of Principle #2",
        "Apply Principle #2 to problem",
        "Research Principle #3 if applicable",
        "Apply Standard Solution: Eliminate harm",
        "Apply Standard Solution: Block harm",
        "Apply Standard Solution: Convert harm to benefit",
        "Apply Standard Solution: Enhance insufficient functions",
        "Research Effects Database for new functions",
        "DEEP materials research",
        "Extract material properties (density, strength, formability)",
        "Create material comparison tables",
        "Synthesize complete solution concepts",
        // Phase 6: Rank & Implement
        "Calculate Ideality for each solution",
        "Calculate expected benefits per solution",
        "Calculate expected costs per solution",
        "Calculate expected harms per solution",
        "Create Ideality Plot",
        "Categorize solutions (Implement/Improve/Research/Park)",
        "Select top 3 solutions",
        "Research implementation requirements",
        "Create implementation timeline",
        "Generate final synthesis with evidence",
    ];
    TITLES[(step as usize - 1).min(59)]
}

/// Short topic string for search-query interpolation
///
/// Char-boundary safe, unlike a byte slice of the problem text.
pub(crate) fn topic(problem: &str) -> String {
    problem.chars().take(50).collect()
}

/// Convenience constructor used by the phase modules
pub(crate) fn instruction(
    step: u32,
    task: impl Into<String>,
    search_queries: Vec<String>,
    required_fields: &[&str],
    validation_criteria: impl Into<String>,
    expected_output_shape: impl Into<String>,
    rationale: impl Into<String>,
) -> Instruction {
    Instruction {
        title: step_title(step).to_string(),
        task: task.into(),
        search_queries,
        required_fields: required_fields.iter().map(|s| s.to_string()).collect(),
        validation_criteria: validation_criteria.into(),
        expected_output_shape: expected_output_shape.into(),
        rationale: rationale.into(),
        knowledge_aliases: Vec::new(),
    }
}

/// Look up `knowledge[step_key][field]`
pub(crate) fn knowledge_field<'a>(
    knowledge: &'a Map<String, Value>,
    step_key: &str,
    field: &str,
) -> Option<&'a Value> {
    knowledge.get(step_key).and_then(|v| v.get(field))
}
