//! Phase 5: Generate Solutions (steps 33-50)
//!
//! The longest phase. Two full research-examples-variations-apply cycles on
//! the matrix-recommended principles, the four Standard Solution strategies,
//! effects research, deep materials work, and the synthesis step that
//! produces the candidate solution concepts ranked in phase 6.

use serde_json::{Map, Value};

use crate::types::Instruction;

use super::{instruction, knowledge_field, topic};

pub fn generate(step: u32, problem: &str, knowledge: &Map<String, Value>) -> Instruction {
    let topic = topic(problem);
    let principles = recommended_principles(knowledge);

    match step {
        33 => {
            let p = principles[0];
            principle_research(33, p, "The Contradiction Matrix recommended this principle based on patterns from thousands of patents; we must understand WHY it works before applying it.")
        }

        34 => {
            let p = researched_principle(knowledge, "step_33", principles[0]);
            principle_examples(34, p)
        }

        35 => {
            let p = researched_principle(knowledge, "step_33", principles[0]);
            principle_variations(35, p)
        }

        36 => {
            let p = researched_principle(knowledge, "step_33", principles[0]);
            let name = principle_name(knowledge, "step_33", p);
            principle_application(36, p, &name, &topic)
        }

        37 => {
            let p = principles[1];
            principle_research(37, p, "This principle was also recommended by the Contradiction Matrix. Multiple principles often work together to resolve complex contradictions.")
        }

        38 => {
            let p = researched_principle(knowledge, "step_37", principles[1]);
            principle_examples(38, p)
        }

        39 => {
            let p = researched_principle(knowledge, "step_37", principles[1]);
            principle_variations(39, p)
        }

        40 => {
            let p = researched_principle(knowledge, "step_37", principles[1]);
            let name = principle_name(knowledge, "step_37", p);
            principle_application(40, p, &name, &topic)
        }

        41 => match principles.get(2) {
            Some(&p) => instruction(
                41,
                format!(
                    "Research Principle #{} (third recommended principle) if applicable",
                    p
                ),
                vec![
                    format!("TRIZ principle {} description application", p),
                    format!("principle {} examples {}", p, topic),
                    format!("how to apply principle {}", p),
                    format!("principle {} combined with other principles", p),
                ],
                &[
                    "principle_number",
                    "principle_name",
                    "principle_summary",
                    "quick_application_ideas",
                    "combination_potential",
                ],
                format!(
                    "Must research Principle #{} and identify at least 2 application ideas",
                    p
                ),
                r#"{
  "principle_number": 35, "principle_name": "Parameter changes",
  "principle_summary": "Change physical state, concentration, flexibility or temperature",
  "quick_application_ideas": ["idea 1", "idea 2"],
  "combination_potential": "how this combines with the first two principles"
}"#,
                "The Contradiction Matrix recommended 3+ principles. The third often provides \
                 a complementary approach to combine with the first two.",
            ),
            None => instruction(
                41,
                "No third principle recommended - document principle application status",
                vec![
                    "combining multiple TRIZ principles synergy".to_string(),
                    "multi-principle solutions TRIZ".to_string(),
                    "how to integrate TRIZ principles effectively".to_string(),
                    "complementary TRIZ principles combinations".to_string(),
                ],
                &[
                    "principles_applied",
                    "combination_opportunities",
                    "synergy_analysis",
                    "next_steps",
                ],
                "Document which principles were applied and potential combinations",
                r#"{
  "principles_applied": [1, 15],
  "combination_opportunities": "how the two principles can work together",
  "synergy_analysis": "analysis of complementary effects",
  "next_steps": "proceed to Standard Solutions"
}"#,
                "Documenting principle application status ensures we track all TRIZ tools \
                 used. Understanding synergies helps create better combined solutions.",
            ),
        },

        42 => {
            let harm = first_entry_description(knowledge, "step_21", "harmful_functions")
                .unwrap_or_else(|| "primary harmful function".to_string());
            instruction(
                42,
                "Apply Standard Solution: ELIMINATE harmful function completely",
                vec![
                    format!("eliminate harm {} TRIZ", clip(&harm, 40)),
                    "standard solution eliminate harmful function".to_string(),
                    "trimming TRIZ remove component".to_string(),
                    format!("remove eliminate {}", clip(&harm, 40)),
                    "harm elimination engineering examples".to_string(),
                ],
                &[
                    "elimination_strategies",
                    "trimming_candidates",
                    "function_transfer_methods",
                    "expected_outcomes",
                    "feasibility_analysis",
                ],
                "Must propose at least 2 concrete methods to ELIMINATE the harmful function",
                r#"{
  "elimination_strategies": [
    {"method": "Complete material substitution", "how": "...",
     "function_transfer": "...", "expected_result": "...", "feasibility": "HIGH"}
  ],
  "trimming_candidates": ["..."], "function_transfer_methods": ["..."],
  "expected_outcomes": ["..."], "feasibility_analysis": "..."
}"#,
                "ELIMINATION is the most Ideal solution. Standard Solutions prioritize: \
                 Eliminate > Block > Convert > Correct.",
            )
        }

        43 => {
            let harm = first_entry_description(knowledge, "step_21", "harmful_functions")
                .unwrap_or_else(|| "primary harmful function".to_string());
            instruction(
                43,
                "Apply Standard Solution: BLOCK harmful function (if elimination impossible)",
                vec![
                    format!("block prevent {}", clip(&harm, 40)),
                    "standard solution block harmful function TRIZ".to_string(),
                    "shielding blocking harm engineering".to_string(),
                    "prevent harm without removing source".to_string(),
                    "barrier protection harmful effect".to_string(),
                ],
                &[
                    "blocking_strategies",
                    "barrier_methods",
                    "isolation_techniques",
                    "effectiveness_assessment",
                ],
                "Must propose at least 2 methods to BLOCK the harmful function if elimination not possible",
                r#"{
  "blocking_strategies": [
    {"method": "Physical barrier/shield", "how": "...", "example": "...",
     "expected_result": "80-95% harm reduction", "feasibility": "MEDIUM"}
  ],
  "barrier_methods": ["..."], "isolation_techniques": ["..."],
  "effectiveness_assessment": "..."
}"#,
                "If elimination is impossible, blocking is the next-best Standard Solution. \
                 Blocks the harm path while keeping the source.",
            )
        }

        44 => {
            let harm = first_entry_description(knowledge, "step_21", "harmful_functions")
                .unwrap_or_else(|| "primary harmful function".to_string());
            instruction(
                44,
                "Apply Standard Solution: CONVERT harm to benefit (turn problem into opportunity)",
                vec![
                    format!("convert {} to benefit", clip(&harm, 40)),
                    "waste to value TRIZ standard solution".to_string(),
                    "turn harm into benefit engineering examples".to_string(),
                    "use waste byproduct problem as resource".to_string(),
                    "beneficial reuse harmful output".to_string(),
                ],
                &[
                    "conversion_strategies",
                    "beneficial_uses",
                    "value_creation_methods",
                    "implementation_examples",
                ],
                "Must propose at least 2 methods to CONVERT the harm into something beneficial",
                r#"{
  "conversion_strategies": [
    {"method": "Use waste material for new function", "how": "...",
     "benefit_created": "...", "example": "...", "feasibility": "HIGH"}
  ],
  "beneficial_uses": ["..."], "value_creation_methods": ["..."],
  "implementation_examples": ["..."]
}"#,
                "Converting harm to benefit is the most CREATIVE Standard Solution - it both \
                 reduces harms AND increases benefits in the Ideality equation.",
            )
        }

        45 => {
            let weak = first_entry_description(knowledge, "step_19", "insufficient_functions")
                .unwrap_or_else(|| "insufficient function".to_string());
            instruction(
                45,
                "Apply Standard Solution: ENHANCE insufficient functions (boost weak functions)",
                vec![
                    format!("enhance improve {}", clip(&weak, 40)),
                    "standard solution enhance insufficient function TRIZ".to_string(),
                    "amplify boost weak function engineering".to_string(),
                    "improve insufficient action".to_string(),
                    "strengthening weak functions examples".to_string(),
                ],
                &[
                    "enhancement_strategies",
                    "amplification_methods",
                    "boosting_techniques",
                    "expected_improvements",
                ],
                "Must propose at least 3 methods to ENHANCE insufficient functions from Step 19",
                r#"{
  "enhancement_strategies": [
    {"method": "Add resources from environment", "how": "...", "example": "...",
     "expected_improvement": "30-50% with zero added cost", "feasibility": "HIGH"}
  ],
  "amplification_methods": ["field intensification"],
  "boosting_techniques": ["introduce intermediary"],
  "expected_improvements": ["..."]
}"#,
                "Insufficient functions are opportunities - boosting them increases benefits \
                 in the Ideality equation.",
            )
        }

        46 => {
            let need = first_function_needed(knowledge)
                .unwrap_or_else(|| "primary function needed".to_string());
            instruction(
                46,
                "Research Effects Database for scientific/engineering effects to deliver needed functions",
                vec![
                    format!("TRIZ effects database {}", clip(&need, 40)),
                    format!("physical effects achieve {}", clip(&need, 40)),
                    format!("scientific principles {}", clip(&need, 40)),
                    "effects database X-Factor function delivery".to_string(),
                    "engineering effects catalog physics chemistry".to_string(),
                ],
                &[
                    "effects_found",
                    "function_matching",
                    "implementation_methods",
                    "examples_applications",
                ],
                "Must find at least 3 scientific/engineering effects that deliver needed functions from Step 31",
                r#"{
  "effects_found": [
    {"effect_name": "Induction heating", "how_it_works": "...",
     "applicability": "...", "implementation": "...", "feasibility": "HIGH"}
  ],
  "function_matching": [{"desired_function": "...", "effect": "..."}],
  "implementation_methods": ["..."], "examples_applications": ["..."]
}"#,
                "The Effects Database connects desired FUNCTIONS to proven scientific METHODS. \
                 A physics effect from one field solves an engineering problem in another.",
            )
        }

        47 => instruction(
            47,
            "DEEP materials research through engineering materials references",
            vec![
                format!("materials properties {} engineering handbook", topic),
                "lightweight materials comparison density strength".to_string(),
                "candidate materials alternatives comparison".to_string(),
                "formability of candidate materials".to_string(),
                "materials selection engineering design".to_string(),
            ],
            &[
                "candidate_materials",
                "materials_properties_overview",
                "source_books",
                "comparative_analysis",
            ],
            "Must research at least 5 candidate materials from materials engineering references with property comparisons",
            r#"{
  "candidate_materials": [
    {"material": "Magnesium AZ31B alloy", "why_candidate": "...",
     "source_books": ["ASM Metals Handbook Vol 2"],
     "properties_found": "...", "applicability": "HIGH"}
  ],
  "materials_properties_overview": "...",
  "source_books": ["..."], "comparative_analysis": "..."
}"#,
            "Deep materials research provides authoritative data for materials selection. \
             Real engineering data, not generic descriptions.",
        ),

        48 => instruction(
            48,
            "Extract precise material properties: densities (g/cm3), strengths (MPa), formability characteristics",
            vec![
                "material density table engineering materials".to_string(),
                "tensile strength MPa materials comparison".to_string(),
                "formability index metals warm cold forming".to_string(),
                "materials properties numerical values handbook".to_string(),
                "candidate material properties table".to_string(),
            ],
            &[
                "density_values",
                "strength_values",
                "formability_ratings",
                "manufacturing_properties",
                "source_verification",
            ],
            "Must extract precise numerical properties for all 5+ candidate materials from Step 47",
            r#"{
  "density_values": [{"material": "Aluminum 6061-T6", "value": 2.70, "unit": "g/cm3", "source": "ASM"}],
  "strength_values": [{"material": "Aluminum 6061-T6", "tensile": 310, "yield": 276, "unit": "MPa"}],
  "formability_ratings": [{"material": "Magnesium AZ31B", "rating": "GOOD (warm)", "notes": "..."}],
  "manufacturing_properties": ["..."], "source_verification": ["..."]
}"#,
            "Precise numerical properties enable quantitative comparison. Density drives \
             weight, strength drives sizing, formability drives manufacturing feasibility.",
        ),

        49 => instruction(
            49,
            "Create material comparison tables: relative weight, strength-to-weight ratios, formability rankings",
            vec![
                "materials comparison table weight strength".to_string(),
                "specific strength materials ranking".to_string(),
                "weight reduction percentage material alternatives".to_string(),
                "materials selection chart ashby".to_string(),
                "formability ranking metals polymers composites".to_string(),
            ],
            &[
                "comparison_tables",
                "weight_calculations",
                "strength_to_weight_ratios",
                "formability_rankings",
                "recommendations",
            ],
            "Must create comparison table for all 5+ materials showing weight %, strength/weight, formability, cost",
            r#"{
  "comparison_tables": {"weight": [{"material": "Magnesium AZ31B", "weight_vs_baseline": "65.6%"}]},
  "weight_calculations": ["..."],
  "strength_to_weight_ratios": [{"material": "CFRP", "specific_strength": 516.1, "ranking": 1}],
  "formability_rankings": [{"rank": 1, "material": "Aluminum 6061-T6"}],
  "recommendations": {"optimal_choice": "..."}
}"#,
            "Comparison tables transform raw data into decision support. Side-by-side \
             comparison reveals trade-offs and optimal choices based on Ideality.",
        ),

        _ => {
            let mut inst = instruction(
                50,
                "Synthesize ALL findings from steps 33-49 into complete, integrated solution concepts",
                vec![
                    "combine multiple TRIZ principles integrated solution".to_string(),
                    "multi-principle solutions TRIZ case studies".to_string(),
                    format!("complete solution concept {}", topic),
                    "integrating principles standard solutions materials".to_string(),
                ],
                &[
                    "complete_solutions",
                    "triz_tools_combined",
                    "expected_ideality_improvement",
                    "implementation_roadmap",
                    "risk_assessment",
                ],
                "Must create at least 3 complete solution concepts that INTEGRATE multiple TRIZ tools from previous steps",
                r#"{
  "complete_solutions": [
    {"solution_name": "Modular Magnesium Segments with Induction Heating",
     "description": "...",
     "triz_tools_integrated": [{"tool": "Principle 1 (Segmentation)", "application": "..."}],
     "expected_benefits": ["..."], "expected_costs": ["..."],
     "ideality_calculation": {"current_ideality": 0.90, "projected_ideality": 1.85},
     "implementation_plan": "...", "risks": [{"risk": "...", "mitigation": "..."}],
     "feasibility": "HIGH"}
  ],
  "triz_tools_combined": ["..."], "expected_ideality_improvement": "...",
  "implementation_roadmap": "...", "risk_assessment": "..."
}"#,
                "This synthesis step is WHERE TRIZ DELIVERS VALUE - combining principles, \
                 Standard Solutions, materials research, and effects into complete, \
                 implementable solutions.",
            );
            inst.knowledge_aliases = vec![(
                "complete_solutions".to_string(),
                "candidate_solutions".to_string(),
            )];
            inst
        }
    }
}

/// Principles recommended by the matrix lookup in step 29, with the classic
/// fallback triple when the lookup produced nothing usable
fn recommended_principles(knowledge: &Map<String, Value>) -> Vec<i64> {
    let listed: Vec<i64> = knowledge_field(knowledge, "step_29", "recommended_principles")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default();
    if listed.len() >= 2 {
        listed
    } else {
        vec![1, 15, 35]
    }
}

/// Principle number actually researched in an earlier step, falling back to
/// the matrix recommendation when that step's findings lack the field
fn researched_principle(knowledge: &Map<String, Value>, step_key: &str, fallback: i64) -> i64 {
    knowledge_field(knowledge, step_key, "principle_number")
        .and_then(|v| v.as_i64())
        .unwrap_or(fallback)
}

fn principle_name(knowledge: &Map<String, Value>, step_key: &str, number: i64) -> String {
    knowledge_field(knowledge, step_key, "principle_name")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("Principle {}", number))
}

/// `description` (or `function`) of the first entry in a findings list
fn first_entry_description(
    knowledge: &Map<String, Value>,
    step_key: &str,
    field: &str,
) -> Option<String> {
    let first = knowledge_field(knowledge, step_key, field)?.as_array()?.first()?;
    match first {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o
            .get("description")
            .or_else(|| o.get("function"))
            .and_then(|v| v.as_str())
            .map(String::from),
        _ => None,
    }
}

fn first_function_needed(knowledge: &Map<String, Value>) -> Option<String> {
    first_entry_description(knowledge, "step_31", "functions_needed")
}

fn clip(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn principle_research(step: u32, p: i64, rationale: &str) -> Instruction {
    instruction(
        step,
        format!(
            "Deep research TRIZ Principle #{} - read FULL description from knowledge base",
            p
        ),
        vec![
            format!("TRIZ principle {} full description complete text", p),
            format!("principle {} definition explanation approach", p),
            format!("how to apply principle {} methodology", p),
            format!("principle {} sub-principles variations", p),
            format!("when to use principle {} situations", p),
        ],
        &[
            "principle_number",
            "principle_name",
            "full_description",
            "general_approach",
            "when_to_use",
        ],
        format!(
            "Must extract COMPLETE description of Principle #{} with at least 200 words",
            p
        ),
        format!(
            r#"{{
  "principle_number": {}, "principle_name": "Example: Segmentation",
  "full_description": "COMPLETE multi-paragraph description from TRIZ references...",
  "general_approach": "how the principle works conceptually",
  "when_to_use": "appropriate situations", "source": "TRIZ_40_principles_complete"
}}"#,
            p
        ),
        rationale,
    )
}

fn principle_examples(step: u32, p: i64) -> Instruction {
    instruction(
        step,
        format!(
            "Find real-world examples of Principle #{} in action across multiple industries",
            p
        ),
        vec![
            format!("principle {} examples case studies real applications", p),
            format!("principle {} applications industry success stories", p),
            format!("companies used principle {} innovation", p),
            format!("principle {} patents implementations products", p),
        ],
        &["examples"],
        format!(
            "Must find at least 5 real-world examples of Principle #{} from diverse industries",
            p
        ),
        r#"{
  "examples": [
    {"example": "LEGO modular toy system", "domain": "consumer products",
     "application": "...", "results": "...", "source": "...",
     "applicability": "HIGH - reasoning"}
  ]
}"#,
        format!(
            "Real examples show HOW to apply Principle #{} in practice, not just theory. \
             Patterns recur across industries and can be adapted to our problem.",
            p
        ),
    )
}

fn principle_variations(step: u32, p: i64) -> Instruction {
    instruction(
        step,
        format!("Extract sub-principles and variations of Principle #{}", p),
        vec![
            format!("principle {} sub-principles variations types", p),
            format!("principle {} different approaches methods", p),
            format!("principle {} detailed breakdown categories", p),
            format!("how many ways to apply principle {}", p),
        ],
        &["sub_principles", "selection_criteria"],
        format!(
            "Must identify at least 3 sub-principles or variations of Principle #{}",
            p
        ),
        r#"{
  "sub_principles": [
    {"variation": "Divide object into independent parts", "description": "...",
     "example": "...", "when_to_use": "..."}
  ],
  "selection_criteria": "choose variation based on primary benefit needed"
}"#,
        format!(
            "Principle #{} has multiple interpretations. Understanding variations helps \
             select the BEST approach for our specific situation.",
            p
        ),
    )
}

fn principle_application(step: u32, p: i64, name: &str, topic: &str) -> Instruction {
    instruction(
        step,
        format!(
            "Apply Principle #{} ({}) to YOUR specific problem - generate concrete solution concepts",
            p, name
        ),
        vec![
            format!("apply principle {} to {}", p, topic),
            format!("how to use {} for {}", name, topic),
            format!("principle {} solution examples similar problems", p),
            format!("{} implementation engineering design", name),
        ],
        &["solutions"],
        format!(
            "Must generate at least 3 concrete solution concepts applying Principle #{} to the problem",
            p
        ),
        r#"{
  "solutions": [
    {"concept": "solution concept name", "principle_application": "...",
     "how_it_works": "...", "expected_benefits": ["..."],
     "implementation": "...", "challenges": ["..."],
     "feasibility": "HIGH/MEDIUM/LOW - reasoning"}
  ]
}"#,
        format!(
            "This is where TRIZ guidance becomes concrete solutions. Abstract Principle #{} \
             turns into actionable engineering concepts for our specific problem.",
            p
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_classic_principles_without_matrix_results() {
        let inst = generate(33, "p", &Map::new());
        assert!(inst.task.contains("Principle #1"));
        let inst = generate(37, "p", &Map::new());
        assert!(inst.task.contains("Principle #15"));
    }

    #[test]
    fn follows_matrix_recommendations() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_29".to_string(),
            json!({"recommended_principles": [40, 1, 35]}),
        );
        assert!(generate(33, "p", &knowledge).task.contains("Principle #40"));
        assert!(generate(37, "p", &knowledge).task.contains("Principle #1"));
        assert!(generate(41, "p", &knowledge).task.contains("Principle #35"));
    }

    #[test]
    fn researched_principle_overrides_matrix_fallback() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_29".to_string(),
            json!({"recommended_principles": [40, 1]}),
        );
        knowledge.insert(
            "step_33".to_string(),
            json!({"principle_number": 2, "principle_name": "Taking out"}),
        );
        let inst = generate(36, "p", &knowledge);
        assert!(inst.task.contains("Principle #2"));
        assert!(inst.task.contains("Taking out"));
    }

    #[test]
    fn step_41_falls_back_without_third_principle() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_29".to_string(),
            json!({"recommended_principles": [40, 1]}),
        );
        let inst = generate(41, "p", &knowledge);
        assert!(inst.task.contains("No third principle"));
        assert!(inst.required_fields.contains(&"principles_applied".to_string()));
    }

    #[test]
    fn harm_steps_interpolate_top_harm() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_21".to_string(),
            json!({"harmful_functions": [
                {"description": "aluminum adds weight to robot", "severity": 8}
            ]}),
        );
        let inst = generate(42, "p", &knowledge);
        assert!(inst.search_queries[0].contains("aluminum adds weight"));
    }

    #[test]
    fn synthesis_step_declares_solutions_alias() {
        let inst = generate(50, "p", &Map::new());
        assert_eq!(
            inst.knowledge_aliases,
            vec![("complete_solutions".to_string(), "candidate_solutions".to_string())]
        );
    }
}
