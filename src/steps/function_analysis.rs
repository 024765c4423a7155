//! Phase 3: Function Analysis & Contradictions (steps 17-26)
//!
//! Subject-Action-Object mapping, function categorization, and the technical
//! and physical contradictions that drive the rest of the protocol.

use crate::types::Instruction;

use super::{instruction, topic};

pub fn generate(step: u32, problem: &str) -> Instruction {
    let topic = topic(problem);

    match step {
        17 => instruction(
            17,
            "Map ALL Subject-Action-Object relationships in the system",
            vec![
                format!("component interactions functions {}", topic),
                format!("how components work together {}", topic),
                "subject action object function analysis".to_string(),
                "functional modeling system interactions".to_string(),
            ],
            &["function_list", "subjects", "objects", "actions"],
            "Must identify at least 10 Subject-Action-Object relationships",
            r#"{
  "function_list": [
    {"subject": "component", "action": "supports", "object": "circuits", "type": "to_determine"},
    {"subject": "aluminum", "action": "adds weight to", "object": "robot", "type": "to_determine"}
  ],
  "subjects": ["component", "aluminum"], "actions": ["supports"], "objects": ["circuits"]
}"#,
            "Function Analysis reveals the complete system structure and ALL problems \
             (insufficient, excessive, harmful).",
        ),

        18 => instruction(
            18,
            "Categorize USEFUL functions (desired and adequate)",
            vec![
                format!("desired functions requirements {}", topic),
                format!("what should work well {}", topic),
                "useful actions adequate performance".to_string(),
            ],
            &["useful_functions", "adequacy_rating", "why_useful"],
            "Must identify at least 5 useful functions from step 17",
            r#"{
  "useful_functions": [
    {"subject": "component", "action": "supports", "object": "circuits", "adequacy": 8,
     "why": "Provides good structural support"}
  ]
}"#,
            "Identifying useful functions ensures we preserve what works when improving the \
             system.",
        ),

        19 => instruction(
            19,
            "Categorize INSUFFICIENT functions (desired but not enough)",
            vec![
                format!("inadequate weak insufficient {}", topic),
                format!("needs improvement not enough {}", topic),
                "performance gaps shortfalls deficiencies".to_string(),
            ],
            &[
                "insufficient_functions",
                "desired_level",
                "current_level",
                "gap_size",
            ],
            "Must identify at least 3 insufficient functions with gap analysis",
            r#"{
  "insufficient_functions": [
    {"subject": "material", "action": "reduces weight of", "object": "robot",
     "current_level": 4, "desired_level": 9, "gap": 5, "why": "current material too heavy"}
  ]
}"#,
            "Insufficient functions are improvement opportunities. These will be enhanced \
             with Standard Solutions.",
        ),

        20 => instruction(
            20,
            "Categorize EXCESSIVE functions (desired but too much)",
            vec![
                format!("excessive too much overkill {}", topic),
                format!("overdesigned overengineered {}", topic),
                "waste excess unnecessary redundancy".to_string(),
            ],
            &[
                "excessive_functions",
                "optimal_level",
                "current_level",
                "waste_impact",
            ],
            "Must identify at least 2 excessive functions if any exist",
            r#"{
  "excessive_functions": [
    {"subject": "material", "action": "provides strength to", "object": "structure",
     "optimal_level": 6, "current_level": 9, "waste": "over-strength adds weight and cost"}
  ]
}"#,
            "Excessive functions waste resources. Trimming or reducing these increases \
             Ideality.",
        ),

        21 => instruction(
            21,
            "Categorize HARMFUL functions (undesired outputs)",
            vec![
                format!("harmful negative undesired {}", topic),
                format!("problems failures defects {}", topic),
                format!("side effects drawbacks {}", topic),
                "harmful actions damage waste".to_string(),
            ],
            &["harmful_functions", "severity", "impact", "source"],
            "Must identify at least 4 harmful functions with severity ratings",
            r#"{
  "harmful_functions": [
    {"subject": "aluminum", "action": "adds weight to", "object": "robot", "severity": 8,
     "impact": "reduces mobility, increases energy use", "source": "performance_data"}
  ]
}"#,
            "Harmful functions are problems to solve with the 76 Standard Solutions \
             (eliminate, block, convert to good, correct).",
        ),

        22 => instruction(
            22,
            "Research how others eliminate similar harmful functions",
            vec![
                "eliminate harmful actions TRIZ examples".to_string(),
                format!("harm elimination techniques {}", topic),
                "harm elimination standard solutions".to_string(),
                "cross-domain harm removal case studies".to_string(),
            ],
            &[
                "elimination_examples",
                "applicable_methods",
                "standard_solutions_found",
            ],
            "Must find at least 5 harm elimination examples from research",
            r#"{
  "elimination_examples": [
    {"harm": "excessive weight", "elimination_method": "honeycomb sandwich structure",
     "principle": "Segmentation + Porous materials", "source": "aerospace_handbook",
     "applicability": "HIGH"}
  ],
  "applicable_methods": ["sandwich structure"],
  "standard_solutions_found": ["eliminate harm via material substitution"]
}"#,
            "Research reveals proven harm elimination methods from other domains and \
             contexts.",
        ),

        23 => instruction(
            23,
            "Identify TECHNICAL CONTRADICTIONS (improving X worsens Y)",
            vec![
                format!("trade-offs compromises {}", topic),
                format!("improving one parameter worsens another {}", topic),
                "technical contradictions TRIZ 39 parameters".to_string(),
                "design trade-offs engineering compromises".to_string(),
            ],
            &[
                "contradictions_list",
                "improving_parameter",
                "worsening_parameter",
                "evidence",
            ],
            "Must identify at least 2 technical contradictions with clear trade-offs",
            r#"{
  "contradictions_list": [
    {"description": "Lighter material worsens formability",
     "improving": "Weight of moving object", "improving_number": 1,
     "worsening": "Ease of manufacture", "worsening_number": 32,
     "evidence": "...", "source": "..."}
  ]
}"#,
            "Technical contradictions are resolved with the 40 Inventive Principles via the \
             Contradiction Matrix.",
        ),

        24 => instruction(
            24,
            "Identify PHYSICAL CONTRADICTIONS (opposite properties in same object)",
            vec![
                format!("opposite requirements conflicting needs {}", topic),
                format!("must be both A and B simultaneously {}", topic),
                "physical contradictions TRIZ separation".to_string(),
                "conflicting properties same parameter".to_string(),
            ],
            &[
                "physical_contradictions",
                "parameter",
                "requirement_1",
                "requirement_2",
                "separation_methods",
            ],
            "Must identify at least 1 physical contradiction with separation methods",
            r#"{
  "physical_contradictions": [
    {"parameter": "Material State",
     "requirement_1": "Must be FLEXIBLE during forming",
     "requirement_2": "Must be RIGID during operation",
     "separation_methods": ["TIME - flexible when heated, rigid when cooled",
                            "SYSTEM - flexible skin, rigid core"],
     "evidence": "...", "source": "..."}
  ]
}"#,
            "Physical contradictions often reveal THE KEY INSIGHT. Separation principles \
             lead to breakthrough solutions.",
        ),

        25 => instruction(
            25,
            "Research how others resolve similar contradictions",
            vec![
                "contradiction resolution examples TRIZ".to_string(),
                "separation in time space condition system".to_string(),
                "phase transition solutions materials".to_string(),
                "conflicting requirements solved".to_string(),
            ],
            &[
                "resolution_examples",
                "principles_used",
                "separation_applied",
                "applicable_to_problem",
            ],
            "Must find at least 5 contradiction resolution examples",
            r#"{
  "resolution_examples": [
    {"contradiction": "flexible vs rigid",
     "resolution": "thermoforming - soft when heated, rigid at room temperature",
     "separation": "TIME", "principles": [36, 35], "source": "...",
     "applicability": "VERY HIGH"}
  ],
  "principles_used": [36, 35, 40, 1],
  "separation_applied": ["TIME", "SPACE"],
  "applicable_to_problem": "thermoforming directly applicable"
}"#,
            "Researching actual contradiction resolutions provides concrete, proven solution \
             pathways.",
        ),

        _ => instruction(
            26,
            "Prioritize problems to solve based on Function Analysis",
            vec![
                "problem prioritization impact analysis".to_string(),
                "which problems solve first criticality".to_string(),
                "ideality impact harm severity ranking".to_string(),
            ],
            &[
                "priority_ranking",
                "ranking_criteria",
                "solve_first",
                "ideality_impact",
            ],
            "Must rank all identified problems with clear justification",
            r#"{
  "priority_ranking": [
    {"rank": 1, "problem": "Physical contradiction: flexible vs rigid (Step 24)",
     "type": "Physical Contradiction", "severity": 9, "solvability": "HIGH",
     "why_first": "This is THE ROOT CAUSE"}
  ],
  "ranking_criteria": "ideality impact x solvability",
  "solve_first": "resolve physical contradiction via separation in TIME",
  "ideality_impact": "HIGH"
}"#,
            "Prioritization ensures we solve ROOT CAUSES first, not just symptoms. Maximum \
             Ideality improvement.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorization_steps_cover_four_function_types() {
        assert!(generate(18, "p").required_fields.contains(&"useful_functions".to_string()));
        assert!(generate(19, "p")
            .required_fields
            .contains(&"insufficient_functions".to_string()));
        assert!(generate(20, "p")
            .required_fields
            .contains(&"excessive_functions".to_string()));
        assert!(generate(21, "p")
            .required_fields
            .contains(&"harmful_functions".to_string()));
    }

    #[test]
    fn physical_contradiction_step_requires_separation_methods() {
        let inst = generate(24, "p");
        assert!(inst.required_fields.contains(&"separation_methods".to_string()));
    }
}
