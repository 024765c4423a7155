//! Phase 4: Select Solution Tools (steps 27-32)
//!
//! Matches the prioritized problems to the TRIZ tools that solve them. The
//! matrix lookup step feeds on the parameter mapping accumulated in step 28,
//! and its recommended principles are aliased for the phase 5 steps.

use serde_json::{Map, Value};

use crate::types::Instruction;

use super::{instruction, knowledge_field, topic};

pub fn generate(step: u32, problem: &str, knowledge: &Map<String, Value>) -> Instruction {
    let topic = topic(problem);

    match step {
        27 => instruction(
            27,
            "Match each identified problem to appropriate TRIZ solution tools",
            vec![
                "TRIZ tool selection problem matching".to_string(),
                "when to use 40 principles standard solutions".to_string(),
                "TRIZ tools decision tree problem types".to_string(),
            ],
            &["tool_mapping", "tools_to_use", "application_order"],
            "Must map all priority problems from Step 26 to specific TRIZ tools",
            r#"{
  "tool_mapping": [
    {"problem": "Physical contradiction: flexible vs rigid",
     "problem_type": "Physical Contradiction",
     "tools": ["Separation Principles", "40 Inventive Principles"],
     "specific_approach": "Apply separation in TIME/CONDITION"}
  ],
  "tools_to_use": ["Contradiction Matrix", "76 Standard Solutions"],
  "application_order": ["contradictions first", "then harms"]
}"#,
            "Using the RIGHT tool for each problem type is critical. TRIZ has specific tools \
             for specific problems.",
        ),

        28 => instruction(
            28,
            "Map technical contradictions to TRIZ 39 Engineering Parameters",
            vec![
                "TRIZ 39 parameters list definitions".to_string(),
                "map problem to 39 parameters contradiction matrix".to_string(),
                format!("engineering parameters {}", topic),
            ],
            &["mappings"],
            "Must map all technical contradictions from Step 23 to 39 Parameters",
            r#"{
  "mappings": [
    {"contradiction": "Lighter material worsens formability",
     "improving": {"name": "Weight of moving object", "number": 1},
     "worsening": {"name": "Ease of manufacture", "number": 32},
     "confidence": "HIGH", "reasoning": "..."}
  ]
}"#,
            "Correct parameter mapping is crucial for getting the right principles from the \
             Contradiction Matrix.",
        ),

        29 => {
            let improving = knowledge_field(knowledge, "step_28", "improving_numbers")
                .and_then(|v| v.as_array())
                .and_then(|a| a.first())
                .map(render_number)
                .unwrap_or_else(|| "1".to_string());
            let mut inst = instruction(
                29,
                "Lookup Contradiction Matrix and extract recommended principles",
                vec![
                    "TRIZ contradiction matrix lookup".to_string(),
                    "principles for parameter contradiction".to_string(),
                    format!("improve parameter {}", improving),
                ],
                &["lookups", "recommended_principles"],
                "Must lookup all parameter pairs from Step 28 in Contradiction Matrix",
                r#"{
  "lookups": [
    {"improving": 1, "worsening": 32,
     "principles_found": [1, 27, 35, 40],
     "principle_names": ["Segmentation", "Cheap short-living objects", "Parameter changes", "Composite materials"],
     "priority_order": [40, 1, 35, 27], "reasoning": "..."}
  ],
  "recommended_principles": [40, 1, 35]
}"#,
                "The Contradiction Matrix provides statistically proven principles that \
                 solved similar contradictions in patents.",
            );
            inst.knowledge_aliases = vec![(
                "recommended_principles".to_string(),
                "principles_to_apply".to_string(),
            )];
            inst
        }

        30 => instruction(
            30,
            "Identify applicable Standard Solutions for harmful functions",
            vec![
                "TRIZ standard solutions harm elimination".to_string(),
                "trimming standard solutions TRIZ".to_string(),
                "eliminate block convert correct harm TRIZ".to_string(),
            ],
            &["solutions"],
            "Must identify Standard Solutions for all harmful functions from Step 21",
            r#"{
  "solutions": [
    {"harm": "material adds weight", "severity": 8,
     "strategies": [
       {"strategy": "ELIMINATE", "standard_solution": "Material substitution",
        "how": "Replace with lighter material", "expected_result": "30-40% weight reduction"}
     ]}
  ]
}"#,
            "Standard Solutions provide systematic approaches to common problem types like \
             harmful functions.",
        ),

        31 => instruction(
            31,
            "Search Effects Database for new functions or capabilities needed",
            vec![
                "TRIZ effects database scientific effects".to_string(),
                "how to achieve function physics chemistry".to_string(),
                format!("physical effects {}", topic),
            ],
            &[
                "functions_needed",
                "effects_found",
                "implementation_examples",
            ],
            "Must search for effects that deliver insufficient functions from Step 19",
            r#"{
  "functions_needed": ["heat material for forming"],
  "effects_found": [
    {"effect": "Induction heating", "how": "electromagnetic field induces currents",
     "example": "Induction cookware", "applicability": "HIGH"}
  ],
  "implementation_examples": ["induction-assisted warm forming"]
}"#,
            "The Effects Database connects desired functions to proven scientific and \
             engineering methods to achieve them.",
        ),

        _ => instruction(
            32,
            "Research applicable Evolution Trends for system development",
            vec![
                "TRIZ 8 trends technical evolution".to_string(),
                "system evolution S-curve stages".to_string(),
                format!("future development trends {}", topic),
            ],
            &[
                "current_evolution_stage",
                "applicable_trends",
                "next_generation_features",
                "innovation_opportunities",
            ],
            "Must identify current evolution stage and at least 2 applicable trends",
            r#"{
  "current_evolution_stage": "Youth to Maturity transition",
  "applicable_trends": [
    {"trend": "Increasing Dynamism", "current": "fixed structure",
     "next": "adaptive structure", "opportunity": "shape-memory alloys"}
  ],
  "next_generation_features": ["morphing structures"],
  "innovation_opportunities": ["sandwich composites with embedded sensors"]
}"#,
            "Evolution Trends help predict and design next-generation systems, staying ahead \
             of competition.",
        ),
    }
}

fn render_number(v: &Value) -> String {
    match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matrix_lookup_uses_mapped_parameter() {
        let mut knowledge = Map::new();
        knowledge.insert("step_28".to_string(), json!({"improving_numbers": [14, 1]}));
        let inst = generate(29, "p", &knowledge);
        assert!(inst.search_queries.iter().any(|q| q == "improve parameter 14"));
    }

    #[test]
    fn matrix_lookup_defaults_without_mapping() {
        let inst = generate(29, "p", &Map::new());
        assert!(inst.search_queries.iter().any(|q| q == "improve parameter 1"));
    }

    #[test]
    fn step_29_declares_principles_alias() {
        let inst = generate(29, "p", &Map::new());
        assert_eq!(
            inst.knowledge_aliases,
            vec![("recommended_principles".to_string(), "principles_to_apply".to_string())]
        );
    }
}
