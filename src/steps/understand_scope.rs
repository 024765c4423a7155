//! Phase 1: Understand & Scope (steps 1-10)
//!
//! The most critical phase. 9 Boxes context mapping plus an Ideality audit
//! set up everything that follows; narrow scoping here sinks the rest of
//! the analysis.

use crate::types::Instruction;

use super::{instruction, topic};

pub fn generate(step: u32, problem: &str) -> Instruction {
    let topic = topic(problem);

    match step {
        1 => instruction(
            1,
            "Create 9 Boxes context map for complete system understanding",
            vec![
                format!("components parts inside {}", topic),
                format!("environment context where {} operates", topic),
                format!("historical evolution development {}", topic),
                format!("future trends predictions {}", topic),
            ],
            &[
                "sub_system_components",
                "system_description",
                "super_system_context",
                "past_evolution",
                "future_predictions",
            ],
            "Must identify at least 3 items for sub-system, system, and super-system across time",
            r#"{
  "sub_system_past": ["component1"], "sub_system_present": ["component2"], "sub_system_future": ["predicted"],
  "system_past": ["previous_version"], "system_present": ["current"], "system_future": ["next_generation"],
  "super_system_past": ["old_market"], "super_system_present": ["current_users"], "super_system_future": ["predicted_market"]
}"#,
            "9 Boxes provides complete context before diving into details. It reveals trends, \
             root causes, and future opportunities that narrow analysis would miss.",
        ),

        2 => instruction(
            2,
            "Deep research on Sub-System components (what's INSIDE the system)",
            vec![
                format!("internal components parts {}", topic),
                format!("subsystem elements materials {}", topic),
                format!("component materials properties {}", topic),
                "component interactions interfaces connections".to_string(),
            ],
            &[
                "component_list",
                "component_materials",
                "component_functions",
                "component_interactions",
            ],
            "Must identify at least 5 specific sub-system components with materials",
            r#"{
  "components": [{"name": "frame", "material": "aluminum", "function": "structural support"}],
  "interactions": ["frame connects to panel via bolts"]
}"#,
            "Understanding sub-system reveals where problems truly originate and what \
             resources are available.",
        ),

        3 => instruction(
            3,
            "Deep research on Super-System (environment, users, market context)",
            vec![
                format!("user requirements needs {}", topic),
                format!("market trends environment {}", topic),
                format!("operating conditions constraints {}", topic),
                format!("competitors alternatives {}", topic),
            ],
            &[
                "users",
                "user_needs",
                "operating_environment",
                "market_context",
                "competitors_alternatives",
            ],
            "Must identify users, environment, and at least 2 competitors/alternatives",
            r#"{
  "users": ["household owners"], "user_needs": ["follow without effort"],
  "operating_environment": "indoor, room temperature, obstacles",
  "market_context": "home robotics growing 15% annually",
  "competitors_alternatives": ["static tripod", "selfie stick"]
}"#,
            "Super-system reveals true requirements and constraints. Solutions must fit the \
             broader context.",
        ),

        4 => instruction(
            4,
            "Analyze PAST evolution (how did we get here?)",
            vec![
                format!("history evolution development {}", topic),
                format!("previous generation older version {}", topic),
                format!("historical problems failures {}", topic),
                "lessons learned from past designs".to_string(),
            ],
            &[
                "past_systems",
                "past_problems",
                "evolution_path",
                "lessons_learned",
            ],
            "Must identify at least 2 previous generations and their key problems",
            r#"{
  "past_systems": [{"era": "1990s", "system": "manual tripod", "problems": ["static"]}],
  "past_problems": ["no movement", "heavy"],
  "evolution_path": "static -> motorized -> autonomous",
  "lessons_learned": ["weight reduction critical"]
}"#,
            "Understanding past evolution reveals patterns and helps avoid repeating mistakes.",
        ),

        5 => instruction(
            5,
            "Analyze FUTURE trends (where is this going?)",
            vec![
                format!("future trends predictions {}", topic),
                format!("next generation emerging technology {}", topic),
                format!("innovation roadmap future development {}", topic),
                "future user expectations requirements".to_string(),
            ],
            &[
                "future_trends",
                "emerging_technologies",
                "future_user_needs",
                "predicted_problems",
            ],
            "Must identify at least 3 future trends with evidence from research",
            r#"{
  "future_trends": [{"trend": "AI integration", "evidence": "...", "source": "..."}],
  "emerging_technologies": ["AI vision", "shape-memory alloys"],
  "future_user_needs": ["voice control"],
  "predicted_problems": ["battery life"]
}"#,
            "Future analysis helps design solutions that will remain relevant and anticipate \
             next problems.",
        ),

        6 => instruction(
            6,
            "Identify all current BENEFITS (desired outcomes) for Ideality calculation",
            vec![
                format!("benefits advantages desired outcomes {}", topic),
                format!("what users want value proposition {}", topic),
                format!("performance metrics success criteria {}", topic),
                "functional requirements specifications".to_string(),
            ],
            &["benefits_list", "benefit_importance", "current_achievement"],
            "Must identify at least 5 distinct benefits with importance rankings",
            r#"{
  "benefits": [
    {"description": "follows user smoothly", "importance": 10, "current_achievement": 6}
  ]
}"#,
            "Benefits are the numerator in the Ideality equation. We maximize these to \
             increase Ideality.",
        ),

        7 => instruction(
            7,
            "Identify all current COSTS (inputs required) for Ideality calculation",
            vec![
                format!("costs price materials resources {}", topic),
                format!("manufacturing costs production expenses {}", topic),
                format!("time effort energy required {}", topic),
                "resource consumption inputs needed".to_string(),
            ],
            &["costs_list", "cost_magnitude", "cost_type"],
            "Must identify at least 5 distinct costs across different types",
            r#"{
  "costs": [
    {"description": "aluminum sheet material", "magnitude": 6, "type": "money"},
    {"description": "assembly labor", "magnitude": 7, "type": "effort"}
  ]
}"#,
            "Costs are in the denominator of Ideality. We minimize these to increase Ideality.",
        ),

        8 => instruction(
            8,
            "Identify all current HARMS (undesired outputs) for Ideality calculation",
            vec![
                format!("problems issues drawbacks {}", topic),
                format!("side effects negative impacts {}", topic),
                format!("waste byproducts inefficiency {}", topic),
                "failures defects complaints".to_string(),
            ],
            &["harms_list", "harm_severity", "harm_type"],
            "Must identify at least 3 distinct harms with severity rankings",
            r#"{
  "harms": [
    {"description": "excessive weight reduces mobility", "severity": 8, "type": "performance"}
  ]
}"#,
            "Harms are in the denominator of Ideality. We minimize or eliminate these to \
             increase Ideality.",
        ),

        9 => instruction(
            9,
            "Calculate current Ideality score and analyze system health",
            vec![
                "ideality calculation TRIZ methodology".to_string(),
                format!("system performance evaluation {}", topic),
                "benchmarking comparison analysis".to_string(),
            ],
            &[
                "ideality_calculation",
                "ideality_score",
                "ideality_category",
                "key_insights",
            ],
            "Must calculate Ideality score using data from steps 6-8",
            r#"{
  "calculation": {"total_benefits": 45.2, "total_costs": 32.0, "total_harms": 18.0,
                  "ideality_score": 0.904, "category": "ACCEPTABLE"},
  "insights": ["Weight harm (severity 8) is major drag on Ideality"]
}"#,
            "Ideality score reveals system health and guides improvement priorities.",
        ),

        _ => instruction(
            10,
            "Identify root causes and patterns from 9 Boxes analysis",
            vec![
                "root cause analysis problem identification".to_string(),
                format!("underlying causes patterns {}", topic),
                "system thinking causal relationships".to_string(),
            ],
            &[
                "root_causes",
                "patterns_observed",
                "key_contradictions",
                "priority_problems",
            ],
            "Must identify at least 2 root causes with evidence from 9 Boxes",
            r#"{
  "root_causes": [{"cause": "material choice drives trade-off", "evidence": "...", "impacts": ["mobility"]}],
  "patterns_observed": ["increasing lightness + increasing forming difficulty"],
  "key_contradictions": ["need lightweight BUT need formability"],
  "priority_problems": ["solve weight-formability contradiction"]
}"#,
            "Root cause analysis from 9 Boxes reveals the TRUE problems to solve, not just \
             symptoms.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_interpolate_the_problem() {
        let inst = generate(1, "Reduce vibration without increasing mass");
        assert!(inst.search_queries[0].contains("Reduce vibration"));
    }

    #[test]
    fn step_1_requires_five_fields() {
        let inst = generate(1, "p");
        assert_eq!(inst.required_fields.len(), 5);
        assert!(inst.required_fields.contains(&"sub_system_components".to_string()));
    }

    #[test]
    fn titles_come_from_the_fixed_table() {
        assert_eq!(generate(9, "p").title, "Calculate current Ideality score");
        assert_eq!(generate(10, "p").title, "Identify root causes from 9 Boxes");
    }
}
