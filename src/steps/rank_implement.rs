//! Phase 6: Rank & Implement (steps 51-60)
//!
//! Quantitative Ideality scoring of the candidate solutions from step 50,
//! the Ideality Plot, solution selection, implementation planning, and the
//! final synthesis step that closes the protocol.

use serde_json::{Map, Value};

use crate::types::Instruction;

use super::{instruction, knowledge_field, topic};

pub fn generate(step: u32, problem: &str, knowledge: &Map<String, Value>) -> Instruction {
    let topic = topic(problem);
    let num_solutions = candidate_solution_count(knowledge);

    match step {
        51 => instruction(
            51,
            "Calculate Ideality score for EACH solution concept (Benefits / (Costs + Harms))",
            vec![
                "ideality calculation solution ranking TRIZ".to_string(),
                "benefits costs harms quantitative scoring".to_string(),
                "solution evaluation criteria engineering".to_string(),
                "weighted scoring matrix decision".to_string(),
            ],
            &[
                "solution_evaluations",
                "calculation_method",
                "ideality_scores",
                "ranking_order",
            ],
            format!(
                "Must calculate Ideality for all {} solutions with numerical benefits/costs/harms",
                num_solutions
            ),
            r#"{
  "solution_evaluations": [
    {"solution": "Modular Magnesium Segments",
     "benefits": [{"benefit": "40% weight reduction", "score": 9}],
     "total_benefits": 24, "total_costs": 11, "total_harms": 5,
     "ideality_score": 1.50, "rank": 1}
  ],
  "calculation_method": "sum(benefit scores) / (sum(cost scores) + sum(harm scores))",
  "ideality_scores": {"solution_1": 1.50, "solution_2": 1.32},
  "ranking_order": ["solution_1", "solution_2", "solution_3"]
}"#,
            "Quantitative Ideality ranking makes solution selection objective, not opinion. \
             The same equation used to audit the current system now ranks its successors.",
        ),

        52 => instruction(
            52,
            "Calculate expected BENEFITS per solution with importance weighting",
            vec![
                "benefit quantification solution assessment".to_string(),
                "importance weighted scoring method".to_string(),
                format!("expected benefits {}", topic),
                "benefit achievement estimation engineering".to_string(),
            ],
            &[
                "benefits_per_solution",
                "importance_ratings",
                "achievement_estimates",
                "benefit_scoring",
            ],
            format!(
                "Must score benefits for all {} solutions against the Step 6 benefit list",
                num_solutions
            ),
            r#"{
  "benefits_per_solution": [
    {"solution": "Modular Magnesium Segments",
     "benefits": [{"benefit": "weight reduction", "importance": 10, "achievement": 9, "score": 90}],
     "total_benefit_score": 215}
  ],
  "importance_ratings": {"weight reduction": 10, "formability": 8},
  "achievement_estimates": "evidence-based percentage estimates per benefit",
  "benefit_scoring": "importance x achievement summed per solution"
}"#,
            "Benefits drive the Ideality numerator. Weighting by importance keeps the \
             ranking honest about what users actually value.",
        ),

        53 => instruction(
            53,
            "Calculate expected COSTS per solution (materials, manufacturing, time, effort)",
            vec![
                "cost estimation new design engineering".to_string(),
                "manufacturing cost comparison materials".to_string(),
                format!("implementation cost {}", topic),
                "total cost of ownership analysis".to_string(),
            ],
            &[
                "costs_per_solution",
                "cost_types",
                "magnitude_ratings",
                "cost_scoring",
            ],
            format!(
                "Must score costs for all {} solutions across money/time/effort/resources",
                num_solutions
            ),
            r#"{
  "costs_per_solution": [
    {"solution": "Modular Magnesium Segments",
     "costs": [{"cost": "magnesium material premium", "type": "money", "magnitude": 6}],
     "total_cost_score": 14}
  ],
  "cost_types": ["money", "time", "effort", "resources"],
  "magnitude_ratings": "1-10 scale per cost",
  "cost_scoring": "sum of magnitudes per solution"
}"#,
            "Costs sit in the Ideality denominator. A solution with stellar benefits can \
             still lose to a cheaper rival.",
        ),

        54 => instruction(
            54,
            "Calculate expected HARMS per solution (side effects, risks, new problems)",
            vec![
                "side effects new technology risks".to_string(),
                "unintended consequences design changes".to_string(),
                format!("risks drawbacks {}", topic),
                "failure modes new materials processes".to_string(),
            ],
            &[
                "harms_per_solution",
                "harm_types",
                "severity_ratings",
                "harm_scoring",
            ],
            format!(
                "Must score harms for all {} solutions including newly introduced problems",
                num_solutions
            ),
            r#"{
  "harms_per_solution": [
    {"solution": "Modular Magnesium Segments",
     "harms": [{"harm": "magnesium corrosion risk", "type": "reliability", "severity": 4}],
     "total_harm_score": 7}
  ],
  "harm_types": ["reliability", "safety", "environmental"],
  "severity_ratings": "1-10 scale per harm",
  "harm_scoring": "sum of severities per solution"
}"#,
            "Every solution introduces NEW harms. Honest harm scoring prevents trading one \
             problem for a worse one.",
        ),

        55 => instruction(
            55,
            "Create Ideality Plot - map solutions on Benefits vs Costs+Harms axes",
            vec![
                "ideality plot TRIZ solution mapping".to_string(),
                "benefit cost matrix visualization".to_string(),
                "solution portfolio quadrant analysis".to_string(),
                "2x2 matrix decision making".to_string(),
            ],
            &[
                "plot_coordinates",
                "quadrant_definitions",
                "solution_positioning",
                "visual_insights",
            ],
            format!(
                "Must place all {} solutions on the plot with quadrant assignments",
                num_solutions
            ),
            r#"{
  "plot_coordinates": [
    {"solution": "Modular Magnesium Segments", "x_costs_harms": 18, "y_benefits": 24,
     "quadrant": "HIGH benefit / LOW cost"}
  ],
  "quadrant_definitions": {"top_left": "Implement now", "top_right": "Improve costs first",
                           "bottom_left": "Research more", "bottom_right": "Park"},
  "solution_positioning": "relative positions with axis values",
  "visual_insights": "which solutions dominate and which are dominated"
}"#,
            "The Ideality Plot makes the whole solution portfolio visible at once. Dominated \
             solutions are parked without debate.",
        ),

        56 => instruction(
            56,
            "Categorize solutions: IMPLEMENT now / IMPROVE first / RESEARCH more / PARK",
            vec![
                "solution portfolio management categories".to_string(),
                "implement improve research park decision".to_string(),
                "go no-go criteria engineering projects".to_string(),
                "technology readiness level assessment".to_string(),
            ],
            &[
                "category_assignments",
                "decision_rationale",
                "action_plans",
                "priorities",
            ],
            format!(
                "Must assign all {} solutions to exactly one category with rationale",
                num_solutions
            ),
            r#"{
  "category_assignments": [
    {"solution": "Modular Magnesium Segments", "category": "IMPLEMENT",
     "rationale": "highest Ideality, proven materials, low risk"}
  ],
  "decision_rationale": "categories follow plot quadrants plus readiness",
  "action_plans": [{"solution": "...", "next_action": "..."}],
  "priorities": ["solution_1 first"]
}"#,
            "Categorization converts analysis into an action portfolio. Not every good idea \
             should be implemented immediately.",
        ),

        57 => {
            let mut inst = instruction(
                57,
                "Select the top solutions for implementation with full justification",
                vec![
                    "final solution selection criteria engineering".to_string(),
                    "comparative analysis top candidates".to_string(),
                    format!("best solution {}", topic),
                    "implementation strategy selected design".to_string(),
                ],
                &[
                    "selected_solutions",
                    "selection_justification",
                    "comparative_analysis",
                    "implementation_strategy",
                ],
                "Must select top 3 (or fewer) solutions with evidence-backed justification",
                r#"{
  "selected_solutions": [
    {"rank": 1, "solution": "Modular Magnesium Segments", "ideality": 1.50,
     "why_selected": "highest Ideality with HIGH feasibility"}
  ],
  "selection_justification": "ranked by Ideality from Step 51, gated by Step 56 category",
  "comparative_analysis": "side-by-side of top candidates",
  "implementation_strategy": "primary solution with fallback"
}"#,
                "Selection is the payoff of the ranking work. Carrying a ranked fallback \
                 de-risks the primary choice.",
            );
            inst.knowledge_aliases = vec![(
                "selected_solutions".to_string(),
                "final_selection".to_string(),
            )];
            inst
        }

        58 => {
            let name = selected_solution_name(knowledge);
            instruction(
                58,
                "Research implementation requirements: suppliers, technology, resources, costs, lead times",
                vec![
                    format!("suppliers for {}", clip(&name, 40)),
                    format!("technology requirements {}", clip(&name, 40)),
                    format!("cost estimate implementation {}", clip(&name, 40)),
                    format!("lead time procurement {}", clip(&name, 40)),
                    format!("manufacturing process {}", clip(&name, 40)),
                ],
                &[
                    "supplier_information",
                    "technology_requirements",
                    "resource_needs",
                    "cost_estimates",
                    "lead_times",
                ],
                "Must research concrete implementation requirements for the selected solution",
                r#"{
  "supplier_information": [{"component": "magnesium AZ31B sheet", "suppliers": ["..."], "notes": "..."}],
  "technology_requirements": ["warm forming press 200-300C"],
  "resource_needs": ["forming tooling", "corrosion coating line"],
  "cost_estimates": {"tooling": "...", "per_unit": "..."},
  "lead_times": {"tooling": "8-12 weeks", "material": "4 weeks"}
}"#,
                "Implementation research grounds the selected concept in supply-chain and \
                 manufacturing reality before committing a schedule.",
            )
        }

        59 => {
            let name = selected_solution_name(knowledge);
            instruction(
                59,
                "Create implementation timeline with phases, milestones, and risk mitigation",
                vec![
                    format!("implementation plan timeline {}", clip(&name, 40)),
                    "engineering project phases milestones".to_string(),
                    "prototype pilot production rollout schedule".to_string(),
                    "project risk mitigation schedule".to_string(),
                ],
                &[
                    "timeline_phases",
                    "milestones",
                    "resource_allocation",
                    "risk_mitigation_schedule",
                ],
                "Must create a phased timeline with at least 3 phases and concrete milestones",
                r#"{
  "timeline_phases": [
    {"phase": "Prototype", "duration": "6 weeks", "activities": ["..."]},
    {"phase": "Pilot", "duration": "8 weeks", "activities": ["..."]},
    {"phase": "Production", "duration": "12 weeks", "activities": ["..."]}
  ],
  "milestones": [{"milestone": "first formed part", "week": 4}],
  "resource_allocation": "people and equipment per phase",
  "risk_mitigation_schedule": [{"risk": "forming defects", "mitigation": "...", "when": "prototype"}]
}"#,
                "A phased timeline with early-failure milestones turns the solution into an \
                 executable project instead of a report.",
            )
        }

        _ => instruction(
            60,
            "Generate the FINAL SYNTHESIS - complete solution report with full evidence chain",
            vec![
                "executive summary engineering solution report".to_string(),
                "TRIZ case study final report structure".to_string(),
                format!("solution report {}", topic),
                "evidence chain traceability documentation".to_string(),
            ],
            &[
                "executive_summary",
                "triz_methodology_applied",
                "recommended_solution_details",
                "supporting_evidence",
                "implementation_roadmap",
                "future_triz_iterations",
            ],
            "Must synthesize ALL 59 steps into cohesive final solution with complete evidence chain",
            r#"{
  "executive_summary": "one-page summary of problem, method, and recommendation",
  "triz_methodology_applied": ["9 Boxes", "Ideality audit", "Function Analysis",
                               "Contradiction Matrix", "Standard Solutions", "Effects Database"],
  "recommended_solution_details": {"solution": "...", "ideality": 1.50, "how_it_works": "..."},
  "supporting_evidence": [{"claim": "...", "source_step": 48, "evidence": "..."}],
  "implementation_roadmap": "condensed from Step 59",
  "future_triz_iterations": ["next contradiction to attack after implementation"]
}"#,
            "The final synthesis is the deliverable. Every claim traces back to a validated \
             research step, which is what separates this from a brainstorm.",
        ),
    }
}

/// Number of candidate solutions produced by step 50
fn candidate_solution_count(knowledge: &Map<String, Value>) -> usize {
    knowledge_field(knowledge, "step_50", "complete_solutions")
        .and_then(|v| v.as_array())
        .map(|a| a.len())
        .filter(|&n| n > 0)
        .unwrap_or(3)
}

/// Name of the top-ranked solution selected in step 57
fn selected_solution_name(knowledge: &Map<String, Value>) -> String {
    knowledge_field(knowledge, "step_57", "selected_solutions")
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .and_then(|first| match first {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o
                .get("solution")
                .or_else(|| o.get("solution_name"))
                .and_then(|v| v.as_str())
                .map(String::from),
            _ => None,
        })
        .unwrap_or_else(|| "primary solution".to_string())
}

fn clip(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scoring_steps_count_candidate_solutions() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_50".to_string(),
            json!({"complete_solutions": [{"solution_name": "a"}, {"solution_name": "b"},
                   {"solution_name": "c"}, {"solution_name": "d"}]}),
        );
        let inst = generate(51, "p", &knowledge);
        assert!(inst.validation_criteria.contains("all 4 solutions"));
    }

    #[test]
    fn scoring_steps_default_to_three_solutions() {
        let inst = generate(52, "p", &Map::new());
        assert!(inst.validation_criteria.contains("all 3 solutions"));
    }

    #[test]
    fn step_57_declares_selection_alias() {
        let inst = generate(57, "p", &Map::new());
        assert_eq!(
            inst.knowledge_aliases,
            vec![("selected_solutions".to_string(), "final_selection".to_string())]
        );
    }

    #[test]
    fn implementation_steps_interpolate_selected_solution() {
        let mut knowledge = Map::new();
        knowledge.insert(
            "step_57".to_string(),
            json!({"selected_solutions": [
                {"rank": 1, "solution": "Modular Magnesium Segments"}
            ]}),
        );
        let inst = generate(58, "p", &knowledge);
        assert!(inst.search_queries[0].contains("Modular Magnesium Segments"));
        let inst = generate(59, "p", &knowledge);
        assert!(inst.search_queries[0].contains("Modular Magnesium Segments"));
    }

    #[test]
    fn implementation_steps_fall_back_without_selection() {
        let inst = generate(58, "p", &Map::new());
        assert!(inst.search_queries[0].contains("primary solution"));
    }

    #[test]
    fn final_step_requires_synthesis_fields() {
        let inst = generate(60, "p", &Map::new());
        assert!(inst.required_fields.contains(&"executive_summary".to_string()));
        assert!(inst
            .required_fields
            .contains(&"future_triz_iterations".to_string()));
        assert!(inst.validation_criteria.contains("ALL 59 steps"));
    }
}
