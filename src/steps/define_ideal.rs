//! Phase 2: Define Ideal Outcome (steps 11-16)
//!
//! The "North Star" phase: wish lists without constraints, cross-domain
//! research, and a full inventory of available resources.

use crate::types::Instruction;

use super::{instruction, topic};

pub fn generate(step: u32, problem: &str) -> Instruction {
    let topic = topic(problem);

    match step {
        11 => instruction(
            11,
            "Create Ideal Outcome wish list - ALL desired benefits without constraints",
            vec![
                format!("ideal perfect solution {}", topic),
                format!("utopian best case scenario {}", topic),
                "user dream requirements wishlist".to_string(),
                "impossible features desired capabilities".to_string(),
            ],
            &[
                "prime_benefit",
                "ultimate_goal",
                "wish_list",
                "constraints_to_ignore",
            ],
            "Must list at least 8 desired benefits without considering feasibility",
            r#"{
  "prime_benefit": "Component is perfectly lightweight and perfectly formable",
  "ultimate_goal": "Zero-weight structural component that shapes itself",
  "wish_list": ["Weighs nothing", "Forms itself to any shape", "Never fails"],
  "constraints_to_ignore": ["physics laws", "budget", "current technology"]
}"#,
            "Ideal Outcome breaks psychological inertia. Even 'impossible' wishes guide \
             toward breakthrough solutions.",
        ),

        12 => instruction(
            12,
            "Research how other domains achieve similar ideal outcomes",
            vec![
                format!("cross-domain solutions {}", topic),
                "nature biomimicry analogous solutions".to_string(),
                "aerospace automotive similar problems solved".to_string(),
                "other industries similar problems solved".to_string(),
            ],
            &[
                "cross_domain_examples",
                "nature_solutions",
                "analogous_problems",
                "transfer_potential",
            ],
            "Must find at least 3 cross-domain examples with specific details",
            r#"{
  "cross_domain_examples": [
    {"domain": "nature - bird bones", "solution": "hollow structure, light + strong",
     "principle": "segmentation + porous materials", "transfer": "honeycomb core sheet"}
  ],
  "nature_solutions": ["bird bones", "bamboo"],
  "analogous_problems": ["aircraft panel weight"],
  "transfer_potential": "sandwich composites directly applicable"
}"#,
            "Solutions already exist in other domains. Cross-domain transfer is a powerful \
             TRIZ strategy.",
        ),

        13 => instruction(
            13,
            "Identify ALL available Resources (Substance, Field, Space, Time, Information)",
            vec![
                format!("available resources materials {}", topic),
                format!("existing components capabilities {}", topic),
                format!("energy forces fields available {}", topic),
                "waste byproducts reusable resources".to_string(),
            ],
            &[
                "substance_resources",
                "field_resources",
                "space_resources",
                "time_resources",
                "information_resources",
            ],
            "Must identify at least 10 resources across all 5 types",
            r#"{
  "substance_resources": [{"name": "aluminum available", "location": "system", "potential": "current material"}],
  "field_resources": [{"name": "gravity", "location": "super-system", "potential": "free force"}],
  "space_resources": [{"name": "20cm x 4cm area", "location": "system", "potential": "design space"}],
  "time_resources": [{"name": "assembly time", "location": "manufacturing", "potential": "forming window"}],
  "information_resources": [{"name": "user patterns", "location": "super-system", "potential": "optimization"}]
}"#,
            "Resources thinking means getting benefits WITHOUT adding new things. Key to \
             increasing Ideality.",
        ),

        14 => instruction(
            14,
            "Research how others cleverly use similar resources",
            vec![
                "waste heat utilization manufacturing".to_string(),
                "vibration energy harvesting applications".to_string(),
                "gravity assist mechanisms designs".to_string(),
                "clever resource usage examples TRIZ".to_string(),
            ],
            &[
                "resource_usage_examples",
                "applicable_to_problem",
                "inspiration_sources",
            ],
            "Must find at least 4 resource utilization examples from research",
            r#"{
  "resource_usage_examples": [
    {"resource": "waste heat", "use": "thermoforming during manufacturing",
     "source": "manufacturing_handbook", "applicability": "HIGH"}
  ],
  "applicable_to_problem": ["waste heat forming"],
  "inspiration_sources": ["manufacturing_handbook"]
}"#,
            "Learning how others use resources provides ready-made solutions requiring no \
             new inputs.",
        ),

        15 => instruction(
            15,
            "Define IDEAL SYSTEM in 9 Boxes - how would perfection look?",
            vec![
                "ideal system characteristics perfect solution".to_string(),
                format!("future ideal state {}", topic),
                "breakthrough innovations revolutionary designs".to_string(),
            ],
            &[
                "ideal_sub_system",
                "ideal_system",
                "ideal_super_system",
                "path_to_ideal",
            ],
            "Must define ideal state for all 9 boxes",
            r#"{
  "ideal_sub_system": "Zero-weight self-forming smart material",
  "ideal_system": "Adaptive structure that shapes itself",
  "ideal_super_system": "Seamless integration with user environment",
  "path_to_ideal": "current material -> lighter substitute -> future materials"
}"#,
            "Ideal System in 9 Boxes shows the North Star across all system levels and time.",
        ),

        _ => instruction(
            16,
            "Calculate IDEAL Ideality target score",
            vec![
                "ideality maximization TRIZ methodology".to_string(),
                "perfect system characteristics infinite benefits".to_string(),
                "zero cost zero harm ideal calculation".to_string(),
            ],
            &[
                "ideal_benefits_total",
                "ideal_costs",
                "ideal_harms",
                "ideal_ideality_score",
                "gap_from_current",
            ],
            "Must calculate ideal Ideality and compare to current from Step 9",
            r#"{
  "ideal_benefits_total": 100.0, "ideal_costs": 5.0, "ideal_harms": 0.0,
  "ideal_ideality_score": 20.0,
  "gap_from_current": {"current": 0.904, "ideal": 20.0, "gap": "22x improvement needed"}
}"#,
            "Ideal Ideality target quantifies how much improvement is possible and guides \
             priorities.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_step_requires_all_five_types() {
        let inst = generate(13, "p");
        assert_eq!(inst.required_fields.len(), 5);
        for field in [
            "substance_resources",
            "field_resources",
            "space_resources",
            "time_resources",
            "information_resources",
        ] {
            assert!(inst.required_fields.contains(&field.to_string()));
        }
    }

    #[test]
    fn ideal_target_references_step_9() {
        let inst = generate(16, "p");
        assert!(inst.validation_criteria.contains("Step 9"));
    }
}
