//! Structural validation of submitted findings
//!
//! Validation is deliberately shallow: presence of every required field plus
//! a non-triviality check on values. Semantic quality is the research
//! backend's job; this layer only keeps obviously incomplete submissions out
//! of the accumulated-knowledge chain that later steps depend on.

use serde_json::{Map, Value};

use crate::types::Instruction;

/// Minimum trimmed length for string-valued findings
const MIN_STRING_LEN: usize = 10;

/// Prefix length used when matching required fields against normalized keys
const KEY_PREFIX_LEN: usize = 20;

/// Outcome of validating findings against an instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid { message: String },
    Invalid { error: String, hint: String },
}

/// Check findings against the instruction's required fields and richness rules
pub fn validate(instruction: &Instruction, findings: &Map<String, Value>) -> Validation {
    let missing: Vec<&str> = instruction
        .required_fields
        .iter()
        .filter(|field| find_key(findings, field).is_none())
        .map(|s| s.as_str())
        .collect();

    if !missing.is_empty() {
        return Validation::Invalid {
            error: format!("Missing required fields: {}", missing.join(", ")),
            hint: format!(
                "Your findings must include every required field. Add: {}. \
                 Criteria: {}",
                missing.join(", "),
                instruction.validation_criteria
            ),
        };
    }

    for (key, value) in findings {
        match value {
            Value::String(s) => {
                if s.trim().len() < MIN_STRING_LEN {
                    return Validation::Invalid {
                        error: format!(
                            "Field '{}' is too brief ({} chars, minimum {})",
                            key,
                            s.trim().len(),
                            MIN_STRING_LEN
                        ),
                        hint: format!(
                            "Provide substantive research for '{}', not a placeholder. \
                             Expected shape: {}",
                            key,
                            instruction.expected_output_shape.trim()
                        ),
                    };
                }
            }
            Value::Array(a) if a.is_empty() => {
                return Validation::Invalid {
                    error: format!("Field '{}' is an empty list", key),
                    hint: format!("Populate '{}' with at least one entry", key),
                };
            }
            Value::Object(o) if o.is_empty() => {
                return Validation::Invalid {
                    error: format!("Field '{}' is an empty object", key),
                    hint: format!("Populate '{}' with research content", key),
                };
            }
            Value::Null => {
                return Validation::Invalid {
                    error: format!("Field '{}' is null", key),
                    hint: format!("Provide a value for '{}'", key),
                };
            }
            _ => {}
        }
    }

    Validation::Valid {
        message: format!("Step validated successfully: {}", instruction.title),
    }
}

/// Locate the findings key matching a required-field name
///
/// Exact match wins; otherwise keys are compared through the same lossy
/// normalization the field name gets (lowercase, spaces to underscores,
/// truncated prefix), which tolerates human-readable field names against
/// snake_case findings keys.
pub(crate) fn find_key<'a>(findings: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    if let Some((k, _)) = findings.get_key_value(field) {
        return Some(k.as_str());
    }
    let want = normalize(field);
    findings
        .keys()
        .find(|k| normalize(k) == want)
        .map(|k| k.as_str())
}

fn normalize(name: &str) -> String {
    let lowered: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    lowered.chars().take(KEY_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instruction(required: &[&str]) -> Instruction {
        Instruction {
            title: "Research Sub-System components".to_string(),
            task: "Break the system into components".to_string(),
            search_queries: vec!["system decomposition".to_string()],
            required_fields: required.iter().map(|s| s.to_string()).collect(),
            validation_criteria: "All components listed".to_string(),
            expected_output_shape: "{\"components\": []}".to_string(),
            rationale: "Context before solutions".to_string(),
            knowledge_aliases: Vec::new(),
        }
    }

    fn map(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn accepts_exact_keys() {
        let inst = instruction(&["components", "interactions"]);
        let findings = map(&[
            ("components", json!(["frame", "hinge", "panel"])),
            ("interactions", json!("Frame supports panel via hinge line")),
        ]);
        match validate(&inst, &findings) {
            Validation::Valid { message } => {
                assert!(message.contains("Research Sub-System components"));
            }
            other => panic!("expected valid, got {:?}", other),
        }
    }

    #[test]
    fn matches_normalized_field_names() {
        // Human-readable required field vs snake_case findings key
        let inst = instruction(&["System Description"]);
        let findings = map(&[(
            "system_description",
            json!("Sheet metal enclosure formed from 2mm aluminum"),
        )]);
        assert!(matches!(validate(&inst, &findings), Validation::Valid { .. }));
    }

    #[test]
    fn matches_on_truncated_prefix() {
        // Normalized forms agree on the first 20 chars
        let inst = instruction(&["competitors alternatives analysis"]);
        let findings = map(&[(
            "competitors_alternatives",
            json!("Three competing products use composite panels"),
        )]);
        assert!(matches!(validate(&inst, &findings), Validation::Valid { .. }));
    }

    #[test]
    fn rejects_listing_every_missing_field() {
        let inst = instruction(&["users", "user_needs", "market_context"]);
        let findings = map(&[("users", json!("Field technicians and installers"))]);
        match validate(&inst, &findings) {
            Validation::Invalid { error, hint } => {
                assert!(error.contains("user_needs"));
                assert!(error.contains("market_context"));
                assert!(!error.contains("users,"));
                assert!(hint.contains("user_needs"));
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn rejects_short_strings() {
        let inst = instruction(&["summary"]);
        let findings = map(&[("summary", json!("too short"))]);
        match validate(&inst, &findings) {
            Validation::Invalid { error, .. } => {
                assert!(error.contains("summary"));
                assert!(error.contains("minimum 10"));
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[test]
    fn trims_before_length_check() {
        let inst = instruction(&["summary"]);
        let findings = map(&[("summary", json!("   pad    "))]);
        assert!(matches!(
            validate(&inst, &findings),
            Validation::Invalid { .. }
        ));
    }

    #[test]
    fn rejects_empty_collections_and_null() {
        let inst = instruction(&["components"]);
        let findings = map(&[("components", json!([]))]);
        assert!(matches!(
            validate(&inst, &findings),
            Validation::Invalid { .. }
        ));

        let findings = map(&[("components", json!(null))]);
        assert!(matches!(
            validate(&inst, &findings),
            Validation::Invalid { .. }
        ));
    }

    #[test]
    fn non_string_values_skip_length_check() {
        let inst = instruction(&["scores"]);
        let findings = map(&[("scores", json!({"ideality": 1.57}))]);
        assert!(matches!(validate(&inst, &findings), Validation::Valid { .. }));
    }

    #[test]
    fn extra_fields_are_allowed_but_still_checked_for_richness() {
        let inst = instruction(&["components"]);
        let findings = map(&[
            ("components", json!(["frame", "panel"])),
            ("extra_note", json!("short")),
        ]);
        assert!(matches!(
            validate(&inst, &findings),
            Validation::Invalid { .. }
        ));
    }
}
