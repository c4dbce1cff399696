//! Pattern normalizer: coerces loosely typed, externally authored scoring
//! payloads into a [`CanonicalPattern`].
//!
//! Normalization never fails. A malformed fragment is replaced by its safe
//! default (empty map or `false`), and weights are completed so every option
//! of the question is covered. Applying the normalizer to its own output is a
//! no-op, which keeps repeated upserts of the same question stable.
//!
//! This module contains no database access.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::models::category::Category;
use crate::models::pattern::{CanonicalPattern, CategoryWeights};
use crate::models::question::RawQuestion;

/// Five-point agreement scale and its bipolar default impacts.
const LIKERT_SCALE: [(&str, f64); 5] = [
    ("Strongly disagree", -10.0),
    ("Disagree", -4.0),
    ("Neutral", 0.0),
    ("Agree", 4.0),
    ("Strongly agree", 8.0),
];

/// A question paired with its canonical pattern, ready for persistence.
#[derive(Debug, Clone)]
pub struct NormalizedQuestion {
    pub id: String,
    pub question: RawQuestion,
    pub pattern: CanonicalPattern,
}

/// Normalize the scoring payload of one question.
pub fn normalize(question: &RawQuestion) -> CanonicalPattern {
    let payload = question.patterns.as_ref().and_then(Value::as_object);
    let field = |name| payload_field(payload, name);

    let mut weights = match field("weights").and_then(Value::as_object) {
        Some(raw) => coerce_weights(raw),
        None => {
            tracing::debug!(
                category = %question.category,
                "Pattern payload has no usable weights, applying default weights"
            );
            default_weights(question)
        }
    };
    complete_weights(&mut weights, &question.options);

    let risk_tags = field("risk_tags")
        .and_then(Value::as_object)
        .map(coerce_risk_tags)
        .unwrap_or_default();

    let critical = field("critical").and_then(Value::as_bool).unwrap_or(false);

    let rationale = field("rationale")
        .and_then(Value::as_object)
        .map(coerce_rationale)
        .unwrap_or_default();

    CanonicalPattern {
        weights,
        risk_tags,
        critical,
        rationale,
    }
}

fn payload_field<'a>(payload: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    payload.and_then(|p| p.get(name))
}

/// Normalize a batch of questions keyed by id, preserving input order.
///
/// Each question is handled independently; there is no cross-question state.
pub fn normalize_batch(questions: IndexMap<String, RawQuestion>) -> Vec<NormalizedQuestion> {
    questions
        .into_iter()
        .map(|(id, question)| {
            let pattern = normalize(&question);
            NormalizedQuestion {
                id,
                question,
                pattern,
            }
        })
        .collect()
}

/// Default weights: Likert template or zero-fill, in the question's own
/// category only. Unknown categories get no weights at all.
fn default_weights(question: &RawQuestion) -> CategoryWeights {
    let mut weights = CategoryWeights::default();
    let Some(category) = question.category() else {
        return weights;
    };

    let is_likert = question
        .options
        .iter()
        .all(|option| likert_impact(option).is_some());

    let map = weights.get_mut(category);
    for option in &question.options {
        let impact = if is_likert {
            likert_impact(option).unwrap_or(0.0)
        } else {
            0.0
        };
        map.insert(option.clone(), impact);
    }
    weights
}

fn likert_impact(option: &str) -> Option<f64> {
    LIKERT_SCALE
        .iter()
        .find(|(label, _)| *label == option)
        .map(|(_, impact)| *impact)
}

/// Keep the three known category maps; non-numeric impacts become neutral.
fn coerce_weights(raw: &Map<String, Value>) -> CategoryWeights {
    let mut weights = CategoryWeights::default();
    for category in Category::ALL {
        let Some(entries) = raw.get(category.as_str()).and_then(Value::as_object) else {
            continue;
        };
        let map = weights.get_mut(category);
        for (option, impact) in entries {
            map.insert(option.clone(), impact.as_f64().unwrap_or(0.0));
        }
    }
    weights
}

/// Fill every option missing from a non-empty category map with 0.
fn complete_weights(weights: &mut CategoryWeights, options: &[String]) {
    for category in Category::ALL {
        let map = weights.get_mut(category);
        if map.is_empty() {
            continue;
        }
        for option in options {
            map.entry(option.clone()).or_insert(0.0);
        }
    }
}

fn coerce_risk_tags(raw: &Map<String, Value>) -> IndexMap<String, IndexMap<String, u32>> {
    raw.iter()
        .map(|(tag, options)| {
            let increments = options
                .as_object()
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|(option, inc)| {
                            as_increment(inc).map(|inc| (option.clone(), inc))
                        })
                        .collect()
                })
                .unwrap_or_default();
            (tag.clone(), increments)
        })
        .collect()
}

/// Accept non-negative integers, including integral floats such as `2.0`.
fn as_increment(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

fn coerce_rationale(raw: &Map<String, Value>) -> IndexMap<String, String> {
    raw.iter()
        .filter_map(|(option, note)| note.as_str().map(|n| (option.clone(), n.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIKERT: [&str; 5] = [
        "Strongly disagree",
        "Disagree",
        "Neutral",
        "Agree",
        "Strongly agree",
    ];

    fn question(category: &str, options: &[&str], patterns: Option<Value>) -> RawQuestion {
        RawQuestion {
            text: "How do you handle unexpected payment requests?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            category: category.to_string(),
            patterns,
            next_logic: None,
            tags: None,
        }
    }

    fn renormalize(q: &RawQuestion) -> CanonicalPattern {
        let once = normalize(q);
        let mut again = q.clone();
        again.patterns = Some(once.to_payload());
        normalize(&again)
    }

    #[test]
    fn likert_options_get_bipolar_template_in_own_category() {
        let q = question("behavioral", &LIKERT, None);
        let pattern = normalize(&q);

        let map = &pattern.weights.behavioral;
        assert_eq!(map["Strongly disagree"], -10.0);
        assert_eq!(map["Disagree"], -4.0);
        assert_eq!(map["Neutral"], 0.0);
        assert_eq!(map["Agree"], 4.0);
        assert_eq!(map["Strongly agree"], 8.0);
        assert!(pattern.weights.technical.is_empty());
        assert!(pattern.weights.psychological.is_empty());
    }

    #[test]
    fn likert_subset_still_uses_template() {
        let q = question("technical", &["Agree", "Disagree"], None);
        let pattern = normalize(&q);
        assert_eq!(pattern.weights.technical["Agree"], 4.0);
        assert_eq!(pattern.weights.technical["Disagree"], -4.0);
    }

    #[test]
    fn non_likert_options_are_zero_filled() {
        let q = question("technical", &["Always", "Sometimes", "Agree"], None);
        let pattern = normalize(&q);
        let map = &pattern.weights.technical;
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|v| *v == 0.0));
    }

    #[test]
    fn weights_keep_option_order() {
        let q = question("technical", &["Never", "Weekly", "Daily"], None);
        let pattern = normalize(&q);
        let keys: Vec<_> = pattern.weights.technical.keys().cloned().collect();
        assert_eq!(keys, vec!["Never", "Weekly", "Daily"]);
    }

    #[test]
    fn supplied_weights_are_completed_with_neutral_impacts() {
        let q = question(
            "technical",
            &["Never", "Sometimes", "Always"],
            Some(json!({
                "weights": {
                    "technical": {"Never": -8},
                    "psychological": {"Always": 3}
                }
            })),
        );
        let pattern = normalize(&q);

        assert_eq!(pattern.weights.technical["Never"], -8.0);
        assert_eq!(pattern.weights.technical["Sometimes"], 0.0);
        assert_eq!(pattern.weights.technical["Always"], 0.0);
        assert_eq!(pattern.weights.psychological.len(), 3);
        assert_eq!(pattern.weights.psychological["Always"], 3.0);
        assert!(pattern.weights.behavioral.is_empty());
    }

    #[test]
    fn every_non_empty_map_covers_all_options() {
        let options = ["A", "B", "C", "D"];
        let q = question(
            "behavioral",
            &options,
            Some(json!({"weights": {"behavioral": {"B": 2}, "technical": {"Z": 1}}})),
        );
        let pattern = normalize(&q);
        for (_, map) in pattern.weights.iter() {
            if map.is_empty() {
                continue;
            }
            for option in options {
                assert!(map.contains_key(option), "missing option {option}");
            }
        }
    }

    #[test]
    fn supplied_weights_win_over_likert_default() {
        let q = question(
            "behavioral",
            &LIKERT,
            Some(json!({"weights": {"behavioral": {"Agree": 1}}})),
        );
        let pattern = normalize(&q);
        assert_eq!(pattern.weights.behavioral["Agree"], 1.0);
        assert_eq!(pattern.weights.behavioral["Strongly disagree"], 0.0);
    }

    #[test]
    fn non_mapping_weights_fall_back_to_default() {
        let q = question("behavioral", &LIKERT, Some(json!({"weights": [1, 2, 3]})));
        let pattern = normalize(&q);
        assert_eq!(pattern.weights.behavioral["Strongly disagree"], -10.0);
    }

    #[test]
    fn generator_specific_keys_are_dropped() {
        let q = question(
            "behavioral",
            &["Buy now", "Check reviews"],
            Some(json!({"weights": {"FOMO_Trigger": {"Buy now": 3}}})),
        );
        let pattern = normalize(&q);
        assert!(pattern.weights.iter().all(|(_, m)| m.is_empty()));
    }

    #[test]
    fn non_numeric_impact_becomes_neutral() {
        let q = question(
            "technical",
            &["Yes", "No"],
            Some(json!({"weights": {"technical": {"Yes": "high", "No": -3.5}}})),
        );
        let pattern = normalize(&q);
        assert_eq!(pattern.weights.technical["Yes"], 0.0);
        assert_eq!(pattern.weights.technical["No"], -3.5);
    }

    #[test]
    fn malformed_fragments_get_safe_defaults() {
        let q = question(
            "psychological",
            &["Yes", "No"],
            Some(json!({
                "risk_tags": "phishing",
                "critical": "true",
                "rationale": ["nope"]
            })),
        );
        let pattern = normalize(&q);
        assert!(pattern.risk_tags.is_empty());
        assert!(!pattern.critical);
        assert!(pattern.rationale.is_empty());
    }

    #[test]
    fn payload_that_is_not_an_object_is_ignored() {
        let q = question("technical", &["Yes", "No"], Some(json!("garbage")));
        let pattern = normalize(&q);
        assert_eq!(pattern.weights.technical.len(), 2);
        assert!(!pattern.critical);
    }

    #[test]
    fn unknown_category_gets_no_default_weights() {
        let q = question("background", &LIKERT, None);
        let pattern = normalize(&q);
        assert!(pattern.weights.iter().all(|(_, m)| m.is_empty()));
    }

    #[test]
    fn risk_tags_keep_only_non_negative_integer_increments() {
        let q = question(
            "behavioral",
            &["Click", "Report", "Ignore"],
            Some(json!({
                "risk_tags": {
                    "phishingAwareness": {"Click": 2, "Report": -1, "Ignore": 1.0},
                    "deviceSecurity": {"Click": 0.5},
                    "broken": 7
                }
            })),
        );
        let pattern = normalize(&q);
        let phishing = &pattern.risk_tags["phishingAwareness"];
        assert_eq!(phishing.get("Click"), Some(&2));
        assert_eq!(phishing.get("Report"), None);
        assert_eq!(phishing.get("Ignore"), Some(&1));
        assert!(pattern.risk_tags["deviceSecurity"].is_empty());
        assert!(pattern.risk_tags["broken"].is_empty());
    }

    #[test]
    fn increments_beyond_u32_are_dropped() {
        let q = question(
            "behavioral",
            &["Click", "Forward"],
            Some(json!({
                "risk_tags": {
                    "phishingAwareness": {"Click": 4294967295u64, "Forward": 4294967296u64}
                }
            })),
        );
        let phishing = &normalize(&q).risk_tags["phishingAwareness"];
        assert_eq!(phishing.get("Click"), Some(&u32::MAX));
        assert_eq!(phishing.get("Forward"), None);
    }

    #[test]
    fn critical_and_rationale_pass_through() {
        let q = question(
            "technical",
            &["Yes", "No"],
            Some(json!({
                "critical": true,
                "rationale": {"No": "Unpatched devices are a common entry point.", "Yes": 4}
            })),
        );
        let pattern = normalize(&q);
        assert!(pattern.critical);
        assert_eq!(
            pattern.rationale.get("No").map(String::as_str),
            Some("Unpatched devices are a common entry point.")
        );
        assert!(!pattern.rationale.contains_key("Yes"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = vec![
            question("behavioral", &LIKERT, None),
            question("technical", &["Always", "Never"], None),
            question("background", &["Alone", "Family"], None),
            question(
                "technical",
                &["Never", "Sometimes", "Always"],
                Some(json!({
                    "weights": {"technical": {"Never": -10}, "behavioral": {"Always": 2}},
                    "risk_tags": {"deviceSecurity": {"Never": 1}},
                    "critical": true,
                    "rationale": {"Never": "Auto-lock protects unattended devices."}
                })),
            ),
            question(
                "psychological",
                &["Yes", "No"],
                Some(json!({"weights": "oops", "critical": 1, "risk_tags": []})),
            ),
        ];

        for q in cases {
            assert_eq!(renormalize(&q), normalize(&q), "question {:?}", q.patterns);
        }
    }

    #[test]
    fn batch_preserves_order_and_normalizes_each() {
        let mut batch = IndexMap::new();
        batch.insert("q-2".to_string(), question("technical", &["Yes", "No"], None));
        batch.insert("q-1".to_string(), question("behavioral", &LIKERT, None));

        let normalized = normalize_batch(batch);
        let ids: Vec<_> = normalized.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["q-2", "q-1"]);
        assert_eq!(normalized[1].pattern.weights.behavioral["Agree"], 4.0);
    }
}
