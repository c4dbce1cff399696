//! Session scoring: turns the answers of one completed assessment into a
//! [`Report`].
//!
//! Every category starts at the policy baseline. Each answered option adds
//! its configured impact, amplified when negative on a critical question and
//! then damped. Confidence rewards category coverage and penalizes spread
//! between individual impacts.
//!
//! The engine is pure: no I/O, no shared state, no failure modes. Callers
//! fetch answers and persist the resulting report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::category::{Category, PerCategory};
use crate::models::pattern::CanonicalPattern;
use crate::models::report::{RationaleEntry, Report};
use crate::services::recommendations::{
    self, ScoreSignals, RECOMMENDATION_RULES, STRENGTH_RULES,
};

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Confidence never drops below this fraction.
const CONFIDENCE_FLOOR: f64 = 0.4;
const COVERAGE_WEIGHT: f64 = 0.9;
const VARIANCE_PENALTY: f64 = 0.3;

/// Variance assumed when fewer than two impacts were recorded.
const LOW_DATA_VARIANCE: f64 = 0.2;

/// Standard deviation that maps to full (1.0) normalized variance.
const VARIANCE_SCALE: f64 = 10.0;

/// Numeric policy applied to every answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub baseline: f64,
    pub critical_multiplier: f64,
    pub damping: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            baseline: 70.0,
            critical_multiplier: 1.5,
            damping: 0.85,
        }
    }
}

/// One answered question, as fed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerForScoring {
    pub category: Category,
    #[serde(default)]
    pub pattern: CanonicalPattern,
    pub chosen_option: String,
    #[serde(default)]
    pub question_text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score a finalized session. Answer order only affects the rationale
    /// log and the input fingerprint.
    pub fn score(&self, answers: &[AnswerForScoring]) -> Report {
        let mut category_scores = PerCategory::uniform(self.policy.baseline);
        let mut answered = PerCategory::uniform(0u32);
        let mut risk_tag_tallies: BTreeMap<String, u32> = BTreeMap::new();
        let mut rationale = Vec::new();
        let mut impacts_seen = Vec::new();

        for answer in answers {
            let category = answer.category;
            let pattern = &answer.pattern;
            let chosen = answer.chosen_option.as_str();

            *answered.get_mut(category) += 1;

            if let Some(impact) = pattern.impact(category, chosen) {
                let delta = self.delta(impact, pattern.critical);
                *category_scores.get_mut(category) += delta;
                impacts_seen.push(delta);
            }

            for (tag, increments) in &pattern.risk_tags {
                match increments.get(chosen) {
                    Some(&inc) if inc > 0 => {
                        let tally = risk_tag_tallies.entry(tag.clone()).or_insert(0);
                        *tally = tally.saturating_add(inc);
                    }
                    _ => {}
                }
            }

            if let Some(note) = pattern.rationale.get(chosen).filter(|n| !n.is_empty()) {
                rationale.push(RationaleEntry {
                    question: answer.question_text.clone(),
                    note: note.clone(),
                });
            }
        }

        for category in Category::ALL {
            let score = category_scores.get_mut(category);
            *score = score.clamp(SCORE_MIN, SCORE_MAX);
        }

        let overall_score = overall_score(&category_scores);
        let confidence = confidence(&answered, &impacts_seen);

        let signals = ScoreSignals {
            category_scores: &category_scores,
            risk_tag_tallies: &risk_tag_tallies,
        };
        let recommendations =
            recommendations::synthesize_recommendations(RECOMMENDATION_RULES, &signals);
        let strengths = recommendations::synthesize_strengths(STRENGTH_RULES, &signals);
        let executive_summary =
            recommendations::executive_summary(overall_score, confidence, &category_scores);

        Report {
            category_scores,
            overall_score,
            confidence,
            risk_tag_tallies,
            recommendations,
            strengths,
            executive_summary,
            answered,
            rationale,
            input_fingerprint: self.fingerprint(answers),
        }
    }

    /// Critical amplification (negative impacts only), then damping.
    fn delta(&self, impact: f64, critical: bool) -> f64 {
        let amplified = if impact < 0.0 && critical {
            impact * self.policy.critical_multiplier
        } else {
            impact
        };
        amplified * self.policy.damping
    }

    /// SHA-256 over the policy and the ordered answers, hex-encoded.
    fn fingerprint(&self, answers: &[AnswerForScoring]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(
            format!(
                "policy:{}:{}:{}\n",
                self.policy.baseline, self.policy.critical_multiplier, self.policy.damping
            )
            .as_bytes(),
        );
        for answer in answers {
            hasher.update(
                format!(
                    "{}:{}:{}\n",
                    answer.category,
                    answer.chosen_option,
                    answer.pattern.to_payload()
                )
                .as_bytes(),
            );
        }
        hex::encode(hasher.finalize())
    }
}

/// Rounded mean over all three categories, answered or not.
fn overall_score(scores: &PerCategory<f64>) -> i32 {
    let total: f64 = scores.iter().map(|(_, s)| *s).sum();
    (total / Category::ALL.len() as f64).round() as i32
}

fn confidence(answered: &PerCategory<u32>, impacts: &[f64]) -> i32 {
    let covered = answered.iter().filter(|(_, n)| **n > 0).count();
    let coverage = covered as f64 / Category::ALL.len() as f64;
    let variance = normalized_variance(impacts);
    let raw = COVERAGE_WEIGHT * coverage - VARIANCE_PENALTY * variance;
    (100.0 * raw.max(CONFIDENCE_FLOOR)).round() as i32
}

/// Sample standard deviation scaled into 0..=1.
fn normalized_variance(impacts: &[f64]) -> f64 {
    if impacts.len() < 2 {
        return LOW_DATA_VARIANCE;
    }
    let n = impacts.len() as f64;
    let mean = impacts.iter().sum::<f64>() / n;
    let sum_sq: f64 = impacts.iter().map(|x| (x - mean).powi(2)).sum();
    let std_dev = (sum_sq / (n - 1.0)).sqrt();
    (std_dev / VARIANCE_SCALE).min(1.0)
}
