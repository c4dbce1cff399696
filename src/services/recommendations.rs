//! Rule tables turning category scores and risk-tag tallies into
//! recommendations, strengths, and the executive summary.
//!
//! Recommendation rules are grouped into families. Within a family the first
//! matching rule wins; families are evaluated independently, in table order.
//! The resulting list is deduplicated by text, keeping the first occurrence.

use std::collections::{BTreeMap, HashSet};

use crate::models::category::PerCategory;
use crate::models::report::{Priority, Recommendation};

const PHISHING_AWARENESS: &str = "phishingAwareness";
const DEVICE_SECURITY: &str = "deviceSecurity";

/// Category score below which a category-driven recommendation fires.
const WEAK_CATEGORY_THRESHOLD: f64 = 70.0;

/// Category score at or above which a strength is reported.
const STRONG_CATEGORY_THRESHOLD: f64 = 85.0;

/// Aggregates the rules are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ScoreSignals<'a> {
    pub category_scores: &'a PerCategory<f64>,
    pub risk_tag_tallies: &'a BTreeMap<String, u32>,
}

impl ScoreSignals<'_> {
    /// Tally for `tag`, treating an absent tag as zero.
    pub fn tally(&self, tag: &str) -> u32 {
        self.risk_tag_tallies.get(tag).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Phishing,
    DeviceSecurity,
    TechnicalPosture,
    BehavioralPosture,
    PsychologicalPosture,
}

#[derive(Clone, Copy)]
pub struct RecommendationRule {
    pub family: RuleFamily,
    pub priority: Priority,
    pub text: &'static str,
    pub applies: fn(&ScoreSignals<'_>) -> bool,
}

#[derive(Clone, Copy)]
pub struct StrengthRule {
    pub text: &'static str,
    pub applies: fn(&ScoreSignals<'_>) -> bool,
}

pub const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        family: RuleFamily::Phishing,
        priority: Priority::Critical,
        text: "Verify any urgent payment/reset requests via an out-of-band channel before acting.",
        applies: repeated_phishing_susceptibility,
    },
    RecommendationRule {
        family: RuleFamily::Phishing,
        priority: Priority::Important,
        text: "Spend 10 minutes on anti-phishing drills this week; hover links and check domains.",
        applies: single_phishing_susceptibility,
    },
    RecommendationRule {
        family: RuleFamily::DeviceSecurity,
        priority: Priority::Important,
        text: "Enforce full-disk encryption and auto-lock on all endpoints, including BYOD.",
        applies: weak_device_security,
    },
    RecommendationRule {
        family: RuleFamily::TechnicalPosture,
        priority: Priority::Critical,
        text: "Adopt a password manager and enable MFA on email, VPN, and finance apps.",
        applies: weak_technical,
    },
    RecommendationRule {
        family: RuleFamily::BehavioralPosture,
        priority: Priority::Important,
        text: "Schedule quarterly phishing simulations and just-in-time micro-training.",
        applies: weak_behavioral,
    },
    RecommendationRule {
        family: RuleFamily::PsychologicalPosture,
        priority: Priority::Suggested,
        text: "Use \u{2018}pause and verify\u{2019} for high-pressure requests; reduce single-person approvals.",
        applies: weak_psychological,
    },
];

pub const STRENGTH_RULES: &[StrengthRule] = &[
    StrengthRule {
        text: "Solid device and credential hygiene.",
        applies: strong_technical,
    },
    StrengthRule {
        text: "Good phishing vigilance.",
        applies: no_phishing_susceptibility,
    },
    StrengthRule {
        text: "Consistent safe behaviors across scenarios.",
        applies: strong_behavioral,
    },
];

fn repeated_phishing_susceptibility(s: &ScoreSignals<'_>) -> bool {
    s.tally(PHISHING_AWARENESS) >= 2
}

fn single_phishing_susceptibility(s: &ScoreSignals<'_>) -> bool {
    s.tally(PHISHING_AWARENESS) == 1
}

fn no_phishing_susceptibility(s: &ScoreSignals<'_>) -> bool {
    s.tally(PHISHING_AWARENESS) == 0
}

fn weak_device_security(s: &ScoreSignals<'_>) -> bool {
    s.tally(DEVICE_SECURITY) >= 2
}

fn weak_technical(s: &ScoreSignals<'_>) -> bool {
    s.category_scores.technical < WEAK_CATEGORY_THRESHOLD
}

fn weak_behavioral(s: &ScoreSignals<'_>) -> bool {
    s.category_scores.behavioral < WEAK_CATEGORY_THRESHOLD
}

fn weak_psychological(s: &ScoreSignals<'_>) -> bool {
    s.category_scores.psychological < WEAK_CATEGORY_THRESHOLD
}

fn strong_technical(s: &ScoreSignals<'_>) -> bool {
    s.category_scores.technical >= STRONG_CATEGORY_THRESHOLD
}

fn strong_behavioral(s: &ScoreSignals<'_>) -> bool {
    s.category_scores.behavioral >= STRONG_CATEGORY_THRESHOLD
}

/// Evaluate a recommendation rule table.
pub fn synthesize_recommendations(
    rules: &[RecommendationRule],
    signals: &ScoreSignals<'_>,
) -> Vec<Recommendation> {
    let mut matched_families: Vec<RuleFamily> = Vec::new();
    let mut seen_texts: HashSet<&str> = HashSet::new();
    let mut recommendations = Vec::new();

    for rule in rules {
        if matched_families.contains(&rule.family) || !(rule.applies)(signals) {
            continue;
        }
        matched_families.push(rule.family);

        if seen_texts.insert(rule.text) {
            recommendations.push(Recommendation {
                priority: rule.priority,
                text: rule.text.to_string(),
            });
        }
    }

    recommendations
}

/// Evaluate a strength rule table; every matching rule contributes.
pub fn synthesize_strengths(rules: &[StrengthRule], signals: &ScoreSignals<'_>) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(signals))
        .map(|rule| rule.text.to_string())
        .collect()
}

/// One-paragraph summary embedding the headline numbers verbatim.
pub fn executive_summary(
    overall_score: i32,
    confidence: i32,
    category_scores: &PerCategory<f64>,
) -> String {
    format!(
        "Overall score {overall_score}% (confidence {confidence}%). \
         Tech {}%, Behavioral {}%, Psychological {}%. \
         Focus on the recommendations below to lower risk in the next 30 days.",
        category_scores.technical, category_scores.behavioral, category_scores.psychological,
    )
}
