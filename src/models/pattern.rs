//! Canonical scoring pattern attached to a question.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::category::{Category, PerCategory};

/// Option text → signed impact, one map per category.
pub type CategoryWeights = PerCategory<IndexMap<String, f64>>;

/// Fully validated, default-completed scoring metadata for one question.
///
/// Invariant: every non-empty weight map contains every option of the
/// question it was normalized from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalPattern {
    pub weights: CategoryWeights,
    pub risk_tags: IndexMap<String, IndexMap<String, u32>>,
    pub critical: bool,
    pub rationale: IndexMap<String, String>,
}

impl CanonicalPattern {
    /// Weight of `option` in the map for `category`, if configured.
    pub fn impact(&self, category: Category, option: &str) -> Option<f64> {
        self.weights.get(category).get(option).copied()
    }

    /// The JSON payload persisted alongside the question.
    ///
    /// Feeding this back into the normalizer yields the same pattern.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
