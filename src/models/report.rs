//! Risk report produced for one completed assessment session.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::category::PerCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    Suggested,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Important => write!(f, "important"),
            Self::Suggested => write!(f, "suggested"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub text: String,
}

/// Explanation attached to a chosen option, in answered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationaleEntry {
    pub question: Option<String>,
    pub note: String,
}

/// Computed report. A pure value: same answers, same report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub category_scores: PerCategory<f64>,
    pub overall_score: i32,
    pub confidence: i32,
    pub risk_tag_tallies: BTreeMap<String, u32>,
    pub recommendations: Vec<Recommendation>,
    pub strengths: Vec<String>,
    pub executive_summary: String,
    pub answered: PerCategory<u32>,
    pub rationale: Vec<RationaleEntry>,
    /// SHA-256 over the ordered scoring inputs.
    pub input_fingerprint: String,
}

/// Report row as persisted, keyed by session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredReport {
    pub session_id: Uuid,
    pub overall_score: i32,
    pub confidence: i32,
    pub category_scores: serde_json::Value,
    pub risk_tag_tallies: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub strengths: serde_json::Value,
    pub rationale: serde_json::Value,
    pub executive_summary: String,
    pub input_fingerprint: String,
    pub created_at: DateTime<Utc>,
}
