//! Externally authored question records, as received from content sources.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::category::Category;

/// A question as supplied by an upstream generator.
///
/// `patterns` is untyped: the generator may omit it, send a
/// partial shape, or use the wrong types. The normalizer turns it into a
/// [`CanonicalPattern`](crate::models::pattern::CanonicalPattern).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RawQuestion {
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub text: String,
    #[validate(
        length(min = 1, message = "at least one option is required"),
        custom(function = "validate_unique_options")
    )]
    pub options: Vec<String>,
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    pub patterns: Option<serde_json::Value>,
    #[serde(alias = "next")]
    pub next_logic: Option<serde_json::Value>,
    pub tags: Option<serde_json::Value>,
}

impl RawQuestion {
    /// The parsed category, if it belongs to the closed set.
    pub fn category(&self) -> Option<Category> {
        self.category.parse().ok()
    }
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    category.parse::<Category>().map(|_| ()).map_err(|e| {
        ValidationError::new("unknown_category").with_message(Cow::Owned(e.to_string()))
    })
}

fn validate_unique_options(options: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            return Err(ValidationError::new("duplicate_option")
                .with_message(Cow::Owned(format!("option '{option}' appears more than once"))));
        }
    }
    Ok(())
}
