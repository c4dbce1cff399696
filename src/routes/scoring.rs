//! Scoring preview: run the engine on caller-supplied answers.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::category::Category;
use crate::models::pattern::CanonicalPattern;
use crate::models::report::Report;
use crate::services::scoring::AnswerForScoring;
use crate::AppState;

/// Answer as sent over the wire; the category is checked before scoring.
#[derive(Debug, Deserialize)]
pub struct ScoringAnswerInput {
    pub category: String,
    #[serde(default)]
    pub pattern: Option<CanonicalPattern>,
    pub chosen_option: String,
    #[serde(default)]
    pub question_text: Option<String>,
}

impl ScoringAnswerInput {
    fn into_answer(self, index: usize) -> Result<AnswerForScoring, AppError> {
        let category: Category = self
            .category
            .parse()
            .map_err(|e| AppError::Validation(format!("answer {index}: {e}")))?;
        Ok(AnswerForScoring {
            category,
            pattern: self.pattern.unwrap_or_default(),
            chosen_option: self.chosen_option,
            question_text: self.question_text,
        })
    }
}

/// POST /api/v1/scoring/preview: score answers without persisting a report.
pub async fn preview(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<Vec<ScoringAnswerInput>>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let answers = input
        .into_iter()
        .enumerate()
        .map(|(i, answer)| answer.into_answer(i))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ApiResponse::success(state.engine.score(&answers)))
}
