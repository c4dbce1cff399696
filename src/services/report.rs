//! Report generation and retrieval for completed assessment sessions.
//!
//! Loads a session's answers with their question metadata, runs the
//! scoring engine, and upserts the result keyed by session id so that
//! recomputation overwrites the previous report.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::category::Category;
use crate::models::question::RawQuestion;
use crate::models::report::{Report, StoredReport};
use crate::services::normalizer;
use crate::services::scoring::{AnswerForScoring, ScoringEngine};

const STATUS_COMPLETED: &str = "completed";

/// One recorded answer joined with the question it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    pub question_id: String,
    pub question_text: String,
    pub category: String,
    pub options: Option<serde_json::Value>,
    pub patterns: Option<serde_json::Value>,
    pub answer_text: String,
}

/// Convert stored answer rows into engine input.
///
/// Stored patterns go back through the normalizer, so an off-shape fragment
/// falls back to its own default while the rest of the pattern still scores.
/// A category outside the closed set is a validation error: the engine only
/// accepts known categories.
pub fn answers_for_scoring(rows: Vec<AnswerRow>) -> Result<Vec<AnswerForScoring>, AppError> {
    rows.into_iter()
        .map(|row| {
            let category: Category = row.category.parse().map_err(|e| {
                AppError::Validation(format!("question '{}': {e}", row.question_id))
            })?;

            let question = RawQuestion {
                text: row.question_text,
                options: stored_options(row.options.as_ref()),
                category: row.category,
                patterns: row.patterns,
                next_logic: None,
                tags: None,
            };
            let pattern = normalizer::normalize(&question);

            Ok(AnswerForScoring {
                category,
                pattern,
                chosen_option: row.answer_text,
                question_text: Some(question.text),
            })
        })
        .collect()
}

/// String entries of the stored options array; anything else is skipped.
fn stored_options(options: Option<&serde_json::Value>) -> Vec<String> {
    options
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Score a completed session and persist its report.
pub async fn generate_report(
    pool: &PgPool,
    engine: &ScoringEngine,
    session_id: Uuid,
) -> Result<Report, AppError> {
    let status: Option<String> =
        sqlx::query_scalar("SELECT status FROM assessments WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(pool)
            .await?;

    match status.as_deref() {
        None => return Err(AppError::NotFound(format!("Session {session_id} not found"))),
        Some(STATUS_COMPLETED) => {}
        Some(other) => {
            return Err(AppError::Conflict(format!(
                "Session {session_id} is {other}; reports are generated for completed sessions only"
            )))
        }
    }

    let rows = sqlx::query_as::<_, AnswerRow>(
        r#"
        SELECT q.id AS question_id, q.text AS question_text, q.category, q.options, q.patterns, a.answer_text
        FROM answers a
        JOIN questions q ON a.question_id = q.id
        WHERE a.session_id = $1
        ORDER BY a.created_at, a.id
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let answers = answers_for_scoring(rows)?;
    let report = engine.score(&answers);

    upsert_report(pool, session_id, &report).await?;

    tracing::info!(
        session_id = %session_id,
        answers = answers.len(),
        overall_score = report.overall_score,
        confidence = report.confidence,
        "Report generated"
    );

    Ok(report)
}

async fn upsert_report(pool: &PgPool, session_id: Uuid, report: &Report) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO reports (session_id, overall_score, confidence, category_scores, risk_tag_tallies,
                             recommendations, strengths, rationale, executive_summary, input_fingerprint, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
        ON CONFLICT (session_id) DO UPDATE SET
            overall_score = EXCLUDED.overall_score,
            confidence = EXCLUDED.confidence,
            category_scores = EXCLUDED.category_scores,
            risk_tag_tallies = EXCLUDED.risk_tag_tallies,
            recommendations = EXCLUDED.recommendations,
            strengths = EXCLUDED.strengths,
            rationale = EXCLUDED.rationale,
            executive_summary = EXCLUDED.executive_summary,
            input_fingerprint = EXCLUDED.input_fingerprint,
            created_at = NOW()
        "#,
    )
    .bind(session_id)
    .bind(report.overall_score)
    .bind(report.confidence)
    .bind(to_json(&report.category_scores)?)
    .bind(to_json(&report.risk_tag_tallies)?)
    .bind(to_json(&report.recommendations)?)
    .bind(to_json(&report.strengths)?)
    .bind(to_json(&report.rationale)?)
    .bind(&report.executive_summary)
    .bind(&report.input_fingerprint)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a stored report. Visible to the session owner and to admins.
pub async fn get_report(
    pool: &PgPool,
    session_id: Uuid,
    user: &CurrentUser,
) -> Result<StoredReport, AppError> {
    sqlx::query_as::<_, StoredReport>(
        r#"
        SELECT r.*
        FROM reports r
        JOIN assessments a ON r.session_id = a.session_id
        WHERE r.session_id = $1 AND (a.user_id = $2 OR $3)
        "#,
    )
    .bind(session_id)
    .bind(user.id)
    .bind(user.role.is_admin())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound("Report not found or you do not have permission to view it".to_string())
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("Failed to serialize report field: {e}")))
}
