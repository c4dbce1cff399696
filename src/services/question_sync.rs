//! Batch upsert of externally authored questions.
//!
//! Every question in a batch is validated first; a single invalid entry
//! rejects the whole batch. Valid questions are normalized and written in
//! one transaction, bumping `version` on questions that already exist.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::question::RawQuestion;
use crate::services::normalizer;

/// Summary of a sync run.
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub synced: usize,
    pub question_ids: Vec<String>,
}

/// Check every question in the batch, collecting all problems.
pub fn validate_batch(questions: &IndexMap<String, RawQuestion>) -> Result<(), AppError> {
    let problems: Vec<String> = questions
        .iter()
        .filter_map(|(id, question)| {
            if id.trim().is_empty() {
                return Some("question id must not be empty".to_string());
            }
            question.validate().err().map(|e| format!("{id}: {e}"))
        })
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Invalid questions: {}",
            problems.join("; ")
        )))
    }
}

/// Validate, normalize, and upsert a batch of questions keyed by id.
pub async fn sync_questions(
    pool: &PgPool,
    questions: IndexMap<String, RawQuestion>,
) -> Result<SyncResult, AppError> {
    validate_batch(&questions)?;

    let normalized = normalizer::normalize_batch(questions);
    let mut tx = pool.begin().await?;

    for item in &normalized {
        let q = &item.question;
        sqlx::query(
            r#"
            INSERT INTO questions (id, text, options, category, next_logic, patterns, version, is_active, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 1, TRUE, $7, NOW(), NOW())
            ON CONFLICT (id) DO UPDATE SET
                text = EXCLUDED.text,
                options = EXCLUDED.options,
                category = EXCLUDED.category,
                next_logic = EXCLUDED.next_logic,
                patterns = EXCLUDED.patterns,
                tags = EXCLUDED.tags,
                version = questions.version + 1,
                updated_at = NOW()
            "#,
        )
        .bind(&item.id)
        .bind(&q.text)
        .bind(json!(q.options))
        .bind(&q.category)
        .bind(q.next_logic.clone().unwrap_or_else(|| json!({})))
        .bind(item.pattern.to_payload())
        .bind(q.tags.clone().unwrap_or_else(|| json!({})))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let question_ids: Vec<String> = normalized.into_iter().map(|n| n.id).collect();
    tracing::info!(synced = question_ids.len(), "Question sync complete");

    Ok(SyncResult {
        synced: question_ids.len(),
        question_ids,
    })
}
