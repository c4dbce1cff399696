//! Question routes: pattern preview and batch sync from content sources.

use axum::{extract::State, Json};
use indexmap::IndexMap;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::pattern::CanonicalPattern;
use crate::models::question::RawQuestion;
use crate::services::normalizer;
use crate::services::question_sync::{self, SyncResult};
use crate::AppState;

/// POST /api/v1/questions/normalize: canonical pattern for one question, not persisted.
pub async fn normalize(
    _user: CurrentUser,
    Json(question): Json<RawQuestion>,
) -> Json<ApiResponse<CanonicalPattern>> {
    ApiResponse::success(normalizer::normalize(&question))
}

/// POST /api/v1/questions/sync: validate, normalize, and upsert a batch (admin).
pub async fn sync(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(questions): Json<IndexMap<String, RawQuestion>>,
) -> Result<Json<ApiResponse<SyncResult>>, AppError> {
    tracing::info!(subject = %user.subject, count = questions.len(), "Question sync requested");
    let result = question_sync::sync_questions(&state.db, questions).await?;
    Ok(ApiResponse::success(result))
}
