//! Report routes: generate on completion, fetch for display.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::report::{Report, StoredReport};
use crate::services::report;
use crate::AppState;

/// POST /api/v1/assessments/{session_id}/report: (re)compute and store the report (admin).
pub async fn generate(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let report = report::generate_report(&state.db, &state.engine, session_id).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/assessments/{session_id}/report: stored report (owner or admin).
pub async fn get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<StoredReport>>, AppError> {
    let stored = report::get_report(&state.db, session_id, &user).await?;
    Ok(ApiResponse::success(stored))
}
