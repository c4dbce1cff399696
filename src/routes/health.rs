//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::{ApiError, ApiResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub database: String,
    /// Active questions available for assessments; absent when the store is unreachable.
    pub active_questions: Option<i64>,
}

/// Liveness probe: the process is up.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: the question store answers and holds active questions.
///
/// Responds 503 while the database is unreachable so orchestrators hold traffic.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<Readiness>>) {
    let probe = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions WHERE is_active")
        .fetch_one(&state.db)
        .await;

    match probe {
        Ok(count) => (
            StatusCode::OK,
            ApiResponse::success(Readiness {
                status: if count > 0 { "ok" } else { "empty" },
                database: "connected".to_string(),
                active_questions: Some(count),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            let readiness = Readiness {
                status: "unavailable",
                database: format!("error: {e}"),
                active_questions: None,
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: Some(readiness),
                    error: Some(ApiError {
                        code: "SERVICE_UNAVAILABLE".to_string(),
                        message: "Question store is unreachable".to_string(),
                    }),
                }),
            )
        }
    }
}
