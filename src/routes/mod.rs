//! Route definitions for the CyberSentinel API.

pub mod health;
pub mod questions;
pub mod reports;
pub mod scoring;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let origin = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            tracing::warn!(error = %e, url = %state.config.frontend_url, "Invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::any()
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let question_routes = Router::new()
        .route("/questions/normalize", post(questions::normalize))
        .route("/questions/sync", post(questions::sync));

    let scoring_routes = Router::new().route("/scoring/preview", post(scoring::preview));

    let report_routes = Router::new().route(
        "/assessments/{session_id}/report",
        get(reports::get).post(reports::generate),
    );

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", question_routes)
        .nest("/api/v1", scoring_routes)
        .nest("/api/v1", report_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
