pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use sqlx::PgPool;

use crate::services::scoring::ScoringEngine;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub engine: ScoringEngine,
}

impl AppState {
    /// Build state with a scoring engine configured from `config`.
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        let engine = ScoringEngine::new(config.scoring_policy);
        Self { db, config, engine }
    }
}
