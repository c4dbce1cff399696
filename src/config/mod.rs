use std::env;
use std::fmt;

use crate::services::scoring::ScoringPolicy;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub scoring_policy: ScoringPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", 5000),
            jwt_secret: env::var("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            scoring_policy: scoring_policy_from_env(),
        })
    }
}

const REDACTED: &str = "[redacted]";

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &REDACTED)
            .field("database_max_connections", &self.database_max_connections)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &REDACTED)
            .field("frontend_url", &self.frontend_url)
            .field("scoring_policy", &self.scoring_policy)
            .finish()
    }
}

/// Scoring policy with per-field overrides. A value that does not parse, is
/// not finite, or is negative where only a non-negative factor makes sense
/// keeps the default.
fn scoring_policy_from_env() -> ScoringPolicy {
    let defaults = ScoringPolicy::default();
    ScoringPolicy {
        baseline: policy_value("SCORING_BASELINE", defaults.baseline, f64::is_finite),
        critical_multiplier: policy_value(
            "SCORING_CRITICAL_MULTIPLIER",
            defaults.critical_multiplier,
            is_non_negative_factor,
        ),
        damping: policy_value("SCORING_DAMPING", defaults.damping, is_non_negative_factor),
    }
}

fn is_non_negative_factor(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn policy_value(key: &str, default: f64, accept: fn(f64) -> bool) -> f64 {
    match parse_or(key, default) {
        value if accept(value) => value,
        rejected => {
            tracing::warn!(key, value = %rejected, default, "Rejected scoring policy override");
            default
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
