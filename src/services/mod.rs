//! Business logic services.

pub mod auth;
pub mod normalizer;
pub mod question_sync;
pub mod recommendations;
pub mod report;
pub mod scoring;
