//! Domain models and DTOs for questions, patterns, and reports.

pub mod category;
pub mod pattern;
pub mod question;
pub mod report;
pub mod user;
