//! Import a question bank from a JSON file into the question store.
//!
//! Usage: `cargo run --bin import_questions -- path/to/questions.json`
//!
//! The file holds an object keyed by question id, as produced by the
//! content generator. Output wrapped in a Markdown code fence is accepted.
//! Requires `DATABASE_URL` (reads .env).

use indexmap::IndexMap;

use cybersentinel::models::question::RawQuestion;
use cybersentinel::services::question_sync;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: import_questions <questions.json>"))?;

    let raw = std::fs::read_to_string(&path)?;
    let questions: IndexMap<String, RawQuestion> = serde_json::from_str(strip_code_fence(&raw))
        .map_err(|e| anyhow::anyhow!("{path} is not a question map: {e}"))?;

    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = cybersentinel::db::create_pool(&db_url, 2).await?;
    cybersentinel::db::migrate(&pool).await?;

    println!("=== CyberSentinel Question Import ===");
    println!("Read {} questions from {path}", questions.len());

    let result = question_sync::sync_questions(&pool, questions).await?;

    for id in &result.question_ids {
        println!("[done] {id}");
    }
    println!("\n=== Synced {} questions ===", result.synced);

    Ok(())
}

/// Return the body of a ```json fenced block, or the trimmed input.
fn strip_code_fence(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[start + 3..];
    let body = after_fence
        .strip_prefix("json")
        .unwrap_or(after_fence);
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}
