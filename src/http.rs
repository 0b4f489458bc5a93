// src/http.rs
// Shared reqwest client construction for upstream search APIs and LLM backends.

use anyhow::{Context, Result};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("research-pipeline/", env!("CARGO_PKG_VERSION"));

/// Per-call budget for search/read endpoints.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);
/// Per-call budget for text generation.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("building http client")
}
