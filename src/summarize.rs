// src/summarize.rs
use anyhow::{Context, Result};

use crate::document::ResultSet;
use crate::ingest::types::ResultRecord;
use crate::llm::{GenerationRequest, TextGenerator};

pub const SYSTEM_INSTRUCTION: &str = "Summarize the item in 2-3 sentences.";
pub const TEMPERATURE: f32 = 0.3;

pub fn build_item_prompt(item: &ResultRecord) -> String {
    format!(
        "Title: {}\nSource: {}\nSummary/Abstract: {}\nURL: {}",
        item.title, item.source, item.summary, item.url
    )
}

/// Attach an `llm_summary` to every record, one backend call per record, in order.
///
/// The output keeps `query` and `results` only. Any failed call aborts the
/// whole stage.
pub async fn summarize(input: ResultSet, backend: &dyn TextGenerator) -> Result<ResultSet> {
    let total = input.results.len();
    let mut results = Vec::with_capacity(total);

    for (i, mut item) in input.results.into_iter().enumerate() {
        let prompt = build_item_prompt(&item);
        let req = GenerationRequest {
            system: SYSTEM_INSTRUCTION,
            prompt: &prompt,
            temperature: TEMPERATURE,
        };
        let summary = backend
            .generate(&req)
            .await
            .with_context(|| format!("summarizing record {}/{total} ({})", i + 1, item.title))?;
        tracing::debug!(index = i, backend = backend.name(), "record summarized");
        item.llm_summary = Some(summary);
        results.push(item);
    }

    tracing::info!(count = results.len(), backend = backend.name(), "summaries ready");
    Ok(ResultSet {
        query: input.query,
        generated_at: None,
        results,
    })
}
