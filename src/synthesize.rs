// src/synthesize.rs
use anyhow::{Context, Result};

use crate::document::ResultSet;
use crate::llm::{GenerationRequest, TextGenerator};

pub const SYSTEM_INSTRUCTION: &str = "Draft 4-6 actionable research ideas based on the summaries.";
pub const TEMPERATURE: f32 = 0.4;
pub const HEADING: &str = "# Updated Research Ideas";

/// `Query:` line, `Summaries:` line, then one `- title: llm_summary` line per record.
pub fn build_ideas_prompt(set: &ResultSet) -> String {
    let mut lines = Vec::with_capacity(set.results.len() + 2);
    lines.push(format!("Query: {}", set.query.as_deref().unwrap_or_default()));
    lines.push("Summaries:".to_string());
    for item in &set.results {
        lines.push(format!(
            "- {}: {}",
            item.title,
            item.llm_summary.as_deref().unwrap_or_default()
        ));
    }
    lines.join("\n")
}

pub fn render_ideas(response: &str) -> String {
    format!("{HEADING}\n\n{response}\n")
}

/// One backend call over all summaries; returns the rendered ideas document.
pub async fn synthesize(set: &ResultSet, backend: &dyn TextGenerator) -> Result<String> {
    let prompt = build_ideas_prompt(set);
    let req = GenerationRequest {
        system: SYSTEM_INSTRUCTION,
        prompt: &prompt,
        temperature: TEMPERATURE,
    };
    let response = backend
        .generate(&req)
        .await
        .context("generating research ideas")?;
    tracing::info!(
        records = set.results.len(),
        backend = backend.name(),
        "ideas generated"
    );
    Ok(render_ideas(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{ResultRecord, Source};

    #[test]
    fn prompt_has_header_lines_then_bullets() {
        let mut a = ResultRecord::new(Source::Arxiv, "Paper", "", "", "");
        a.llm_summary = Some("Does X.".into());
        let b = ResultRecord::new(Source::News, "Story", "", "", "");
        let set = ResultSet {
            query: Some("q".into()),
            generated_at: None,
            results: vec![a, b],
        };
        assert_eq!(
            build_ideas_prompt(&set),
            "Query: q\nSummaries:\n- Paper: Does X.\n- Story: "
        );
    }

    #[test]
    fn empty_set_still_has_header_lines() {
        let set = ResultSet {
            query: Some("q".into()),
            ..ResultSet::default()
        };
        assert_eq!(build_ideas_prompt(&set), "Query: q\nSummaries:");
    }

    #[test]
    fn rendered_document_starts_with_heading() {
        assert_eq!(
            render_ideas("1. Try Y"),
            "# Updated Research Ideas\n\n1. Try Y\n"
        );
    }
}
