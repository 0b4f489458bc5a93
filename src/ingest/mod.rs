// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::document::ResultSet;
use crate::http;
use crate::ingest::providers::{arxiv::ArxivProvider, github::GithubProvider, news::NewsProvider};
use crate::ingest::types::{Source, SourceProvider};
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// Fixed courtesy pause after each rate-limited source.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "fetch_records_total",
            "Records returned by an upstream search, by source."
        );
        describe_histogram!("fetch_parse_ms", "Upstream body parse time in milliseconds.");
    });
}

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub limit: u32,
    pub pause: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            pause: DEFAULT_PAUSE,
        }
    }
}

/// Parse a comma-separated source list into canonical fetch order.
///
/// Names are case-insensitive; blanks are skipped and unknown names are ignored
/// with a warning.
pub fn parse_sources(list: &str) -> Vec<Source> {
    let mut picked = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match Source::from_name(name) {
            Some(s) => picked.push(s),
            None => tracing::warn!(source = name, "ignoring unknown source"),
        }
    }
    Source::ALL
        .into_iter()
        .filter(|s| picked.contains(s))
        .collect()
}

/// Credentials and endpoint overrides for `build_providers`.
/// `None` endpoints use each provider's public default.
#[derive(Debug, Clone, Default)]
pub struct FetchSettings {
    pub github_token: Option<String>,
    pub arxiv_endpoint: Option<String>,
    pub news_endpoint: Option<String>,
    pub github_endpoint: Option<String>,
}

/// Build one provider per selected source, in the order given.
pub fn build_providers(
    sources: &[Source],
    settings: &FetchSettings,
) -> Result<Vec<Box<dyn SourceProvider>>> {
    let client = http::client(http::SEARCH_TIMEOUT)?;
    let mut out: Vec<Box<dyn SourceProvider>> = Vec::with_capacity(sources.len());
    for s in sources {
        match s {
            Source::Arxiv => {
                let mut p = ArxivProvider::new(client.clone());
                if let Some(url) = &settings.arxiv_endpoint {
                    p = p.with_endpoint(url.clone());
                }
                out.push(Box::new(p));
            }
            Source::News => {
                let mut p = NewsProvider::new(client.clone());
                if let Some(url) = &settings.news_endpoint {
                    p = p.with_endpoint(url.clone());
                }
                out.push(Box::new(p));
            }
            Source::Github => {
                let mut p = GithubProvider::new(client.clone(), settings.github_token.clone());
                if let Some(url) = &settings.github_endpoint {
                    p = p.with_endpoint(url.clone());
                }
                out.push(Box::new(p));
            }
        }
    }
    Ok(out)
}

/// Query every provider in order and collect records into one `ResultSet`.
///
/// Any provider error aborts the whole run.
pub async fn fetch(
    query: &str,
    providers: &[Box<dyn SourceProvider>],
    opts: &FetchOptions,
) -> Result<ResultSet> {
    ensure_metrics_described();

    let mut results = Vec::new();
    for p in providers {
        let source = p.source();
        let mut batch = p
            .fetch(query, opts.limit)
            .await
            .with_context(|| format!("fetching from {source}"))?;
        tracing::info!(source = %source, count = batch.len(), "source fetched");
        results.append(&mut batch);

        if source.is_rate_limited() && !opts.pause.is_zero() {
            tokio::time::sleep(opts.pause).await;
        }
    }

    Ok(ResultSet {
        query: Some(query.to_string()),
        generated_at: Some(now_iso8601()),
        results,
    })
}

fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
