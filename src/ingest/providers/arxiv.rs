// src/ingest/providers/arxiv.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::types::{ResultRecord, Source, SourceProvider};

pub const DEFAULT_ENDPOINT: &str = "http://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
}

fn trimmed(s: Option<String>) -> String {
    s.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Parse an arxiv Atom feed into records, one per `<entry>`, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<ResultRecord>> {
    let t0 = std::time::Instant::now();
    let feed: Feed = from_str(xml).context("parsing arxiv atom feed")?;

    let out: Vec<ResultRecord> = feed
        .entries
        .into_iter()
        .map(|e| {
            // Only the first <link> counts, even if it has no href.
            let url = e
                .links
                .into_iter()
                .next()
                .and_then(|l| l.href)
                .unwrap_or_default();
            ResultRecord::new(
                Source::Arxiv,
                trimmed(e.title),
                trimmed(e.summary),
                url,
                trimmed(e.published),
            )
        })
        .collect();

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("fetch_parse_ms", "source" => "arxiv").record(ms);
    Ok(out)
}

pub struct ArxivProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl ArxivProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SourceProvider for ArxivProvider {
    async fn fetch(&self, query: &str, limit: u32) -> Result<Vec<ResultRecord>> {
        tracing::debug!(endpoint = %self.endpoint, query, limit, "arxiv search");
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("search_query", format!("all:{query}")),
                ("start", "0".to_string()),
                ("max_results", limit.to_string()),
            ])
            .send()
            .await
            .context("arxiv http get()")?
            .error_for_status()
            .context("arxiv http status")?
            .text()
            .await
            .context("arxiv http .text()")?;

        let out = parse_feed(&body)?;
        counter!("fetch_records_total", "source" => "arxiv").increment(out.len() as u64);
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::Arxiv
    }
}
