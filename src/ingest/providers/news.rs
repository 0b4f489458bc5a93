// src/ingest/providers/news.rs
// GDELT DOC 2.0 article search.
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use crate::ingest::types::{ResultRecord, Source, SourceProvider};

pub const DEFAULT_ENDPOINT: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

#[derive(Debug, Deserialize)]
struct ArticleList {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    seendate: Option<String>,
}

/// Map a GDELT `artlist` payload to records.
///
/// GDELT returns no excerpt, so `summary` carries the seen date, same as `published`.
pub fn parse_articles(json: &str) -> Result<Vec<ResultRecord>> {
    let payload: ArticleList = serde_json::from_str(json).context("parsing news json")?;
    Ok(payload
        .articles
        .into_iter()
        .map(|a| {
            let seen = a.seendate.unwrap_or_default();
            ResultRecord::new(
                Source::News,
                a.title.unwrap_or_default(),
                seen.clone(),
                a.url.unwrap_or_default(),
                seen,
            )
        })
        .collect())
}

pub struct NewsProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl NewsProvider {
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
impl SourceProvider for NewsProvider {
    async fn fetch(&self, query: &str, limit: u32) -> Result<Vec<ResultRecord>> {
        tracing::debug!(endpoint = %self.endpoint, query, limit, "news search");
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("query", query.to_string()),
                ("format", "json".to_string()),
                ("maxrecords", limit.to_string()),
                ("mode", "artlist".to_string()),
            ])
            .send()
            .await
            .context("news http get()")?
            .error_for_status()
            .context("news http status")?
            .text()
            .await
            .context("news http .text()")?;

        let out = parse_articles(&body)?;
        counter!("fetch_records_total", "source" => "news").increment(out.len() as u64);
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::News
    }
}
