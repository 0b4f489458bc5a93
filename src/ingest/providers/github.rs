// src/ingest/providers/github.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::ingest::types::{ResultRecord, Source, SourceProvider};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/search/repositories";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repo>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

pub fn parse_repositories(json: &str) -> Result<Vec<ResultRecord>> {
    let payload: SearchResponse = serde_json::from_str(json).context("parsing github json")?;
    Ok(payload
        .items
        .into_iter()
        .map(|r| {
            ResultRecord::new(
                Source::Github,
                r.full_name.unwrap_or_default(),
                r.description.unwrap_or_default(),
                r.html_url.unwrap_or_default(),
                r.updated_at.unwrap_or_default(),
            )
        })
        .collect())
}

pub struct GithubProvider {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl GithubProvider {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SourceProvider for GithubProvider {
    async fn fetch(&self, query: &str, limit: u32) -> Result<Vec<ResultRecord>> {
        tracing::debug!(
            endpoint = %self.endpoint,
            query,
            limit,
            authenticated = self.token.is_some(),
            "github search"
        );
        let mut req = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[
                ("q", query.to_string()),
                ("sort", "updated".to_string()),
                ("order", "desc".to_string()),
                ("per_page", limit.to_string()),
            ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let body = req
            .send()
            .await
            .context("github http get()")?
            .error_for_status()
            .context("github http status")?
            .text()
            .await
            .context("github http .text()")?;

        let out = parse_repositories(&body)?;
        counter!("fetch_records_total", "source" => "github").increment(out.len() as u64);
        Ok(out)
    }

    fn source(&self) -> Source {
        Source::Github
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_description_becomes_empty_summary() {
        let json = r#"{"total_count":2,"items":[
            {"full_name":"rust-lang/rust","description":"Empowering everyone","html_url":"https://github.com/rust-lang/rust","updated_at":"2024-03-01T00:00:00Z"},
            {"full_name":"a/b","description":null,"html_url":"https://github.com/a/b","updated_at":"2024-01-01"}
        ]}"#;
        let out = parse_repositories(json).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "rust-lang/rust");
        assert_eq!(out[0].summary, "Empowering everyone");
        assert_eq!(out[0].url, "https://github.com/rust-lang/rust");
        assert_eq!(out[0].published, "2024-03-01T00:00:00Z");
        assert_eq!(out[1].summary, "");
        assert!(out.iter().all(|r| r.source == Source::Github));
    }

    #[test]
    fn blank_token_is_ignored() {
        let client = reqwest::Client::new();
        let p = GithubProvider::new(client, Some("  ".into()));
        assert!(p.token.is_none());
    }
}
