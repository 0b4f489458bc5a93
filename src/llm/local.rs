// src/llm/local.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use super::{GenerationRequest, TextGenerator};
use crate::http;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Overrides [`DEFAULT_BASE_URL`] when set.
pub const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";

/// Local Ollama-style `/api/generate` backend, non-streamed.
pub struct LocalBackend {
    http: reqwest::Client,
    base: String,
    model: String,
}

impl LocalBackend {
    pub fn new(model: &str) -> Result<Self> {
        let base = std::env::var(ENV_BASE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            http: http::client(http::GENERATION_TIMEOUT)?,
            base,
            model: model.to_string(),
        })
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
}

#[derive(Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: Options,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait]
impl TextGenerator for LocalBackend {
    // The local service takes a bare prompt; `req.system` is not sent.
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String> {
        let url = format!("{}/api/generate", self.base.trim_end_matches('/'));
        let body = Req {
            model: &self.model,
            prompt: req.prompt,
            stream: false,
            options: Options {
                temperature: req.temperature,
            },
        };

        tracing::debug!(%url, model = %self.model, "local generate request");
        let t0 = std::time::Instant::now();
        let resp: Resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("local generate http post()")?
            .error_for_status()
            .context("local generate http status")?
            .json()
            .await
            .context("parsing local generate json")?;

        histogram!("llm_request_ms", "backend" => "local")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("llm_requests_total", "backend" => "local").increment(1);

        Ok(resp.response.unwrap_or_default().trim().to_string())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
