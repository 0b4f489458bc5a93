// src/llm/hosted.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use super::{GenerationRequest, TextGenerator};
use crate::http;

/// OpenAI-compatible Chat Completions backend (OpenRouter by default).
pub struct HostedBackend {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl HostedBackend {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self> {
        Ok(Self {
            http: http::client(http::GENERATION_TIMEOUT)?,
            url: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: String,
}

#[async_trait]
impl TextGenerator for HostedBackend {
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String> {
        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: req.system,
                },
                Msg {
                    role: "user",
                    content: req.prompt,
                },
            ],
            temperature: req.temperature,
        };

        tracing::debug!(url = %self.url, model = %self.model, "chat completion request");
        let t0 = std::time::Instant::now();
        let resp: Resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion http post()")?
            .error_for_status()
            .context("chat completion http status")?
            .json()
            .await
            .context("parsing chat completion json")?;

        histogram!("llm_request_ms", "backend" => "open-source")
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("llm_requests_total", "backend" => "open-source").increment(1);

        let first = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("chat completion returned no choices"))?;
        Ok(first.message.content.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "open-source"
    }
}
