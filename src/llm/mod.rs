//! Text generation backends: provider abstraction + factory.
//!
//! Two closed variants sit behind [`TextGenerator`]: a hosted OpenAI-compatible
//! chat-completions API and a local Ollama-style service. Stages only ever see
//! the trait object, so tests can drop in a stub.

pub mod hosted;
pub mod local;

use anyhow::{bail, Result};
use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use serde::Deserialize;

pub use hosted::HostedBackend;
pub use local::LocalBackend;

pub const DEFAULT_MODEL: &str = "llama3.1:8b";
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Which backend variant to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Runtime {
    /// OpenAI-compatible hosted API (bearer key required).
    OpenSource,
    /// Local generation service on localhost:11434.
    #[default]
    Local,
}

impl Runtime {
    pub fn as_str(self) -> &'static str {
        match self {
            Runtime::OpenSource => "open-source",
            Runtime::Local => "local",
        }
    }
}

/// One generation call: instruction, user prompt and sampling temperature.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
}

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the backend's text for `req`, trimmed.
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String>;
    /// Backend name for logs and metrics.
    fn name(&self) -> &'static str;
}

/// Resolved backend settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub runtime: Runtime,
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            runtime: Runtime::default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
        }
    }
}

pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("llm_requests_total", "Generation calls, by backend.");
        describe_histogram!("llm_request_ms", "Generation call latency in milliseconds.");
    });
}

/// Factory: build the backend selected by `settings.runtime`.
///
/// The hosted runtime fails here, before any request, when no API key is known.
pub fn build_backend(settings: &LlmSettings) -> Result<Box<dyn TextGenerator>> {
    ensure_metrics_described();
    match settings.runtime {
        Runtime::OpenSource => {
            let Some(key) = settings.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
                bail!("Missing API key for open-source runtime");
            };
            Ok(Box::new(HostedBackend::new(
                &settings.api_base,
                key,
                &settings.model,
            )?))
        }
        Runtime::Local => Ok(Box::new(LocalBackend::new(&settings.model)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_without_key_is_a_config_error() {
        let s = LlmSettings {
            runtime: Runtime::OpenSource,
            ..LlmSettings::default()
        };
        let err = build_backend(&s).err().expect("must fail");
        assert!(err.to_string().contains("Missing API key"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let s = LlmSettings {
            runtime: Runtime::OpenSource,
            api_key: Some("   ".into()),
            ..LlmSettings::default()
        };
        assert!(build_backend(&s).is_err());
    }

    #[test]
    fn factory_dispatches_on_runtime() {
        let hosted = LlmSettings {
            runtime: Runtime::OpenSource,
            api_key: Some("k".into()),
            ..LlmSettings::default()
        };
        assert_eq!(build_backend(&hosted).unwrap().name(), "open-source");
        assert_eq!(
            build_backend(&LlmSettings::default()).unwrap().name(),
            "local"
        );
    }

    #[test]
    fn runtime_names_match_cli_values() {
        use clap::ValueEnum;
        for r in [Runtime::OpenSource, Runtime::Local] {
            let pv = r.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), r.as_str());
        }
    }
}
