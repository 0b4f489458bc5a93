// src/config/file.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::Runtime;

pub const ENV_CONFIG_PATH: &str = "RESEARCH_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/research.toml";

/// Optional defaults read from TOML. Every key may be omitted.
///
/// ```toml
/// [llm]
/// runtime = "open-source"
/// model = "meta-llama/llama-3.1-8b-instruct"
/// api_base = "https://openrouter.ai/api/v1"
///
/// [fetch]
/// limit = 5
/// sources = "arxiv,github"
/// pause_ms = 1000
/// # search endpoints, public defaults when omitted
/// arxiv_endpoint = "http://export.arxiv.org/api/query"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub llm: LlmSection,
    pub fetch: FetchSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSection {
    pub runtime: Option<Runtime>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSection {
    pub limit: Option<u32>,
    pub sources: Option<String>,
    pub pause_ms: Option<u64>,
    pub arxiv_endpoint: Option<String>,
    pub news_endpoint: Option<String>,
    pub github_endpoint: Option<String>,
}

pub fn load_from(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Load config using env var + fallback:
/// 1) $RESEARCH_CONFIG_PATH (must exist)
/// 2) config/research.toml
/// 3) built-in defaults
pub fn load_default() -> Result<FileConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        return load_from(&pb);
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
    if fallback.exists() {
        return load_from(&fallback);
    }
    Ok(FileConfig::default())
}
