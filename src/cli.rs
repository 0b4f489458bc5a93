//! Command-line surface shared by the three stage binaries.
//!
//! Each binary parses its own args struct, calls [`bootstrap`], runs its stage
//! function and hands the outcome to [`finish`], which prints the one-line
//! report or `Error: <message>` and picks the exit status.

use anyhow::{bail, Result};
use clap::{Args, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{self, FileConfig};
use crate::document::{read_result_set, write_json, write_text};
use crate::ingest::{self, FetchOptions, FetchSettings, DEFAULT_PAUSE};
use crate::llm::{self, LlmSettings, Runtime};
use crate::metrics::Metrics;
use crate::{summarize, synthesize};

pub const DEFAULT_SOURCES: &str = "arxiv,news,github";
pub const DEFAULT_LIMIT: u32 = 10;

/// Fetch research papers, news and repositories for a query and store them as JSON.
#[derive(Parser, Debug)]
#[command(name = "research-fetch", version, about, long_about = None)]
pub struct FetchArgs {
    /// Search query
    #[arg(long)]
    pub query: String,

    /// Results per source
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Comma-separated sources: arxiv, news, github
    #[arg(long)]
    pub sources: Option<String>,

    /// Output JSON file
    #[arg(long, default_value = "research_results.json")]
    pub output: PathBuf,

    /// GitHub token (falls back to $GITHUB_TOKEN)
    #[arg(long)]
    pub github_token: Option<String>,
}

/// Backend selection flags shared by summarize and synthesize.
#[derive(Args, Debug, Clone, Default)]
pub struct LlmArgs {
    /// LLM runtime
    #[arg(long, value_enum)]
    pub runtime: Option<Runtime>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// API base URL for the open-source runtime
    #[arg(long)]
    pub api_base: Option<String>,

    /// API key (falls back to $OPENROUTER_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,
}

impl LlmArgs {
    /// Flag > config file > built-in default.
    pub fn resolve(self, file: &FileConfig) -> LlmSettings {
        let defaults = LlmSettings::default();
        LlmSettings {
            runtime: self
                .runtime
                .or(file.llm.runtime)
                .unwrap_or(defaults.runtime),
            model: self
                .model
                .or_else(|| file.llm.model.clone())
                .unwrap_or(defaults.model),
            api_base: self
                .api_base
                .or_else(|| file.llm.api_base.clone())
                .unwrap_or(defaults.api_base),
            api_key: config::resolve_api_key(self.api_key),
        }
    }
}

/// Summarize fetched research results with an open-source API or local LLM.
#[derive(Parser, Debug)]
#[command(name = "research-summarize", version, about, long_about = None)]
pub struct SummarizeArgs {
    /// Input JSON file
    #[arg(long, default_value = "research_results.json")]
    pub input: PathBuf,

    /// Output JSON file
    #[arg(long, default_value = "research_summaries.json")]
    pub output: PathBuf,

    #[command(flatten)]
    pub llm: LlmArgs,
}

/// Generate updated research ideas from summaries using an LLM.
#[derive(Parser, Debug)]
#[command(name = "research-synthesize", version, about, long_about = None)]
pub struct SynthesizeArgs {
    /// Input summaries JSON
    #[arg(long, default_value = "research_summaries.json")]
    pub input: PathBuf,

    /// Output markdown file
    #[arg(long, default_value = "updated_ideas.md")]
    pub output: PathBuf,

    #[command(flatten)]
    pub llm: LlmArgs,
}

/// Logs go to stderr; stdout carries only the stage's report line.
/// `RUST_LOG` filters (default `warn`), `RESEARCH_LOG_FORMAT=json` switches format.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("RESEARCH_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// Load `.env`, start logging, install the optional metrics recorder.
pub fn bootstrap() -> Option<Metrics> {
    let _ = dotenvy::dotenv();
    init_tracing();
    match Metrics::from_env() {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = ?e, "metrics textfile disabled");
            None
        }
    }
}

/// `Error: ` followed by the context chain joined with `: `.
pub fn error_line(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

/// Print the report or the error and map to the process exit status.
pub fn finish(stage: &'static str, outcome: Result<String>, metrics: Option<Metrics>) -> ExitCode {
    match outcome {
        Ok(report) => {
            println!("{report}");
            if let Some(m) = metrics {
                if let Err(e) = m.write_textfile(stage) {
                    tracing::warn!(error = ?e, stage, "writing metrics textfile failed");
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", error_line(&e));
            ExitCode::from(1)
        }
    }
}

pub async fn run_fetch(args: FetchArgs, file: &FileConfig) -> Result<String> {
    let limit = args.limit.or(file.fetch.limit).unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        bail!("limit must be at least 1");
    }
    let sources = ingest::parse_sources(
        args.sources
            .as_deref()
            .or(file.fetch.sources.as_deref())
            .unwrap_or(DEFAULT_SOURCES),
    );
    let opts = FetchOptions {
        limit,
        pause: file
            .fetch
            .pause_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAUSE),
    };

    let settings = FetchSettings {
        github_token: config::resolve_github_token(args.github_token),
        arxiv_endpoint: file.fetch.arxiv_endpoint.clone(),
        news_endpoint: file.fetch.news_endpoint.clone(),
        github_endpoint: file.fetch.github_endpoint.clone(),
    };
    let providers = ingest::build_providers(&sources, &settings)?;
    let set = ingest::fetch(&args.query, &providers, &opts).await?;
    write_json(&args.output, &set)?;
    Ok(format!(
        "Saved {} results to {}",
        set.len(),
        args.output.display()
    ))
}

pub async fn run_summarize(args: SummarizeArgs, file: &FileConfig) -> Result<String> {
    let backend = llm::build_backend(&args.llm.resolve(file))?;
    let input = read_result_set(&args.input)?;
    let out = summarize::summarize(input, backend.as_ref()).await?;
    write_json(&args.output, &out)?;
    Ok(format!(
        "Saved {} summaries to {}",
        out.len(),
        args.output.display()
    ))
}

pub async fn run_synthesize(args: SynthesizeArgs, file: &FileConfig) -> Result<String> {
    let backend = llm::build_backend(&args.llm.resolve(file))?;
    let input = read_result_set(&args.input)?;
    let doc = synthesize::synthesize(&input, backend.as_ref()).await?;
    write_text(&args.output, &doc)?;
    Ok(format!("Saved ideas to {}", args.output.display()))
}
