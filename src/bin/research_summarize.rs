//! `research-summarize` binary.

use clap::Parser;
use research_pipeline::cli::{self, SummarizeArgs};
use research_pipeline::config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = SummarizeArgs::parse();
    let metrics = cli::bootstrap();

    let outcome = async {
        let file = config::load_default()?;
        cli::run_summarize(args, &file).await
    }
    .await;

    cli::finish("summarize", outcome, metrics)
}
