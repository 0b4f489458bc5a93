//! `research-fetch` binary.

use clap::Parser;
use research_pipeline::cli::{self, FetchArgs};
use research_pipeline::config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = FetchArgs::parse();
    let metrics = cli::bootstrap();

    let outcome = async {
        let file = config::load_default()?;
        cli::run_fetch(args, &file).await
    }
    .await;

    cli::finish("fetch", outcome, metrics)
}
