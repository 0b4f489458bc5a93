//! `research-synthesize` binary.

use clap::Parser;
use research_pipeline::cli::{self, SynthesizeArgs};
use research_pipeline::config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = SynthesizeArgs::parse();
    let metrics = cli::bootstrap();

    let outcome = async {
        let file = config::load_default()?;
        cli::run_synthesize(args, &file).await
    }
    .await;

    cli::finish("synthesize", outcome, metrics)
}
