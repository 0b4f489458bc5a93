// src/lib.rs
// Library surface shared by the three stage binaries and integration tests.
//
// fetch      -> research_results.json   (ingest)
// summarize  -> research_summaries.json (summarize + llm)
// synthesize -> updated_ideas.md        (synthesize + llm)

pub mod cli;
pub mod config;
pub mod document;
pub mod http;
pub mod ingest;
pub mod llm;
pub mod metrics;
pub mod summarize;
pub mod synthesize;

// ---- Re-exports for stable public API ----
pub use crate::document::ResultSet;
pub use crate::ingest::types::{ResultRecord, Source, SourceProvider};
pub use crate::llm::{GenerationRequest, TextGenerator};
