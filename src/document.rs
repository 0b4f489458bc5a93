//! Pipeline artifacts: the `ResultSet` JSON document passed between stages,
//! plus the atomic writers every stage uses for its output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ingest::types::ResultRecord;

/// Query plus its ordered records. `generated_at` is only set by the fetch stage.
///
/// A document without `query` is passed on with `"query": null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ResultSet {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub fn read_result_set(path: &Path) -> Result<ResultSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading input document {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing input document {}", path.display()))
}

/// Serialize `value` as 2-space indented JSON and atomically replace `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output document")?;
    write_atomic(path, json.as_bytes())
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    write_atomic(path, text.as_bytes())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write to a sibling temp file, then rename over the destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let res = (|| -> std::io::Result<()> {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if res.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    res.with_context(|| format!("writing {}", path.display()))
}
