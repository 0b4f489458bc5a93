use anyhow::{Context, Result};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::PathBuf;

/// When set, the run's metrics are written there in Prometheus text format.
pub const ENV_TEXTFILE: &str = "RESEARCH_METRICS_TEXTFILE";

pub struct Metrics {
    pub handle: PrometheusHandle,
    path: PathBuf,
}

impl Metrics {
    /// Install a Prometheus recorder if `$RESEARCH_METRICS_TEXTFILE` is set.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(path) = std::env::var_os(ENV_TEXTFILE).filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        Ok(Some(Self {
            handle,
            path: PathBuf::from(path),
        }))
    }

    /// Stamp the success gauge for `stage` and write the exposition textfile.
    pub fn write_textfile(&self, stage: &'static str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        gauge!("pipeline_last_success_ts", "stage" => stage).set(now as f64);
        crate::document::write_text(&self.path, &self.handle.render())
    }
}
