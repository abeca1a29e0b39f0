//! Metrics for enrichment runs, recorded through the `metrics` facade.
//!
//! Nothing is exported unless a recorder is installed; the HTTP server
//! installs a Prometheus recorder via [`init`] and renders it on `/metrics`.

use crate::types::Bucket;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    RowsTotal,
    FetchErrors,
    RenderTimeouts,
    RowDuration,
    RunDuration,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsTotal => "emtak_rows_total",
            MetricName::FetchErrors => "emtak_fetch_errors_total",
            MetricName::RenderTimeouts => "emtak_render_timeouts_total",
            MetricName::RowDuration => "emtak_row_duration_seconds",
            MetricName::RunDuration => "emtak_run_duration_seconds",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod rows {
    use super::*;

    pub fn classified(bucket: Bucket) {
        ::metrics::counter!(MetricName::RowsTotal.as_str(), "outcome" => bucket.as_str()).increment(1);
    }

    pub fn skipped() {
        ::metrics::counter!(MetricName::RowsTotal.as_str(), "outcome" => "skipped").increment(1);
    }

    pub fn failed(kind: &'static str) {
        ::metrics::counter!(MetricName::RowsTotal.as_str(), "outcome" => "failed").increment(1);
        match kind {
            "fetch" => ::metrics::counter!(MetricName::FetchErrors.as_str()).increment(1),
            "render_timeout" => ::metrics::counter!(MetricName::RenderTimeouts.as_str()).increment(1),
            _ => {}
        }
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::RowDuration.as_str()).record(secs);
    }
}

pub mod run {
    use super::*;

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(secs);
    }
}

/// Installs the global Prometheus recorder.
pub fn init() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [
            MetricName::RowsTotal,
            MetricName::FetchErrors,
            MetricName::RenderTimeouts,
            MetricName::RowDuration,
            MetricName::RunDuration,
        ] {
            assert!(name.to_string().starts_with("emtak_"));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        rows::classified(Bucket::Matching);
        rows::skipped();
        rows::failed("fetch");
        rows::duration(0.5);
        run::duration(1.0);
    }
}
