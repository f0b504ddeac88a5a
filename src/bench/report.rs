//! Benchmark result records and the JSON report artifact.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::bench::harness::BenchConfig;

/// Outcome of one backend run. Immutable once the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Backend label (`memory`, `sqlite`, `redis`).
    pub backend: String,
    /// True when the backend ran as an in-memory substitute because its
    /// external dependency was unreachable.
    pub degraded: bool,
    /// Messages per second across the whole processing phase.
    pub throughput_msgs_per_sec: f64,
    /// Mean per-call wall time of the add-rule phase, seconds.
    pub avg_add_rule_time_secs: f64,
    /// Mean per-call wall time of the processing phase, seconds.
    pub avg_process_time_secs: f64,
    /// Peak resident memory observed during the processing phase, MiB.
    pub peak_memory_mb: f64,
    /// Mean process CPU usage during the processing phase, percent.
    pub avg_cpu_percent: f64,
    /// Failure marker; set when the backend never completed its run.
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Record for a backend that failed before producing measurements.
    pub fn failed(backend: &str, error: impl ToString) -> Self {
        Self {
            backend: backend.to_string(),
            degraded: false,
            throughput_msgs_per_sec: 0.0,
            avg_add_rule_time_secs: 0.0,
            avg_process_time_secs: 0.0,
            peak_memory_mb: 0.0,
            avg_cpu_percent: 0.0,
            error: Some(error.to_string()),
        }
    }
}

/// Full comparison report: run configuration plus one result per backend,
/// in run order. This structure is the output contract consumed by the
/// visualization tooling.
#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Report creation time, Unix millis.
    pub generated_at_ms: u64,
    /// Parameters the workload ran with.
    pub config: BenchConfig,
    /// Per-backend results in run order.
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Assemble a report stamped with the current time.
    pub fn new(config: BenchConfig, results: Vec<BenchmarkResult>) -> Self {
        let generated_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            generated_at_ms,
            config,
            results,
        }
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Fixed-width comparison table for terminal output.
    pub fn summary_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<18} {:>12} {:>14} {:>12} {:>8}",
            "Backend", "Msg/Sec", "Avg Proc (us)", "Peak MB", "CPU %"
        );
        let _ = writeln!(out, "{}", "-".repeat(68));

        for result in &self.results {
            if let Some(error) = &result.error {
                let _ = writeln!(out, "{:<18} FAILED: {error}", result.backend);
                continue;
            }

            let label = if result.degraded {
                format!("{} (degraded)", result.backend)
            } else {
                result.backend.clone()
            };
            let _ = writeln!(
                out,
                "{:<18} {:>12.2} {:>14.2} {:>12.2} {:>8.2}",
                label,
                result.throughput_msgs_per_sec,
                result.avg_process_time_secs * 1_000_000.0,
                result.peak_memory_mb,
                result.avg_cpu_percent,
            );
        }

        out
    }
}
