//! Two-phase benchmark workload driver.
//!
//! For each backend under test the harness runs:
//! 1. **Add-rule phase**: add a configured number of rules, timing each call
//! 2. **Process-message phase**: process a configured number of seeded
//!    synthetic readings, timing each call while the resource monitor polls
//!    host CPU and memory
//!
//! Backends run strictly sequentially so resource contention never skews
//! measurements; each backend's rule set is cleared before the next starts.
//! A backend that fails to construct is recorded as a failed result and the
//! run proceeds.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::bench::monitor::ResourceMonitor;
use crate::bench::report::{BenchmarkReport, BenchmarkResult};
use crate::engine::RulesEngine;
use crate::error::StorageError;
use crate::rule::Reading;
use crate::storage::{InMemoryStorage, RedisConfig, RedisStorage, RuleStorage, SqliteStorage};

/// Canonical ten-rule IoT workload, cycled through during the add phase.
pub const DEFAULT_RULES: [(&str, &str); 10] = [
    ("temperature > 25", "High temperature alert"),
    ("humidity < 30", "Low humidity warning"),
    ("pressure > 1013", "High pressure detected"),
    ("temperature < 0", "Freezing temperature alert"),
    ("humidity > 80", "High humidity warning"),
    ("pressure < 950", "Low pressure alert"),
    ("temperature > 40", "Critical temperature"),
    ("humidity > 90", "Excessive humidity"),
    ("pressure > 1050", "Extreme pressure"),
    ("temperature < -10", "Extreme cold"),
];

/// Scalar benchmark parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Rules added in phase 1.
    pub rule_count: usize,
    /// Readings processed in phase 2.
    pub message_count: usize,
    /// Resource sampling cadence in milliseconds.
    pub monitor_interval_ms: u64,
    /// Seed for the synthetic reading generator; fixed seed, fixed workload.
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rule_count: 10,
            message_count: 1000,
            monitor_interval_ms: 100,
            seed: 7,
        }
    }
}

impl BenchConfig {
    /// Sampling cadence as a [`Duration`].
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }
}

/// Construction recipe for one backend under test.
///
/// Configuration is passed by value; every spec builds an independently
/// owned storage instance.
#[derive(Debug, Clone)]
pub enum BackendSpec {
    /// Process-memory store.
    InMemory,
    /// Embedded SQLite store; `None` runs in `:memory:` mode.
    Sqlite(Option<PathBuf>),
    /// Remote redis store.
    Redis(RedisConfig),
}

impl BackendSpec {
    /// Label used for results before a storage instance exists.
    pub fn label(&self) -> &'static str {
        match self {
            BackendSpec::InMemory => "memory",
            BackendSpec::Sqlite(_) => "sqlite",
            BackendSpec::Redis(_) => "redis",
        }
    }

    /// Build the backend. The redis connection attempt (or fallback) happens
    /// here, before any measured phase.
    pub fn build(&self) -> Result<Box<dyn RuleStorage>, StorageError> {
        match self {
            BackendSpec::InMemory => Ok(Box::new(InMemoryStorage::new())),
            BackendSpec::Sqlite(None) => Ok(Box::new(SqliteStorage::in_memory()?)),
            BackendSpec::Sqlite(Some(path)) => Ok(Box::new(SqliteStorage::open(path)?)),
            BackendSpec::Redis(config) => Ok(Box::new(RedisStorage::connect(config.clone())?)),
        }
    }
}

/// Generate seeded synthetic readings within realistic sensor ranges.
pub fn generate_readings(count: usize, seed: u64) -> Vec<Reading> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Reading::from([
                ("temperature".to_string(), rng.gen_range(-20.0..50.0)),
                ("humidity".to_string(), rng.gen_range(10.0..100.0)),
                ("pressure".to_string(), rng.gen_range(900.0..1100.0)),
            ])
        })
        .collect()
}

fn mean_secs(samples: &[Duration]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(Duration::as_secs_f64).sum::<f64>() / samples.len() as f64
}

/// Drives the configured workload against each backend in turn.
pub struct BenchmarkHarness {
    config: BenchConfig,
}

impl BenchmarkHarness {
    /// Create a harness for the given parameters.
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    /// Run every backend sequentially and collect the report.
    pub fn run(&self, specs: &[BackendSpec]) -> BenchmarkReport {
        let results = specs.iter().map(|spec| self.run_backend(spec)).collect();
        BenchmarkReport::new(self.config.clone(), results)
    }

    /// Run the two-phase workload against one backend.
    ///
    /// Construction failure (e.g. redis unreachable with fallback disabled)
    /// yields a failed result, never a panic or an aborted run.
    pub fn run_backend(&self, spec: &BackendSpec) -> BenchmarkResult {
        info!("benchmarking backend `{}`", spec.label());

        let storage = match spec.build() {
            Ok(storage) => storage,
            Err(e) => {
                warn!("backend `{}` failed to construct: {e}", spec.label());
                return BenchmarkResult::failed(spec.label(), &e);
            }
        };
        let degraded = storage.is_degraded();
        if degraded {
            info!("backend `{}` is running degraded (in-memory substitute)", spec.label());
        }

        let mut engine = RulesEngine::new(storage);

        // Phase 1: rule addition
        let mut add_times = Vec::with_capacity(self.config.rule_count);
        for i in 0..self.config.rule_count {
            let (cond, action) = DEFAULT_RULES[i % DEFAULT_RULES.len()];
            let start = Instant::now();
            match engine.add_rule(cond, action) {
                Ok(_) => add_times.push(start.elapsed()),
                // Per-rule failures stay local to the rule.
                Err(e) => warn!("add_rule failed on `{}`: {e}", spec.label()),
            }
        }
        if add_times.is_empty() {
            warn!("backend `{}`: every add_rule call failed", spec.label());
            return BenchmarkResult::failed(spec.label(), "every add_rule call failed");
        }

        // Phase 2: message processing under resource sampling
        let readings = generate_readings(self.config.message_count, self.config.seed);
        let monitor = ResourceMonitor::start(self.config.monitor_interval());

        let mut process_times = Vec::with_capacity(readings.len());
        let phase_start = Instant::now();
        for reading in &readings {
            let start = Instant::now();
            match engine.process_message(reading) {
                Ok(_) => process_times.push(start.elapsed()),
                // Per-message failures stay local to the message.
                Err(e) => warn!("process_message failed on `{}`: {e}", spec.label()),
            }
        }
        let phase_elapsed = phase_start.elapsed();
        let resources = monitor.stop();

        // Teardown before the next backend starts.
        if let Err(e) = engine.storage().clear_all() {
            warn!("teardown of `{}` failed: {e}", spec.label());
        }

        let stats = engine.statistics();
        info!(
            "backend `{}`: {} messages, {} rules triggered, {:.2} msg/sec",
            spec.label(),
            stats.messages_processed,
            stats.rules_triggered,
            self.config.message_count as f64 / phase_elapsed.as_secs_f64(),
        );

        BenchmarkResult {
            backend: spec.label().to_string(),
            degraded,
            throughput_msgs_per_sec: self.config.message_count as f64
                / phase_elapsed.as_secs_f64(),
            avg_add_rule_time_secs: mean_secs(&add_times),
            avg_process_time_secs: mean_secs(&process_times),
            peak_memory_mb: resources.peak_memory_mb,
            avg_cpu_percent: resources.avg_cpu_percent,
            error: None,
        }
    }
}
