//! # Benchmark Runner Entry Point
//!
//! Runs the two-phase workload against each configured backend, prints the
//! comparison table, and writes the JSON result artifact the visualization
//! tooling consumes.

use rulebench::{BackendSpec, BenchConfig, BenchmarkHarness, RedisConfig, StorageError};
use std::path::PathBuf;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// Resolve a backend name from `BENCH_BACKENDS` into a construction spec.
///
/// An unknown name is the one configuration error that is fatal to the run.
fn resolve_backend(name: &str) -> Result<BackendSpec, StorageError> {
    match name.trim() {
        "memory" | "in-memory" => Ok(BackendSpec::InMemory),
        "sqlite" => {
            let path = std::env::var("SQLITE_PATH").unwrap_or_default();
            if path.is_empty() {
                Ok(BackendSpec::Sqlite(None))
            } else {
                Ok(BackendSpec::Sqlite(Some(PathBuf::from(path))))
            }
        }
        "redis" => {
            let mut config = RedisConfig::default();
            if let Ok(url) = std::env::var("REDIS_URL") {
                config.url = url;
            }
            if let Ok(raw) = std::env::var("REDIS_FALLBACK") {
                config.fallback_enabled = !matches!(raw.as_str(), "0" | "false" | "no");
            }
            Ok(BackendSpec::Redis(config))
        }
        other => Err(StorageError::UnknownBackend(other.to_string())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = BenchConfig {
        rule_count: env_parse("BENCH_RULE_COUNT", 10),
        message_count: env_parse("BENCH_MESSAGE_COUNT", 1000),
        monitor_interval_ms: env_parse("BENCH_MONITOR_INTERVAL_MS", 100),
        seed: env_parse("BENCH_SEED", 7),
    };

    let backend_names =
        std::env::var("BENCH_BACKENDS").unwrap_or_else(|_| "memory,sqlite,redis".to_string());
    let specs = backend_names
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(resolve_backend)
        .collect::<Result<Vec<_>, _>>()?;

    let results_path = std::env::var("BENCH_RESULTS_PATH")
        .unwrap_or_else(|_| "logs/benchmark_results.json".to_string());

    println!("=================================================");
    println!("  IoT Rules Engine - Storage Backend Benchmark  ");
    println!("=================================================");
    println!();
    println!("Workload:");
    println!("  - Rules: {}", config.rule_count);
    println!("  - Messages: {}", config.message_count);
    println!("  - Monitor interval: {} ms", config.monitor_interval_ms);
    println!("  - Seed: {}", config.seed);
    println!();

    let harness = BenchmarkHarness::new(config);
    let report = harness.run(&specs);

    println!("Benchmark Summary");
    println!("=================================================");
    print!("{}", report.summary_table());
    println!();

    report.write_json(&results_path)?;
    println!("Results saved to {results_path}");

    Ok(())
}
