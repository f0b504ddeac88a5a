//! Benchmark harness - drives identical workloads against each backend.
//!
//! Components:
//! - [`BenchmarkHarness`]: two-phase workload driver (add rules, process
//!   messages), one backend at a time
//! - [`ResourceMonitor`]: background CPU / RSS sampler on a fixed cadence
//! - [`BenchmarkReport`]: per-backend result records plus the JSON artifact
//!   the visualization tooling consumes

pub mod harness;
pub mod monitor;
pub mod report;

pub use harness::{BackendSpec, BenchConfig, BenchmarkHarness, DEFAULT_RULES};
pub use monitor::{ResourceMonitor, ResourceSample, ResourceSummary};
pub use report::{BenchmarkReport, BenchmarkResult};
