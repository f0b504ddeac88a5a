//! # rule-bench
//!
//! Measures how different persistence strategies affect the latency and
//! throughput of a small condition-matching engine under synthetic IoT-style
//! load.
//!
//! # Architecture
//!
//! - **Storage**: one trait, three interchangeable backends (memory, SQLite,
//!   redis with degraded in-memory fallback)
//! - **Condition**: a single binary comparison per rule, validated at
//!   add-time
//! - **Engine**: evaluates every stored rule per reading, accumulating
//!   running statistics
//! - **Bench**: drives the identical two-phase workload against each backend
//!   while sampling host CPU and memory, producing one comparable result
//!   record per backend
//!
//! # Example
//!
//! ```rust
//! use rulebench::{InMemoryStorage, RulesEngine};
//! use std::collections::HashMap;
//!
//! let mut engine = RulesEngine::new(Box::new(InMemoryStorage::new()));
//! engine.add_rule("temperature > 25", "High temp")?;
//!
//! let reading = HashMap::from([("temperature".to_string(), 30.0)]);
//! let actions = engine.process_message(&reading)?;
//! assert_eq!(actions, vec!["High temp"]);
//! # Ok::<(), rulebench::StorageError>(())
//! ```

pub mod bench;
pub mod condition;
pub mod engine;
pub mod error;
pub mod rule;
pub mod storage;

pub use bench::{
    BackendSpec, BenchConfig, BenchmarkHarness, BenchmarkReport, BenchmarkResult, ResourceMonitor,
};
pub use condition::{Condition, Operator};
pub use engine::{RulesEngine, StatsSnapshot};
pub use error::{ConditionError, StorageError};
pub use rule::{Reading, Rule};
pub use storage::{InMemoryStorage, RedisConfig, RedisStorage, RuleStorage, SqliteStorage};
