//! Rules engine: evaluates every stored rule against incoming readings.

use log::warn;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::condition::Condition;
use crate::error::StorageError;
use crate::rule::Reading;
use crate::storage::RuleStorage;

/// Running counters accumulated across `process_message` calls.
///
/// Invariant: `rules_triggered <= messages_processed * rule_count`.
#[derive(Debug, Default)]
struct EngineStats {
    messages_processed: u64,
    rules_triggered: u64,
    total_processing_time: Duration,
    processing_time_samples: Vec<Duration>,
}

/// Read-only snapshot of the engine statistics.
///
/// Times are in seconds to match the benchmark result artifact.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Messages processed since construction or the last reset.
    pub messages_processed: u64,
    /// Total number of rule matches across all messages.
    pub rules_triggered: u64,
    /// Accumulated wall time spent in `process_message`.
    pub total_processing_time_secs: f64,
    /// `total / max(messages_processed, 1)`.
    pub average_processing_time_secs: f64,
}

/// Processes readings against the rules held by one storage backend.
///
/// Stateless across messages apart from the statistics accumulator; the
/// engine never retains rules between `process_message` calls.
pub struct RulesEngine {
    storage: Box<dyn RuleStorage>,
    stats: EngineStats,
}

impl RulesEngine {
    /// Create an engine over the given backend.
    pub fn new(storage: Box<dyn RuleStorage>) -> Self {
        Self {
            storage,
            stats: EngineStats::default(),
        }
    }

    /// Add a rule. Delegates to storage; records no statistic.
    pub fn add_rule(&self, condition: &str, action: &str) -> Result<String, StorageError> {
        self.storage.add_rule(condition, action)
    }

    /// Process one reading against every stored rule.
    ///
    /// Returns the actions whose condition matched, in storage-returned
    /// order, duplicates preserved. Every rule is evaluated even after a
    /// match: rule sets expect cumulative alerting, so there is no
    /// short-circuit. Storage contents are never mutated.
    pub fn process_message(&mut self, reading: &Reading) -> Result<Vec<String>, StorageError> {
        let start = Instant::now();
        let mut triggered = Vec::new();

        for rule in self.storage.get_all_rules()? {
            // Conditions are validated at add-time; a row that no longer
            // parses (hand-edited database) is treated as a non-match.
            let matched = match Condition::parse(&rule.condition) {
                Ok(cond) => cond.evaluate(reading),
                Err(e) => {
                    warn!("skipping stored rule {} with stale condition: {e}", rule.id);
                    false
                }
            };

            if matched {
                triggered.push(rule.action);
            }
        }

        let elapsed = start.elapsed();
        self.stats.messages_processed += 1;
        self.stats.rules_triggered += triggered.len() as u64;
        self.stats.total_processing_time += elapsed;
        self.stats.processing_time_samples.push(elapsed);

        Ok(triggered)
    }

    /// Snapshot the current statistics.
    pub fn statistics(&self) -> StatsSnapshot {
        let total = self.stats.total_processing_time.as_secs_f64();
        let divisor = self.stats.messages_processed.max(1) as f64;

        StatsSnapshot {
            messages_processed: self.stats.messages_processed,
            rules_triggered: self.stats.rules_triggered,
            total_processing_time_secs: total,
            average_processing_time_secs: total / divisor,
        }
    }

    /// Per-call wall times recorded by `process_message`, in call order.
    pub fn processing_time_samples(&self) -> &[Duration] {
        &self.stats.processing_time_samples
    }

    /// Zero all counters and clear samples. Storage is untouched.
    pub fn reset_statistics(&mut self) {
        self.stats = EngineStats::default();
    }

    /// The backend this engine runs against.
    pub fn storage(&self) -> &dyn RuleStorage {
        self.storage.as_ref()
    }
}
