//! Pluggable rule persistence.
//!
//! Three interchangeable backends behind one trait:
//! - **Memory**: process-local HashMap, no I/O
//! - **SQLite**: single-table embedded store, durable-on-return
//! - **Redis**: remote key/value store with degraded in-memory fallback
//!
//! Each backend owns its rule set independently; no sharing between
//! instances. A backend lives for one engine pairing and is torn down when
//! the benchmark run for that backend completes.

pub mod memory;
pub mod redis;
pub mod sqlite;

pub use memory::InMemoryStorage;
pub use redis::{RedisConfig, RedisStorage};
pub use sqlite::SqliteStorage;

use crate::error::StorageError;
use crate::rule::Rule;

/// Common contract implemented by every storage backend.
///
/// Methods take `&self`; backends that need mutation use interior locking so
/// the trait stays object-safe and engines can hold `Box<dyn RuleStorage>`.
pub trait RuleStorage: Send {
    /// Validate the condition, store the rule, return its assigned id.
    ///
    /// Malformed conditions are rejected here with
    /// [`StorageError::Condition`], never at evaluation-time.
    fn add_rule(&self, condition: &str, action: &str) -> Result<String, StorageError>;

    /// Fetch a rule by id. `None` if absent.
    fn get_rule(&self, id: &str) -> Result<Option<Rule>, StorageError>;

    /// Fetch every rule.
    ///
    /// Memory and SQLite return insertion order. Redis returns whatever its
    /// native set iteration yields; that weaker guarantee is deliberate and
    /// documented on [`RedisStorage`].
    fn get_all_rules(&self) -> Result<Vec<Rule>, StorageError>;

    /// Delete a rule by id. `false` if it was absent.
    fn delete_rule(&self, id: &str) -> Result<bool, StorageError>;

    /// Remove every rule. Idempotent.
    fn clear_all(&self) -> Result<(), StorageError>;

    /// Number of stored rules.
    fn count(&self) -> Result<usize, StorageError>;

    /// Backend label used by the harness to tag results.
    fn name(&self) -> &'static str;

    /// True when the backend is operating as an in-memory substitute because
    /// its intended external dependency was unreachable.
    fn is_degraded(&self) -> bool {
        false
    }
}
