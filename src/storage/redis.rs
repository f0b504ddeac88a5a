//! Redis storage backend with degraded in-memory fallback.
//!
//! Key scheme: one JSON-serialized rule per key (`<prefix>:rule:<id>`) plus a
//! set `<prefix>:index` holding every live id for enumeration.
//!
//! The connection is attempted eagerly at construction, including a `PING`.
//! When the server is unreachable the backend substitutes an
//! [`InMemoryStorage`] and tags itself degraded, observable through
//! [`RuleStorage::is_degraded`], so the harness labels results accurately
//! instead of crediting network behavior to a backend that never ran.
//! Setting [`RedisConfig::fallback_enabled`] to `false` turns that
//! substitution into a [`StorageError::BackendUnavailable`] at construction.

use log::{debug, warn};
use parking_lot::Mutex;
use redis::Commands;
use uuid::Uuid;

use crate::condition;
use crate::error::StorageError;
use crate::rule::Rule;
use crate::storage::{InMemoryStorage, RuleStorage};

/// Construction-time configuration, passed by value. No shared connection
/// pools between instances.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Server URL, e.g. `redis://127.0.0.1:6379/0`.
    pub url: String,
    /// Namespace prefix for every key this store writes.
    pub key_prefix: String,
    /// Substitute an in-memory store when the server is unreachable.
    pub fallback_enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            key_prefix: "rules".to_string(),
            fallback_enabled: true,
        }
    }
}

enum Backing {
    Connected(Mutex<redis::Connection>),
    /// The server was unreachable; rules live in process memory instead.
    Degraded(InMemoryStorage),
}

/// Network-cache rule store.
///
/// Enumeration order is whatever the server's set iteration yields. It is
/// not guaranteed stable, unlike the memory and SQLite backends; that is a
/// deliberate weaker guarantee, not a bug.
pub struct RedisStorage {
    backing: Backing,
    key_prefix: String,
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("key_prefix", &self.key_prefix)
            .field("degraded", &self.is_degraded())
            .finish()
    }
}

impl RedisStorage {
    /// Connect eagerly, falling back to memory when allowed.
    ///
    /// This is the single potentially-blocking call outside the measured
    /// benchmark phases; it completes (or fails over) before any benchmarking
    /// begins.
    pub fn connect(config: RedisConfig) -> Result<Self, StorageError> {
        match Self::try_connect(&config.url) {
            Ok(conn) => {
                debug!("connected to redis at {}", config.url);
                Ok(Self {
                    backing: Backing::Connected(Mutex::new(conn)),
                    key_prefix: config.key_prefix,
                })
            }
            Err(e) if config.fallback_enabled => {
                warn!(
                    "redis unreachable at {} ({e}), falling back to in-memory storage",
                    config.url
                );
                Ok(Self {
                    backing: Backing::Degraded(InMemoryStorage::new()),
                    key_prefix: config.key_prefix,
                })
            }
            Err(e) => Err(StorageError::BackendUnavailable(format!(
                "redis unreachable at {} and fallback is disabled: {e}",
                config.url
            ))),
        }
    }

    fn try_connect(url: &str) -> Result<redis::Connection, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let mut conn = client.get_connection()?;
        redis::cmd("PING").query::<String>(&mut conn)?;
        Ok(conn)
    }

    fn rule_key(&self, id: &str) -> String {
        format!("{}:rule:{}", self.key_prefix, id)
    }

    fn index_key(&self) -> String {
        format!("{}:index", self.key_prefix)
    }
}

impl RuleStorage for RedisStorage {
    fn add_rule(&self, cond: &str, action: &str) -> Result<String, StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.add_rule(cond, action),
            Backing::Connected(conn) => {
                condition::validate(cond)?;

                let id = Uuid::new_v4().to_string();
                let rule = Rule::new(id.clone(), cond, action);
                let payload = serde_json::to_string(&rule)?;

                let mut conn = conn.lock();
                let _: () = conn.set(self.rule_key(&id), payload)?;
                let _: i64 = conn.sadd(self.index_key(), &id)?;
                Ok(id)
            }
        }
    }

    fn get_rule(&self, id: &str) -> Result<Option<Rule>, StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.get_rule(id),
            Backing::Connected(conn) => {
                let mut conn = conn.lock();
                let payload: Option<String> = conn.get(self.rule_key(id))?;
                payload
                    .map(|raw| serde_json::from_str(&raw))
                    .transpose()
                    .map_err(StorageError::from)
            }
        }
    }

    fn get_all_rules(&self) -> Result<Vec<Rule>, StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.get_all_rules(),
            Backing::Connected(conn) => {
                let mut conn = conn.lock();
                let ids: Vec<String> = conn.smembers(self.index_key())?;

                let mut rules = Vec::with_capacity(ids.len());
                for id in ids {
                    let payload: Option<String> = conn.get(self.rule_key(&id))?;
                    if let Some(raw) = payload {
                        rules.push(serde_json::from_str(&raw)?);
                    }
                }
                Ok(rules)
            }
        }
    }

    fn delete_rule(&self, id: &str) -> Result<bool, StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.delete_rule(id),
            Backing::Connected(conn) => {
                let mut conn = conn.lock();
                let removed: i64 = conn.del(self.rule_key(id))?;
                let _: i64 = conn.srem(self.index_key(), id)?;
                Ok(removed > 0)
            }
        }
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.clear_all(),
            Backing::Connected(conn) => {
                let mut conn = conn.lock();
                let ids: Vec<String> = conn.smembers(self.index_key())?;
                for id in &ids {
                    let _: i64 = conn.del(self.rule_key(id))?;
                }
                let _: i64 = conn.del(self.index_key())?;
                Ok(())
            }
        }
    }

    fn count(&self) -> Result<usize, StorageError> {
        match &self.backing {
            Backing::Degraded(fallback) => fallback.count(),
            Backing::Connected(conn) => {
                let mut conn = conn.lock();
                let count: i64 = conn.scard(self.index_key())?;
                Ok(count as usize)
            }
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }

    fn is_degraded(&self) -> bool {
        matches!(self.backing, Backing::Degraded(_))
    }
}
