//! In-memory storage backend.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::condition;
use crate::error::StorageError;
use crate::rule::Rule;
use crate::storage::RuleStorage;

/// Process-memory rule store.
///
/// Ids are sequential integers rendered as strings. Every operation is O(1)
/// except enumeration; insertion order is preserved for `get_all_rules`.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    rules: HashMap<String, Rule>,
    /// Ids in insertion order; kept in sync with `rules`.
    order: Vec<String>,
    next_id: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RuleStorage for InMemoryStorage {
    fn add_rule(&self, cond: &str, action: &str) -> Result<String, StorageError> {
        condition::validate(cond)?;

        let mut inner = self.inner.write();
        let id = inner.next_id.to_string();
        inner.next_id += 1;
        inner
            .rules
            .insert(id.clone(), Rule::new(id.clone(), cond, action));
        inner.order.push(id.clone());
        Ok(id)
    }

    fn get_rule(&self, id: &str) -> Result<Option<Rule>, StorageError> {
        Ok(self.inner.read().rules.get(id).cloned())
    }

    fn get_all_rules(&self) -> Result<Vec<Rule>, StorageError> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.rules.get(id))
            .cloned()
            .collect())
    }

    fn delete_rule(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.inner.write();
        let removed = inner.rules.remove(id).is_some();
        if removed {
            inner.order.retain(|existing| existing != id);
        }
        Ok(removed)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        inner.rules.clear();
        inner.order.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().rules.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
