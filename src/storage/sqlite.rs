//! SQLite storage backend.

use log::debug;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use uuid::Uuid;

use crate::condition;
use crate::error::StorageError;
use crate::rule::Rule;
use crate::storage::RuleStorage;

/// Embedded single-writer rule store.
///
/// One table: `rules(id, condition, action)`. Every mutating call opens a
/// transaction and commits before returning, so add/delete are durable on
/// return. Enumeration is ordered by rowid, which is insertion order.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Open (or create) a database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::BackendUnavailable(format!(
                        "cannot create sqlite directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        debug!("opening sqlite store at {}", path.display());
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an ephemeral `:memory:` database, for testing without disk
    /// persistence.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS rules (
                id TEXT PRIMARY KEY,
                condition TEXT NOT NULL,
                action TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl RuleStorage for SqliteStorage {
    fn add_rule(&self, cond: &str, action: &str) -> Result<String, StorageError> {
        condition::validate(cond)?;

        let id = Uuid::new_v4().to_string();
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO rules (id, condition, action) VALUES (?1, ?2, ?3)",
            params![id, cond, action],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn get_rule(&self, id: &str) -> Result<Option<Rule>, StorageError> {
        let conn = self.conn.lock();
        let result = conn.query_row(
            "SELECT id, condition, action FROM rules WHERE id = ?1",
            params![id],
            |row| {
                Ok(Rule {
                    id: row.get(0)?,
                    condition: row.get(1)?,
                    action: row.get(2)?,
                })
            },
        );

        match result {
            Ok(rule) => Ok(Some(rule)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn get_all_rules(&self) -> Result<Vec<Rule>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT id, condition, action FROM rules ORDER BY rowid")?;
        let rules = stmt
            .query_map([], |row| {
                Ok(Rule {
                    id: row.get(0)?,
                    condition: row.get(1)?,
                    action: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    fn delete_rule(&self, id: &str) -> Result<bool, StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let rows = tx.execute("DELETE FROM rules WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(rows > 0)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM rules", [])?;
        tx.commit()?;
        Ok(())
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM rules", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
