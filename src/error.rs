//! Error types shared across the crate.
//!
//! Two layers:
//! - [`ConditionError`]: a rule condition failed the grammar check. Raised at
//!   add-time, never at evaluation-time.
//! - [`StorageError`]: a backend operation failed. Wraps the underlying
//!   driver errors so callers can match on the cause.
//!
//! Missing rules are not errors: lookups return `Option` and deletes return
//! `bool`, keeping get/delete idempotent.

use thiserror::Error;

/// A condition string was rejected by the grammar check.
///
/// The grammar is a single binary comparison: `<field> <op> <numeric literal>`
/// with op one of `>`, `<`, `==`, `!=`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConditionError {
    /// No supported comparison operator found in the condition.
    #[error("no supported operator (`==`, `!=`, `>`, `<`) in condition `{0}`")]
    UnsupportedOperator(String),

    /// The field part of the condition is empty.
    #[error("empty field name in condition `{0}`")]
    EmptyField(String),

    /// The literal part of the condition is not a number.
    #[error("non-numeric literal `{literal}` in condition `{condition}`")]
    NonNumericLiteral {
        /// Full condition string as given.
        condition: String,
        /// The offending literal token.
        literal: String,
    },
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Rule condition failed validation at add-time.
    #[error("invalid rule condition: {0}")]
    Condition(#[from] ConditionError),

    /// SQLite operation failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Redis operation failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Rule record could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend could not be reached at construction and fallback is disabled.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend name in the configuration does not exist. Fatal to the run.
    #[error("unknown backend `{0}`, expected one of: memory, sqlite, redis")]
    UnknownBackend(String),
}
