//! Cross-backend storage contract tests.
//!
//! Every backend must satisfy the same contract:
//! - add/get round-trip preserves condition and action
//! - delete returns false for absent ids and is idempotent
//! - clear_all empties the store and is idempotent
//! - malformed conditions are rejected at add-time, count unchanged
//!
//! Ordering guarantees are asserted only for memory and sqlite; redis
//! enumeration order is backend-native and deliberately unspecified, so no
//! test here assumes global ordering consistency across backend types.

use rulebench::{
    InMemoryStorage, RedisConfig, RedisStorage, RuleStorage, SqliteStorage, StorageError,
};

/// Redis spec pointed at a port nothing listens on, so construction always
/// degrades to the in-memory substitute.
fn degraded_redis() -> RedisStorage {
    RedisStorage::connect(RedisConfig {
        url: "redis://127.0.0.1:1/0".to_string(),
        key_prefix: "contract".to_string(),
        fallback_enabled: true,
    })
    .expect("fallback construction never fails")
}

fn all_backends() -> Vec<Box<dyn RuleStorage>> {
    vec![
        Box::new(InMemoryStorage::new()),
        Box::new(SqliteStorage::in_memory().unwrap()),
        Box::new(degraded_redis()),
    ]
}

#[test]
fn test_add_get_round_trip_on_every_backend() {
    for storage in all_backends() {
        let id = storage
            .add_rule("temperature > 25", "High temperature alert")
            .unwrap();

        let rule = storage
            .get_rule(&id)
            .unwrap()
            .unwrap_or_else(|| panic!("rule missing on `{}`", storage.name()));
        assert_eq!(rule.id, id);
        assert_eq!(rule.condition, "temperature > 25");
        assert_eq!(rule.action, "High temperature alert");
    }
}

#[test]
fn test_get_absent_rule_is_none_not_error() {
    for storage in all_backends() {
        assert!(storage.get_rule("no-such-id").unwrap().is_none());
    }
}

#[test]
fn test_delete_semantics_on_every_backend() {
    for storage in all_backends() {
        let id = storage.add_rule("humidity < 30", "dry").unwrap();

        assert!(storage.delete_rule(&id).unwrap(), "{}", storage.name());
        assert!(!storage.delete_rule(&id).unwrap(), "{}", storage.name());
        assert!(!storage.delete_rule("absent").unwrap());
        assert_eq!(storage.count().unwrap(), 0);
    }
}

#[test]
fn test_clear_all_then_count_is_zero_on_every_backend() {
    for storage in all_backends() {
        storage.add_rule("temperature > 25", "a").unwrap();
        storage.add_rule("humidity < 30", "b").unwrap();

        storage.clear_all().unwrap();
        assert_eq!(storage.count().unwrap(), 0, "{}", storage.name());

        // Idempotent on an already-empty store.
        storage.clear_all().unwrap();
        assert_eq!(storage.count().unwrap(), 0);
    }
}

#[test]
fn test_malformed_condition_rejected_on_every_backend() {
    for storage in all_backends() {
        let before = storage.count().unwrap();
        let err = storage.add_rule("pressure >= 1000", "alert").unwrap_err();
        assert!(
            matches!(err, StorageError::Condition(_)),
            "unexpected error on `{}`: {err}",
            storage.name()
        );
        assert_eq!(storage.count().unwrap(), before);
    }
}

#[test]
fn test_insertion_order_for_ordered_backends() {
    let ordered: Vec<Box<dyn RuleStorage>> = vec![
        Box::new(InMemoryStorage::new()),
        Box::new(SqliteStorage::in_memory().unwrap()),
    ];

    for storage in ordered {
        storage.add_rule("temperature > 25", "first").unwrap();
        storage.add_rule("humidity < 30", "second").unwrap();
        storage.add_rule("pressure > 1013", "third").unwrap();

        let actions: Vec<String> = storage
            .get_all_rules()
            .unwrap()
            .into_iter()
            .map(|r| r.action)
            .collect();
        assert_eq!(
            actions,
            vec!["first", "second", "third"],
            "{}",
            storage.name()
        );
    }
}

#[test]
fn test_backend_instances_share_nothing() {
    let a = InMemoryStorage::new();
    let b = InMemoryStorage::new();

    a.add_rule("temperature > 25", "hot").unwrap();
    assert_eq!(a.count().unwrap(), 1);
    assert_eq!(b.count().unwrap(), 0);
}

#[test]
fn test_degraded_redis_reports_flag_and_honors_contract() {
    let storage = degraded_redis();
    assert!(storage.is_degraded());

    let id = storage.add_rule("temperature > 25", "hot").unwrap();
    assert_eq!(storage.count().unwrap(), 1);
    assert_eq!(storage.get_rule(&id).unwrap().unwrap().action, "hot");
    storage.clear_all().unwrap();
    assert_eq!(storage.count().unwrap(), 0);
}

#[test]
fn test_connected_backends_are_not_degraded() {
    assert!(!InMemoryStorage::new().is_degraded());
    assert!(!SqliteStorage::in_memory().unwrap().is_degraded());
}

#[test]
fn test_redis_without_fallback_surfaces_unavailability() {
    let err = RedisStorage::connect(RedisConfig {
        url: "redis://127.0.0.1:1/0".to_string(),
        key_prefix: "contract".to_string(),
        fallback_enabled: false,
    })
    .unwrap_err();

    assert!(matches!(err, StorageError::BackendUnavailable(_)));
}

#[test]
fn test_sqlite_file_store_is_durable_on_return() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("rules.db");

    let id = {
        let storage = SqliteStorage::open(&path).unwrap();
        storage.add_rule("pressure < 950", "Low pressure alert").unwrap()
    };

    // A fresh handle sees the committed rule.
    let reopened = SqliteStorage::open(&path).unwrap();
    let rule = reopened.get_rule(&id).unwrap().unwrap();
    assert_eq!(rule.condition, "pressure < 950");
    assert_eq!(reopened.count().unwrap(), 1);
}
