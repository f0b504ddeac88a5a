//! End-to-end engine scenarios across backends, plus a small harness run.

use rulebench::{
    BackendSpec, BenchConfig, BenchmarkHarness, InMemoryStorage, Reading, RuleStorage, RulesEngine,
    SqliteStorage, StorageError,
};

fn reading(pairs: &[(&str, f64)]) -> Reading {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn engines_with_ordered_backends() -> Vec<RulesEngine> {
    vec![
        RulesEngine::new(Box::new(InMemoryStorage::new())),
        RulesEngine::new(Box::new(SqliteStorage::in_memory().unwrap())),
    ]
}

#[test]
fn test_matching_rules_trigger_in_insertion_order() {
    for mut engine in engines_with_ordered_backends() {
        engine.add_rule("temperature > 25", "High temp").unwrap();
        engine.add_rule("humidity < 30", "Low humidity").unwrap();

        let actions = engine
            .process_message(&reading(&[("temperature", 30.0), ("humidity", 20.0)]))
            .unwrap();
        assert_eq!(actions, vec!["High temp", "Low humidity"]);
    }
}

#[test]
fn test_absent_field_and_false_condition_yield_no_actions() {
    for mut engine in engines_with_ordered_backends() {
        engine.add_rule("temperature > 25", "High temp").unwrap();
        engine.add_rule("humidity < 30", "Low humidity").unwrap();

        let actions = engine.process_message(&reading(&[("humidity", 40.0)])).unwrap();
        assert_eq!(actions, Vec::<String>::new());
    }
}

#[test]
fn test_unsupported_operator_rejected_with_count_unchanged() {
    for engine in engines_with_ordered_backends() {
        let err = engine
            .add_rule("pressure >= 1000", "High pressure")
            .unwrap_err();
        assert!(matches!(err, StorageError::Condition(_)));
        assert_eq!(engine.storage().count().unwrap(), 0);
    }
}

#[test]
fn test_processing_does_not_mutate_storage() {
    for mut engine in engines_with_ordered_backends() {
        engine.add_rule("temperature > 25", "High temp").unwrap();
        engine.add_rule("humidity < 30", "Low humidity").unwrap();

        let input = reading(&[("temperature", 30.0), ("humidity", 20.0)]);
        let before = engine.storage().get_all_rules().unwrap();

        let first = engine.process_message(&input).unwrap();
        let second = engine.process_message(&input).unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.storage().get_all_rules().unwrap(), before);
        assert_eq!(engine.statistics().messages_processed, 2);
    }
}

#[test]
fn test_harness_produces_one_result_per_backend_in_run_order() {
    let harness = BenchmarkHarness::new(BenchConfig {
        rule_count: 5,
        message_count: 20,
        monitor_interval_ms: 10,
        seed: 7,
    });

    let specs = [BackendSpec::InMemory, BackendSpec::Sqlite(None)];
    let report = harness.run(&specs);

    let names: Vec<&str> = report.results.iter().map(|r| r.backend.as_str()).collect();
    assert_eq!(names, vec!["memory", "sqlite"]);

    for result in &report.results {
        assert!(result.error.is_none(), "{}: {:?}", result.backend, result.error);
        assert!(result.throughput_msgs_per_sec > 0.0);
        assert!(result.avg_add_rule_time_secs > 0.0);
        assert!(result.avg_process_time_secs > 0.0);
    }
}

#[test]
fn test_harness_clears_backend_after_run() {
    // The harness owns its engines, so observe teardown through a durable
    // sqlite file the next handle can inspect.
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("bench.db");

    let harness = BenchmarkHarness::new(BenchConfig {
        rule_count: 3,
        message_count: 5,
        monitor_interval_ms: 10,
        seed: 7,
    });
    let result = harness.run_backend(&BackendSpec::Sqlite(Some(path.clone())));
    assert!(result.error.is_none());

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.count().unwrap(), 0);
}
