//! Criterion micro-benchmarks for the evaluation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rulebench::{Condition, InMemoryStorage, Reading, RulesEngine};

fn bench_condition_parse(c: &mut Criterion) {
    c.bench_function("condition_parse", |b| {
        b.iter(|| Condition::parse(black_box("temperature > 25")).unwrap())
    });
}

fn bench_condition_evaluate(c: &mut Criterion) {
    let cond = Condition::parse("temperature > 25").unwrap();
    let reading = Reading::from([
        ("temperature".to_string(), 30.0),
        ("humidity".to_string(), 20.0),
        ("pressure".to_string(), 1013.0),
    ]);

    c.bench_function("condition_evaluate", |b| {
        b.iter(|| cond.evaluate(black_box(&reading)))
    });
}

fn bench_process_message_in_memory(c: &mut Criterion) {
    let mut engine = RulesEngine::new(Box::new(InMemoryStorage::new()));
    for (cond, action) in [
        ("temperature > 25", "High temperature alert"),
        ("humidity < 30", "Low humidity warning"),
        ("pressure > 1013", "High pressure detected"),
        ("temperature < 0", "Freezing temperature alert"),
        ("humidity > 80", "High humidity warning"),
    ] {
        engine.add_rule(cond, action).unwrap();
    }

    let reading = Reading::from([
        ("temperature".to_string(), 30.0),
        ("humidity".to_string(), 20.0),
        ("pressure".to_string(), 1013.25),
    ]);

    c.bench_function("process_message_memory_5_rules", |b| {
        b.iter(|| engine.process_message(black_box(&reading)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_condition_parse,
    bench_condition_evaluate,
    bench_process_message_in_memory
);
criterion_main!(benches);
