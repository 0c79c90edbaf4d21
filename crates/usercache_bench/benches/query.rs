//! Filter construction and matching benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use usercache_bench::{generate_population, KEYS};
use usercache_core::{message_filter, TimeField, TimeQuery};

/// Benchmark building a full message filter.
fn bench_build_filter(c: &mut Criterion) {
    let (users, _) = generate_population(1, 0);
    let keys: Vec<String> = KEYS.iter().map(|k| k.to_string()).collect();
    let window = TimeQuery::new(TimeField::WriteTs, Some(10.0), 20.0).unwrap();

    c.bench_function("message_filter_build", |b| {
        b.iter(|| {
            let filter = message_filter(black_box(users[0]), black_box(&keys), Some(&window));
            black_box(filter);
        });
    });
}

/// Benchmark evaluating a filter across a mixed-tenant population.
fn bench_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_match");

    for tenants in [1, 10, 100].iter() {
        let (users, entries) = generate_population(*tenants, 1_000);
        let window = TimeQuery::new(TimeField::WriteTs, Some(100.0), 900.0).unwrap();
        let filter = message_filter(users[0], &[KEYS[1].to_string()], Some(&window));

        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tenants), &entries, |b, entries| {
            b.iter(|| {
                let matched = entries.iter().filter(|e| filter.matches(e)).count();
                black_box(matched);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_filter, bench_match);
criterion_main!(benches);
