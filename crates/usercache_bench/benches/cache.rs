//! User cache benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use usercache_bench::{generate_messages, generate_population, KEYS};
use usercache_core::{TenantId, TimeField, TimeQuery};
use usercache_service::{CacheConfig, ClaimMode, UserCache};
use usercache_storage::{FileStore, InMemoryStore, RecordStore};

/// Benchmark claiming every message for one user among many.
fn bench_get_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_message");

    for per_tenant in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*per_tenant as u64));
        for mode in [ClaimMode::Atomic, ClaimMode::TwoPhase] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), per_tenant),
                per_tenant,
                |b, &per_tenant| {
                    let (users, entries) = generate_population(10, per_tenant);
                    let store = Arc::new(InMemoryStore::with_entries(entries));
                    let cache = UserCache::with_config(
                        users[0],
                        store,
                        CacheConfig::new().with_claim_mode(mode),
                    );

                    b.iter(|| {
                        let claimed = cache.get_message(None, None).unwrap();
                        black_box(claimed);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark a keyed, windowed claim.
fn bench_get_message_filtered(c: &mut Criterion) {
    let (users, entries) = generate_population(10, 10_000);
    let store = Arc::new(InMemoryStore::with_entries(entries));
    let cache = UserCache::new(users[0], store);
    let keys = vec![KEYS[0].to_string()];
    let window = TimeQuery::new(TimeField::WriteTs, Some(2_500.0), 7_500.0).unwrap();

    c.bench_function("get_message_filtered", |b| {
        b.iter(|| {
            let claimed = cache
                .get_message(Some(black_box(keys.as_slice())), Some(black_box(&window)))
                .unwrap();
            black_box(claimed);
        });
    });
}

/// Benchmark clearing a window of processed messages.
fn bench_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("clear_processed_messages");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let user = TenantId::new();
            let window = TimeQuery::until(TimeField::WriteTs, f64::MAX).unwrap();

            b.iter_batched(
                || {
                    let store = Arc::new(InMemoryStore::with_entries(generate_messages(user, count)));
                    UserCache::new(user, store)
                },
                |cache| {
                    let deleted = cache.clear_processed_messages(&window, None).unwrap();
                    black_box(deleted);
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

/// Benchmark document upserts on both stores.
fn bench_put_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_document");

    group.bench_function("memory", |b| {
        let cache = UserCache::new(TenantId::new(), Arc::new(InMemoryStore::new()));
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            cache
                .put_document(black_box("config/sync_config"), json!({"interval": n}))
                .unwrap();
        });
    });

    // Every write rewrites the entries file
    group.sample_size(20);
    for existing in [10, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("file", existing), existing, |b, &existing| {
            let temp_dir = TempDir::new().unwrap();
            let store = Arc::new(FileStore::open(temp_dir.path()).unwrap());
            let user = TenantId::new();
            store.insert_many(generate_messages(user, existing)).unwrap();
            let cache = UserCache::new(user, store);

            let mut n = 0u64;
            b.iter(|| {
                n += 1;
                cache
                    .put_document(black_box("config/sync_config"), json!({"interval": n}))
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_get_message,
    bench_get_message_filtered,
    bench_clear,
    bench_put_document,
);

criterion_main!(benches);
