//! Dispatch overhead of each strategy against the in-process store.
//!
//! No network is involved, so this isolates the client-side cost of building
//! batches and fanning out to workers.
//!
//! Run: `cargo bench --bench strategies`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use redis_pipeline_bench::store::{MemoryStore, StoreClient};
use redis_pipeline_bench::strategy::{all_strategies, default_workers};
use redis_pipeline_bench::workload::WorkloadSpec;

const RECORD_COUNTS: [usize; 2] = [1_000, 10_000];

fn set_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy/set");

    for records in RECORD_COUNTS {
        let spec = WorkloadSpec::new(records);
        group.throughput(Throughput::Elements(records as u64));
        for strategy in all_strategies(default_workers()) {
            let store = MemoryStore::new();
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), records),
                &spec,
                |b, spec| {
                    b.iter(|| strategy.set_trial(&store, spec).unwrap());
                },
            );
        }
    }
    group.finish();
}

fn get_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy/get");

    for records in RECORD_COUNTS {
        let spec = WorkloadSpec::new(records);
        group.throughput(Throughput::Elements(records as u64));
        for strategy in all_strategies(default_workers()) {
            let store = MemoryStore::new();
            strategy.set_trial(&store, &spec).unwrap();
            let keys = store.list_keys("*").unwrap();
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), records),
                &keys,
                |b, keys| {
                    b.iter(|| strategy.get_trial(&store, keys).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, set_trial, get_trial);
criterion_main!(benches);
