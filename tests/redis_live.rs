//! Full run against a real Redis server.
//!
//! Only runs when `REDIS_URL` is set and the server answers; otherwise each
//! test returns early. The target database is flushed.

mod common;

use common::{expected_keys, workers};
use redis_pipeline_bench::report::{OutputFormat, Reporter};
use redis_pipeline_bench::runner::BenchmarkRunner;
use redis_pipeline_bench::store::{Batch, RedisStore, StoreClient};
use redis_pipeline_bench::workload::WorkloadSpec;

fn live_store() -> Option<RedisStore> {
    let url = std::env::var("REDIS_URL").ok()?;
    match RedisStore::connect(&url) {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("skipping live Redis test: {:#}", e);
            None
        }
    }
}

#[test]
fn basic_commands_round_trip() {
    let Some(store) = live_store() else { return };

    store.flush_all().unwrap();
    assert!(store.list_keys("*").unwrap().is_empty());

    store.set("key1", "value1").unwrap();
    assert_eq!(store.get("key1").unwrap().as_deref(), Some("value1"));
    assert_eq!(store.get("missing").unwrap(), None);

    let mut batch = Batch::new();
    batch.set("key2", "value2").get("key1").get("missing");
    assert_eq!(store.execute_batch(&batch).unwrap(), 3);
    assert_eq!(store.list_keys("key*").unwrap().len(), 2);
}

#[test]
fn full_run_leaves_the_workload_in_redis() {
    let Some(store) = live_store() else { return };

    let runner = BenchmarkRunner::new(&store, WorkloadSpec::new(1_000), workers(8));
    let mut reporter = Reporter::new(Vec::new(), OutputFormat::Text);
    let reports = runner.run(&mut reporter).unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(store.list_keys("*").unwrap(), expected_keys(1_000));
    // Parallel workers return their connections to the pool.
    assert!(store.idle_connections() >= 1);
}
