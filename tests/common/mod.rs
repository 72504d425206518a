//! Shared test utilities: store wrappers that trace or fail calls.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use redis_pipeline_bench::store::{Batch, MemoryStore, StoreClient};

pub fn workers(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("worker count must be positive")
}

pub fn expected_keys(record_count: usize) -> BTreeSet<String> {
    (0..record_count).map(|i| format!("key{}", i)).collect()
}

// =============================================================================
// Tracing store
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Flush,
    Set,
    Get,
    List,
    Batch(usize),
}

/// Memory store that records the kind of every call, in order.
#[derive(Default)]
pub struct TracingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
}

impl TracingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl StoreClient for TracingStore {
    fn flush_all(&self) -> Result<()> {
        self.push(Call::Flush);
        self.inner.flush_all()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.push(Call::Set);
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.push(Call::Get);
        self.inner.get(key)
    }

    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>> {
        self.push(Call::List);
        self.inner.list_keys(pattern)
    }

    fn execute_batch(&self, batch: &Batch) -> Result<usize> {
        self.push(Call::Batch(batch.len()));
        self.inner.execute_batch(batch)
    }
}

// =============================================================================
// Failing store
// =============================================================================

/// Memory store whose `fail_on`-th SET call (1-based) returns an error.
pub struct FailingStore {
    pub inner: MemoryStore,
    sets: AtomicUsize,
    fail_on: usize,
    fail_batches: bool,
}

impl FailingStore {
    pub fn failing_set(fail_on: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            sets: AtomicUsize::new(0),
            fail_on,
            fail_batches: false,
        }
    }

    pub fn failing_batches() -> Self {
        Self {
            inner: MemoryStore::new(),
            sets: AtomicUsize::new(0),
            fail_on: usize::MAX,
            fail_batches: true,
        }
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl StoreClient for FailingStore {
    fn flush_all(&self) -> Result<()> {
        self.inner.flush_all()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let n = self.sets.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            bail!("connection reset while writing {}", key);
        }
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>> {
        self.inner.list_keys(pattern)
    }

    fn execute_batch(&self, batch: &Batch) -> Result<usize> {
        if self.fail_batches {
            bail!("pipeline broken");
        }
        self.inner.execute_batch(batch)
    }
}

// =============================================================================
// Slow store
// =============================================================================

/// Memory store that sleeps before answering, with a separate delay for the
/// untimed housekeeping calls (flush and key listing).
pub struct SlowStore {
    pub inner: MemoryStore,
    pub per_set: Duration,
    pub per_get: Duration,
    pub per_batch: Duration,
    pub housekeeping: Duration,
}

impl SlowStore {
    pub fn new(
        per_set_ms: u64,
        per_get_ms: u64,
        per_batch_ms: u64,
        housekeeping_ms: u64,
    ) -> Self {
        Self {
            inner: MemoryStore::new(),
            per_set: Duration::from_millis(per_set_ms),
            per_get: Duration::from_millis(per_get_ms),
            per_batch: Duration::from_millis(per_batch_ms),
            housekeeping: Duration::from_millis(housekeeping_ms),
        }
    }
}

impl StoreClient for SlowStore {
    fn flush_all(&self) -> Result<()> {
        thread::sleep(self.housekeeping);
        self.inner.flush_all()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        thread::sleep(self.per_set);
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        thread::sleep(self.per_get);
        self.inner.get(key)
    }

    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>> {
        thread::sleep(self.housekeeping);
        self.inner.list_keys(pattern)
    }

    fn execute_batch(&self, batch: &Batch) -> Result<usize> {
        thread::sleep(self.per_batch);
        self.inner.execute_batch(batch)
    }
}
