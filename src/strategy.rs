//! The three dispatch strategies under benchmark.
//!
//! A strategy only decides how one trial issues its commands. Flushing, key
//! listing and timing belong to the runner so every strategy is measured the
//! same way.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use anyhow::Result;

use crate::store::{Batch, StoreClient};
use crate::workload::{record_key, record_value, WorkloadSpec};

pub trait Strategy: Send + Sync {
    /// Short name used in report lines and result files.
    fn name(&self) -> &'static str;

    /// Write every record of `spec` once.
    fn set_trial(&self, store: &dyn StoreClient, spec: &WorkloadSpec) -> Result<()>;

    /// Read every key of `keys` once.
    fn get_trial(&self, store: &dyn StoreClient, keys: &BTreeSet<String>) -> Result<()>;
}

/// One call at a time, each waiting for its reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Strategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn set_trial(&self, store: &dyn StoreClient, spec: &WorkloadSpec) -> Result<()> {
        for i in 0..spec.record_count {
            store.set(&record_key(i), &record_value(i))?;
        }
        Ok(())
    }

    fn get_trial(&self, store: &dyn StoreClient, keys: &BTreeSet<String>) -> Result<()> {
        for key in keys {
            store.get(key)?;
        }
        Ok(())
    }
}

/// Every command of the trial queued into one pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Batched;

impl Strategy for Batched {
    fn name(&self) -> &'static str {
        "batched"
    }

    fn set_trial(&self, store: &dyn StoreClient, spec: &WorkloadSpec) -> Result<()> {
        let mut batch = Batch::with_capacity(spec.record_count);
        for i in 0..spec.record_count {
            batch.set(record_key(i), record_value(i));
        }
        store.execute_batch(&batch)?;
        Ok(())
    }

    fn get_trial(&self, store: &dyn StoreClient, keys: &BTreeSet<String>) -> Result<()> {
        let mut batch = Batch::with_capacity(keys.len());
        for key in keys {
            batch.get(key.as_str());
        }
        store.execute_batch(&batch)?;
        Ok(())
    }
}

/// Independent single calls fanned out over a bounded pool of workers.
///
/// Workers pull the next index from a shared cursor, so no ordering between
/// calls is defined. The first failing call stops the others from taking new
/// work and its error is returned.
#[derive(Debug, Clone, Copy)]
pub struct Parallel {
    workers: NonZeroUsize,
}

impl Parallel {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// One worker per available execution unit.
    pub fn with_available_parallelism() -> Self {
        Self::new(default_workers())
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    fn fan_out<F>(&self, jobs: usize, op: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        if jobs == 0 {
            return Ok(());
        }

        let cursor = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let workers = self.workers.get().min(jobs);
        let (op, cursor, failed) = (&op, &cursor, &failed);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || -> Result<()> {
                        while !failed.load(Ordering::Relaxed) {
                            let i = cursor.fetch_add(1, Ordering::Relaxed);
                            if i >= jobs {
                                break;
                            }
                            if let Err(e) = op(i) {
                                failed.store(true, Ordering::Relaxed);
                                return Err(e);
                            }
                        }
                        Ok(())
                    })
                })
                .collect();

            let mut first_err = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        first_err.get_or_insert(e);
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            first_err.map_or(Ok(()), Err)
        })
    }
}

impl Default for Parallel {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

impl Strategy for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn set_trial(&self, store: &dyn StoreClient, spec: &WorkloadSpec) -> Result<()> {
        self.fan_out(spec.record_count, |i| {
            store.set(&record_key(i), &record_value(i))
        })
    }

    fn get_trial(&self, store: &dyn StoreClient, keys: &BTreeSet<String>) -> Result<()> {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.fan_out(keys.len(), |i| store.get(keys[i]).map(drop))
    }
}

pub fn default_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

/// The benchmark order: sequential, batched, parallel.
pub fn all_strategies(workers: NonZeroUsize) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(Sequential),
        Box::new(Batched),
        Box::new(Parallel::new(workers)),
    ]
}
