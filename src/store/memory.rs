//! In-process store used by the tests and the criterion bench.
//!
//! Behaves like a single Redis database and counts round-trips so callers can
//! check how many exchanges a strategy needed.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use super::{glob_match, Batch, Command, StoreClient};

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    round_trips: AtomicU64,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanges performed so far. A batch counts as one.
    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    /// SET commands applied so far, batched or not.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn reset_counters(&self) {
        self.round_trips.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data().clone()
    }

    fn data(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn exchange(&self) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
    }
}

impl StoreClient for MemoryStore {
    fn flush_all(&self) -> Result<()> {
        self.exchange();
        self.data().clear();
        Ok(())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.exchange();
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.data().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.exchange();
        Ok(self.data().get(key).cloned())
    }

    fn list_keys(&self, pattern: &str) -> Result<BTreeSet<String>> {
        self.exchange();
        Ok(self
            .data()
            .keys()
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect())
    }

    fn execute_batch(&self, batch: &Batch) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        self.exchange();
        let mut data = self.data();
        for command in batch.commands() {
            match command {
                Command::Set { key, value } => {
                    self.writes.fetch_add(1, Ordering::Relaxed);
                    data.insert(key.clone(), value.clone());
                }
                Command::Get { key } => {
                    let _ = data.get(key);
                }
            }
        }
        Ok(batch.len())
    }
}
