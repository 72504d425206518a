//! Workload shape: how many records, how many trials, and the synthetic
//! key/value pairs written by every strategy.

/// Number of timed trials per phase. Averages always divide by this.
pub const TRIAL_COUNT: u32 = 3;

/// Immutable description of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadSpec {
    pub record_count: usize,
    pub trial_count: u32,
}

impl WorkloadSpec {
    pub fn new(record_count: usize) -> Self {
        Self {
            record_count,
            trial_count: TRIAL_COUNT,
        }
    }

    /// All records of the workload, in index order.
    pub fn records(&self) -> impl Iterator<Item = KeyValueRecord> {
        (0..self.record_count).map(KeyValueRecord::new)
    }
}

/// Synthetic pair `("key{i}", "value{i}")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueRecord {
    pub key: String,
    pub value: String,
}

impl KeyValueRecord {
    pub fn new(index: usize) -> Self {
        Self {
            key: record_key(index),
            value: record_value(index),
        }
    }
}

#[inline]
pub fn record_key(index: usize) -> String {
    format!("key{}", index)
}

#[inline]
pub fn record_value(index: usize) -> String {
    format!("value{}", index)
}
