//! Trial timing and averaging.

use std::fmt;
use std::time::Instant;

use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Set,
    Get,
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Get => "get",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accumulates the wall-clock time of the trials of one phase.
///
/// Each trial is truncated to whole milliseconds before it is added, so the
/// total is the sum of the per-trial millisecond readings.
#[derive(Debug, Default)]
pub struct TrialClock {
    trial_millis: Vec<u64>,
}

impl TrialClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time one trial. Only `trial` itself runs inside the timed window.
    pub fn measure<T>(&mut self, trial: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let out = trial()?;
        self.trial_millis.push(start.elapsed().as_millis() as u64);
        Ok(out)
    }

    /// Millis of the last completed trial.
    pub fn last_millis(&self) -> Option<u64> {
        self.trial_millis.last().copied()
    }

    pub fn total_millis(&self) -> u64 {
        self.trial_millis.iter().sum()
    }

    /// Close the phase. `trial_count` is the fixed count the average divides
    /// by, regardless of how many trials were measured.
    pub fn finish(
        self,
        operation: OperationKind,
        strategy: &str,
        trial_count: u32,
    ) -> TimingResult {
        TimingResult {
            operation,
            strategy: strategy.to_string(),
            total_elapsed_millis: self.total_millis(),
            trial_count,
            trial_millis: self.trial_millis,
        }
    }
}

/// Outcome of one (strategy, operation) phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingResult {
    pub operation: OperationKind,
    pub strategy: String,
    pub total_elapsed_millis: u64,
    pub trial_count: u32,
    pub trial_millis: Vec<u64>,
}

impl TimingResult {
    /// Integer average over the fixed trial count.
    pub fn average_millis(&self) -> u64 {
        if self.trial_count == 0 {
            return 0;
        }
        self.total_elapsed_millis / self.trial_count as u64
    }

    pub fn min_millis(&self) -> Option<u64> {
        self.trial_millis.iter().min().copied()
    }

    pub fn max_millis(&self) -> Option<u64> {
        self.trial_millis.iter().max().copied()
    }

    /// Throughput over the whole phase, given the commands issued per trial.
    pub fn ops_per_sec(&self, ops_per_trial: usize) -> Option<f64> {
        if self.total_elapsed_millis == 0 {
            return None;
        }
        let ops = ops_per_trial as f64 * self.trial_millis.len() as f64;
        Some(ops / (self.total_elapsed_millis as f64 / 1_000.0))
    }
}

impl fmt::Display for TimingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} process] Average time for {} = {} ms",
            self.strategy,
            self.operation,
            self.average_millis()
        )
    }
}
