//! Benchmark driver.
//!
//! For every strategy, in order: flush the store, time `trial_count` SET
//! trials, then time `trial_count` GET trials over the keys the SET phase
//! left behind. The key set is listed before each GET trial, outside the
//! timed window.

use std::io::Write;
use std::num::NonZeroUsize;

use anyhow::{Context, Result};

use crate::phase::Phase;
use crate::report::Reporter;
use crate::store::StoreClient;
use crate::strategy::{all_strategies, Strategy};
use crate::timing::{OperationKind, TimingResult, TrialClock};
use crate::workload::WorkloadSpec;

/// SET and GET averages of one strategy.
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub strategy: String,
    pub set: TimingResult,
    pub get: TimingResult,
    /// Keys listed before the last GET trial.
    pub keys_read: usize,
}

pub struct BenchmarkRunner<'a> {
    store: &'a dyn StoreClient,
    spec: WorkloadSpec,
    strategies: Vec<Box<dyn Strategy>>,
}

impl<'a> BenchmarkRunner<'a> {
    /// Runner over the three standard strategies.
    pub fn new(store: &'a dyn StoreClient, spec: WorkloadSpec, workers: NonZeroUsize) -> Self {
        Self::with_strategies(store, spec, all_strategies(workers))
    }

    pub fn with_strategies(
        store: &'a dyn StoreClient,
        spec: WorkloadSpec,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Self {
        Self {
            store,
            spec,
            strategies,
        }
    }

    pub fn spec(&self) -> &WorkloadSpec {
        &self.spec
    }

    /// Run every strategy and report its averages as soon as it finishes.
    pub fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> Result<Vec<StrategyReport>> {
        reporter.banner(self.spec.record_count)?;

        let mut reports = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            log::info!(
                "running {} strategy ({} records, {} trials)",
                strategy.name(),
                self.spec.record_count,
                self.spec.trial_count
            );
            let report = self.run_strategy(strategy.as_ref(), reporter)?;
            reports.push(report);
        }
        Ok(reports)
    }

    fn run_strategy<W: Write>(
        &self,
        strategy: &dyn Strategy,
        reporter: &mut Reporter<W>,
    ) -> Result<StrategyReport> {
        let name = strategy.name();
        let mut phase = Phase::default();

        self.store
            .flush_all()
            .with_context(|| format!("{}: flush before SET phase", name))?;
        phase.advance(Phase::Flushed)?;

        phase.advance(Phase::SetTiming)?;
        let mut clock = TrialClock::new();
        for trial in 1..=self.spec.trial_count {
            clock
                .measure(|| strategy.set_trial(self.store, &self.spec))
                .with_context(|| format!("{}: SET trial {}", name, trial))?;
            log::debug!(
                "{} SET trial {}: {} ms",
                name,
                trial,
                clock.last_millis().unwrap_or(0)
            );
        }
        let set = clock.finish(OperationKind::Set, name, self.spec.trial_count);
        phase.advance(Phase::SetDone)?;

        phase.advance(Phase::GetTiming)?;
        let mut clock = TrialClock::new();
        let mut keys_read = 0;
        for trial in 1..=self.spec.trial_count {
            let keys = self
                .store
                .list_keys("*")
                .with_context(|| {
                    format!("{}: listing keys before GET trial {}", name, trial)
                })?;
            keys_read = keys.len();
            clock
                .measure(|| strategy.get_trial(self.store, &keys))
                .with_context(|| format!("{}: GET trial {}", name, trial))?;
            log::debug!(
                "{} GET trial {}: {} keys in {} ms",
                name,
                trial,
                keys.len(),
                clock.last_millis().unwrap_or(0)
            );
        }
        let get = clock.finish(OperationKind::Get, name, self.spec.trial_count);
        phase.advance(Phase::GetDone)?;

        reporter.timing(&set)?;
        reporter.timing(&get)?;
        phase.advance(Phase::Reported)?;

        Ok(StrategyReport {
            strategy: name.to_string(),
            set,
            get,
            keys_read,
        })
    }
}
