//! Benchmark harness comparing three ways of issuing SET/GET traffic against a
//! key/value store: one call at a time, pipelined batches, and a bounded pool
//! of parallel workers.
//!
//! The [`runner::BenchmarkRunner`] owns the timing protocol. Strategies only
//! decide how a single trial dispatches its commands.

pub mod config;
pub mod phase;
pub mod recorder;
pub mod report;
pub mod runner;
pub mod schema;
pub mod store;
pub mod strategy;
pub mod timing;
pub mod workload;
