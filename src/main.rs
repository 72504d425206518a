//! Sequential vs pipelined vs parallel SET/GET benchmark against Redis.
//!
//! Run:   `cargo run --release -- -n 10000`
//! CSV:   `cargo run --release -- --csv`
//! Other: `REDIS_URL=redis://host:6379/2 cargo run --release`

use std::io;
use std::process;

use anyhow::{Context, Result};
use redis_pipeline_bench::config::{self, Config, USAGE};
use redis_pipeline_bench::recorder::ResultRecorder;
use redis_pipeline_bench::report::Reporter;
use redis_pipeline_bench::runner::BenchmarkRunner;
use redis_pipeline_bench::store::RedisStore;
use redis_pipeline_bench::workload::WorkloadSpec;

fn main() -> Result<()> {
    config::load_dotenv()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(std::env::args().skip(1), |key| std::env::var(key).ok())?;
    if config.help {
        println!("{}", USAGE);
        process::exit(0);
    }

    log::info!(
        "records={} workers={} target={}",
        config.record_count,
        config.workers,
        redis_pipeline_bench::recorder::redact_url(&config.redis_url)
    );

    let store = RedisStore::connect(&config.redis_url)?;
    let spec = WorkloadSpec::new(config.record_count);
    let runner = BenchmarkRunner::new(&store, spec, config.workers);

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), config.format);
    let reports = runner.run(&mut reporter).context("benchmark aborted")?;

    if config.record {
        let mut recorder = ResultRecorder::new("redis-strategies");
        recorder.set_target(&config.redis_url);
        for report in &reports {
            recorder.record_strategy(report, &spec, config.workers.get());
        }
        if let Err(e) = recorder.save(&config.results_dir) {
            log::warn!("could not save results: {}", e);
        }
    }

    log::info!("benchmark complete");
    process::exit(0);
}
