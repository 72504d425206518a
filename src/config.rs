//! Run configuration.
//!
//! Built-in defaults, overridden by the environment (a `.env` file is loaded
//! into it by the binary), overridden by command-line flags.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::report::OutputFormat;
use crate::store::remote::DEFAULT_REDIS_URL;
use crate::strategy::default_workers;

pub const DEFAULT_RECORD_COUNT: usize = 10_000;
pub const DEFAULT_RESULTS_DIR: &str = "results";

pub const USAGE: &str = "\
Usage: redis-pipeline-bench [options]

Options:
  -n, --records <N>      records written per trial (env RECORD_COUNT, default 10000)
      --url <URL>        Redis URL (env REDIS_URL, default redis://127.0.0.1:6379/)
  -w, --workers <N>      parallel strategy workers (env BENCH_WORKERS, default: CPU count)
      --csv              print CSV rows instead of text lines
      --no-record        do not write a JSON result file
      --results-dir <D>  directory for JSON result files (default results)
  -h, --help             print this help";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub redis_url: String,
    pub record_count: usize,
    pub workers: NonZeroUsize,
    pub format: OutputFormat,
    pub record: bool,
    pub results_dir: PathBuf,
    pub help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            record_count: DEFAULT_RECORD_COUNT,
            workers: default_workers(),
            format: OutputFormat::Text,
            record: true,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            help: false,
        }
    }
}

impl Config {
    /// Resolve the configuration from `args` (without the program name) and
    /// an environment lookup.
    pub fn load<I, E>(args: I, env: E) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(url) = env("REDIS_URL") {
            config.redis_url = url;
        }

        // Flags win over the environment, so an environment value is only
        // validated when no flag replaces it.
        let mut records: Option<(String, String)> = None;
        let mut workers: Option<(String, String)> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-n" | "--records" => {
                    let v = value_of(&arg, args.next())?;
                    records = Some((arg.clone(), v));
                }
                "--url" => config.redis_url = value_of(&arg, args.next())?,
                "-w" | "--workers" => {
                    let v = value_of(&arg, args.next())?;
                    workers = Some((arg.clone(), v));
                }
                "--csv" => config.format = OutputFormat::Csv,
                "--no-record" => config.record = false,
                "--results-dir" => {
                    config.results_dir = PathBuf::from(value_of(&arg, args.next())?);
                }
                "-h" | "--help" => config.help = true,
                other => bail!("unknown argument '{}'\n\n{}", other, USAGE),
            }
        }

        if let Some((source, raw)) = records.or_else(|| from_env(&env, "RECORD_COUNT")) {
            config.record_count = positive(&raw).context(source)?;
        }
        if let Some((source, raw)) = workers.or_else(|| from_env(&env, "BENCH_WORKERS")) {
            config.workers = non_zero(&raw).context(source)?;
        }

        Ok(config)
    }
}

/// Load `.env` from the working directory (or a parent) into the process
/// environment. A missing file is fine; a malformed one is an error.
pub fn load_dotenv() -> Result<()> {
    checked_dotenv(dotenvy::dotenv().map(drop))
}

pub fn load_dotenv_from(path: &Path) -> Result<()> {
    checked_dotenv(dotenvy::from_path(path))
        .with_context(|| format!("reading {}", path.display()))
}

fn checked_dotenv(loaded: dotenvy::Result<()>) -> Result<()> {
    match loaded {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load .env file"),
    }
}

/// `(source, raw value)` of an environment variable.
fn from_env(env: impl Fn(&str) -> Option<String>, key: &str) -> Option<(String, String)> {
    env(key).map(|raw| (key.to_string(), raw))
}

fn value_of(flag: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => bail!("{} requires a value", flag),
    }
}

fn positive(raw: &str) -> Result<usize> {
    Ok(non_zero(raw)?.get())
}

fn non_zero(raw: &str) -> Result<NonZeroUsize> {
    let n: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a positive integer", raw))?;
    match NonZeroUsize::new(n) {
        Some(n) => Ok(n),
        None => bail!("'{}' is not a positive integer", raw),
    }
}
