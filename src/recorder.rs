//! Saves run results to JSON files following [`crate::schema`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use crate::runner::StrategyReport;
use crate::schema::*;
use crate::timing::TimingResult;
use crate::workload::WorkloadSpec;

/// Accumulates benchmark results and writes them to a JSON file.
pub struct ResultRecorder {
    category: String,
    metadata: RunMetadata,
    results: Vec<BenchmarkResult>,
}

impl ResultRecorder {
    /// Create a recorder for `category`. Hardware, git and timestamp metadata
    /// are captured here, not at save time.
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            metadata: RunMetadata {
                timestamp: iso8601_now(),
                git_commit: git(&["rev-parse", "--short", "HEAD"]),
                git_branch: git(&["rev-parse", "--abbrev-ref", "HEAD"]),
                git_dirty: git(&["status", "--porcelain"]).map(|out| !out.is_empty()),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                target: None,
                hardware: capture_hardware(),
            },
            results: Vec::new(),
        }
    }

    /// Remember which store the run targeted. Userinfo is stripped.
    pub fn set_target(&mut self, url: &str) {
        self.metadata.target = Some(redact_url(url));
    }

    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    pub fn record(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Record the SET and GET phases of one strategy.
    pub fn record_strategy(
        &mut self,
        report: &StrategyReport,
        spec: &WorkloadSpec,
        workers: usize,
    ) {
        let set = self.phase_result(&report.set, spec, workers, spec.record_count);
        let get = self.phase_result(&report.get, spec, workers, report.keys_read);
        self.results.push(set);
        self.results.push(get);
    }

    fn phase_result(
        &self,
        timing: &TimingResult,
        spec: &WorkloadSpec,
        workers: usize,
        ops_per_trial: usize,
    ) -> BenchmarkResult {
        let mut params = HashMap::new();
        params.insert("strategy".into(), serde_json::json!(timing.strategy));
        params.insert("operation".into(), serde_json::json!(timing.operation.label()));
        params.insert("record_count".into(), serde_json::json!(spec.record_count));
        params.insert("trial_count".into(), serde_json::json!(spec.trial_count));
        if timing.strategy == "parallel" {
            params.insert("workers".into(), serde_json::json!(workers));
        }

        BenchmarkResult {
            benchmark: format!("redis/{}/{}", timing.strategy, timing.operation),
            category: self.category.clone(),
            parameters: params,
            metrics: BenchmarkMetrics {
                avg_ms: Some(timing.average_millis()),
                total_ms: Some(timing.total_elapsed_millis),
                min_ms: timing.min_millis(),
                max_ms: timing.max_millis(),
                trials: Some(timing.trial_count),
                ops_per_sec: timing.ops_per_sec(ops_per_trial),
            },
        }
    }

    /// Write all accumulated results into `dir`, creating it if needed.
    ///
    /// File naming: `<category>-<timestamp>-<commit>.json`
    pub fn save(self, dir: &Path) -> io::Result<PathBuf> {
        let commit = self
            .metadata
            .git_commit
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let ts = self.metadata.timestamp.replace(':', "-");
        let filename = format!("{}-{}-{}.json", self.category, ts, commit);

        let report = BenchmarkReport {
            schema_version: 1,
            metadata: self.metadata,
            results: self.results,
        };

        std::fs::create_dir_all(dir)?;
        let path = dir.join(filename);
        let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        std::fs::write(&path, json)?;

        log::info!("results saved to {}", path.display());
        Ok(path)
    }
}

/// Drop the `user:password@` part of a URL.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}://{}", scheme, &rest[at + 1..]),
        None => url.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Metadata capture helpers
// ---------------------------------------------------------------------------

fn iso8601_now() -> String {
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_utc(secs)
}

fn format_utc(secs: u64) -> String {
    let (year, month, day) = civil_from_days(secs / 86_400);
    let tod = secs % 86_400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        tod / 3600,
        (tod % 3600) / 60,
        tod % 60
    )
}

// Howard Hinnant's days-to-civil algorithm.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn capture_hardware() -> HardwareInfo {
    HardwareInfo {
        cpu: read_cpu_model(),
        cores: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(0),
        ram_gb: read_total_ram_gb(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
    }
}

fn read_cpu_model() -> String {
    std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|l| l.starts_with("model name"))
                .and_then(|l| l.split_once(':'))
                .map(|(_, model)| model.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn read_total_ram_gb() -> u64 {
    std::fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|info| {
            info.lines()
                .find(|l| l.starts_with("MemTotal:"))
                .and_then(|l| l.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok())
        })
        .map(|kb| kb / (1024 * 1024))
        .unwrap_or(0)
}
