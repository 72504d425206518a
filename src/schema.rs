//! Result file types.
//!
//! Every run can be written to a JSON file with these types so two runs (for
//! example against different Redis versions or hosts) can be compared with
//! `bench-compare`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level benchmark report written to a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    pub metadata: RunMetadata,
    pub results: Vec<BenchmarkResult>,
}

/// Metadata captured at the start of a benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// ISO 8601 timestamp of the run start.
    pub timestamp: String,
    /// Short git commit hash (absent outside a git checkout).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    /// Whether the working tree had uncommitted changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty: Option<bool>,
    /// Version of this crate.
    pub tool_version: String,
    /// Store the run was pointed at, with credentials stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub hardware: HardwareInfo,
}

/// Hardware information for reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub cpu: String,
    /// Number of logical cores.
    pub cores: usize,
    pub ram_gb: u64,
    pub os: String,
    pub arch: String,
}

/// One (strategy, operation) measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name (e.g. "redis/batched/set").
    pub benchmark: String,
    pub category: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
    pub metrics: BenchmarkMetrics,
}

/// Metrics of one measurement. Fields that don't apply are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_per_sec: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_metrics_are_omitted() {
        let m = BenchmarkMetrics {
            avg_ms: Some(12),
            trials: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, serde_json::json!({ "avg_ms": 12, "trials": 3 }));
    }

    #[test]
    fn parameters_default_when_missing() {
        let json = r#"{
            "benchmark": "redis/sequential/get",
            "category": "redis-strategies",
            "metrics": {"avg_ms": 4}
        }"#;
        let r: BenchmarkResult = serde_json::from_str(json).unwrap();
        assert!(r.parameters.is_empty());
        assert_eq!(r.metrics.avg_ms, Some(4));
    }
}
