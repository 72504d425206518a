//! Benchmark comparison tool.
//!
//! Compares two JSON result files and prints the average-time delta of every
//! benchmark present in both.
//!
//! Usage: `cargo run --bin bench-compare -- <baseline.json> <candidate.json>`

use redis_pipeline_bench::schema::{BenchmarkMetrics, BenchmarkReport, BenchmarkResult};
use std::collections::HashMap;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <baseline.json> <candidate.json>", args[0]);
        std::process::exit(1);
    }

    let baseline = load_report(&args[1]);
    let candidate = load_report(&args[2]);

    let base_map: HashMap<&str, &BenchmarkResult> = baseline
        .results
        .iter()
        .map(|r| (r.benchmark.as_str(), r))
        .collect();

    eprintln!("Baseline: {} ({})", args[1], baseline.metadata.timestamp);
    eprintln!("Candidate: {} ({})", args[2], candidate.metadata.timestamp);
    eprintln!();

    println!(
        "{:<28} | {:>10} | {:>10} | {:>16}",
        "Benchmark", "Base avg", "New avg", "Delta"
    );
    println!("{}", "-".repeat(72));

    let mut matched = 0u32;
    let mut only_cand = 0u32;

    for cand in &candidate.results {
        match base_map.get(cand.benchmark.as_str()) {
            Some(base) => {
                matched += 1;
                print_comparison(&cand.benchmark, &base.metrics, &cand.metrics);
            }
            None => only_cand += 1,
        }
    }

    let only_base = baseline
        .results
        .iter()
        .filter(|b| !candidate.results.iter().any(|c| c.benchmark == b.benchmark))
        .count();

    println!("{}", "-".repeat(72));
    println!(
        "Compared: {} | Baseline only: {} | Candidate only: {}",
        matched, only_base, only_cand
    );
}

fn load_report(path: &str) -> BenchmarkReport {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", path, e);
        std::process::exit(1);
    })
}

fn print_comparison(name: &str, base: &BenchmarkMetrics, cand: &BenchmarkMetrics) {
    let (Some(base_avg), Some(cand_avg)) = (base.avg_ms, cand.avg_ms) else {
        println!("{:<28} | {:>10} | {:>10} | {:>16}", name, "-", "-", "n/a");
        return;
    };

    let delta_pct = if base_avg > 0 {
        ((cand_avg as f64 - base_avg as f64) / base_avg as f64) * 100.0
    } else {
        0.0
    };

    // Lower average time is better.
    let hint = if delta_pct < -1.0 {
        "faster"
    } else if delta_pct > 1.0 {
        "slower"
    } else {
        "~same"
    };

    println!(
        "{:<28} | {:>7} ms | {:>7} ms | {:>+7.1}% ({})",
        name, base_avg, cand_avg, delta_pct, hint,
    );
}
