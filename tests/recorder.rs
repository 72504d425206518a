//! Result file writing.

mod common;

use common::workers;
use redis_pipeline_bench::recorder::ResultRecorder;
use redis_pipeline_bench::report::{OutputFormat, Reporter};
use redis_pipeline_bench::runner::BenchmarkRunner;
use redis_pipeline_bench::schema::BenchmarkReport;
use redis_pipeline_bench::store::MemoryStore;
use redis_pipeline_bench::workload::WorkloadSpec;

#[test]
fn saves_two_results_per_strategy() {
    let store = MemoryStore::new();
    let spec = WorkloadSpec::new(20);
    let runner = BenchmarkRunner::new(&store, spec, workers(3));
    let mut reporter = Reporter::new(Vec::new(), OutputFormat::Text);
    let reports = runner.run(&mut reporter).unwrap();

    let mut recorder = ResultRecorder::new("redis-strategies");
    recorder.set_target("redis://user:pw@localhost:6379/");
    for report in &reports {
        recorder.record_strategy(report, &spec, 3);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = recorder.save(&dir.path().join("results")).unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("redis-strategies-"));

    let saved: BenchmarkReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.schema_version, 1);
    assert_eq!(saved.metadata.target.as_deref(), Some("redis://localhost:6379/"));

    let names: Vec<&str> = saved.results.iter().map(|r| r.benchmark.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "redis/sequential/set",
            "redis/sequential/get",
            "redis/batched/set",
            "redis/batched/get",
            "redis/parallel/set",
            "redis/parallel/get",
        ]
    );

    for (result, report) in saved.results.chunks(2).zip(&reports) {
        assert_eq!(result[0].metrics.avg_ms, Some(report.set.average_millis()));
        assert_eq!(result[1].metrics.avg_ms, Some(report.get.average_millis()));
        assert_eq!(result[0].metrics.trials, Some(3));
        assert_eq!(result[0].parameters["record_count"], serde_json::json!(20));
    }
    assert_eq!(saved.results[4].parameters["workers"], serde_json::json!(3));
    assert!(!saved.results[0].parameters.contains_key("workers"));
}
