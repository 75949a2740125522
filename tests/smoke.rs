//! Smoke tests for the public API surface

use std::sync::Arc;
use std::time::Duration;

use traceforge::{
    Category, Config, GenerationOrchestrator, GenerationProvider, MemoryStore, SessionStatus,
    Store, Timing, filter_test_cases, rows_for, seed_requirements, seed_test_cases, summarize,
};

#[test]
fn config_defaults_are_usable() {
    let config = Config::load(None).unwrap();
    assert_eq!(config.engine.progress_step, 5);
    let _timing = Timing::from_config(&config.engine);
}

#[test]
fn seed_data_summarizes() {
    let rows = rows_for(&seed_requirements(), &seed_test_cases());
    let summary = summarize(&rows);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.covered, 2);
    assert_eq!(summary.percent, 100);
}

#[test]
fn explorer_flat_view_filters() {
    let visible = filter_test_cases(
        &seed_test_cases(),
        Some("REQ-001"),
        Some(Category::Positive),
        None,
    );
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "TEST-001");
}

#[tokio::test]
async fn orchestrator_is_queryable_before_any_start() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let orchestrator = GenerationOrchestrator::new(
        GenerationProvider::demo(Duration::ZERO),
        Timing::default(),
    )
    .with_store(store);

    let session = orchestrator.current_session();
    assert_eq!(session.status, SessionStatus::Idle);
    assert_eq!(session.progress_percent, 0);
    assert!(session.log_lines.is_empty());
    assert!(session.result_test_cases.is_empty());
}
