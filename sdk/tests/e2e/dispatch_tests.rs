//! CLI dispatch against a recording engine
//!
//! Verifies the management command path: name resolution, argument parsing
//! by the matched workflow, and a single submission to the engine.

use crate::{args, Fixture};
use exportflow_sdk::cli::{self, EXIT_FAILURE, EXIT_INVALID_INPUT};
use exportflow_sdk::engine::StartWorkflowOptions;
use exportflow_sdk::error::ExportflowError;
use exportflow_sdk::export::{
    BackfillExportInput, ExportRunStore, InMemoryExportRunStore, BACKFILL_EXPORT,
};
use exportflow_sdk::testing::RecordingEngine;
use std::sync::Arc;

/// Test the backfill invocation end to end.
///
/// `backfill-export --team=42 --start=2024-01-01 --end=2024-01-02` must
/// resolve, parse into `team_id = 42` and reach the engine exactly once.
#[tokio::test]
async fn test_backfill_dispatch_submits_once() {
    let fixture = Fixture::new(Arc::new(InMemoryExportRunStore::new()));
    let engine = RecordingEngine::new();

    cli::dispatch(
        &fixture.workflows,
        &engine,
        BACKFILL_EXPORT,
        &args(&["--team=42", "--start=2024-01-01", "--end=2024-01-02"]),
        StartWorkflowOptions::new(),
    )
    .await
    .expect("dispatch should succeed");

    assert_eq!(engine.submission_count(), 1);
    let submission = engine.last_submission().unwrap();
    assert_eq!(submission.name, BACKFILL_EXPORT);
    assert_eq!(submission.options.queue, "default");

    let input: BackfillExportInput = serde_json::from_value(submission.input).unwrap();
    assert_eq!(input.team_id, 42);
    assert_eq!(input.schedule_id, None);
    assert_eq!(input.data_interval_start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert_eq!(input.data_interval_end.to_rfc3339(), "2024-01-02T00:00:00+00:00");

    // Dispatch only submits; nothing touched the store
    assert!(fixture.store.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_workflow_is_not_submitted() {
    let fixture = Fixture::new(Arc::new(InMemoryExportRunStore::new()));
    let engine = RecordingEngine::new();

    let err = cli::dispatch(
        &fixture.workflows,
        &engine,
        "backfil-export",
        &args(&["--team=42"]),
        StartWorkflowOptions::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExportflowError::WorkflowNotFound(_)));
    assert!(err.to_string().contains(BACKFILL_EXPORT));
    assert_eq!(cli::exit_code(&err), EXIT_FAILURE);
    assert_eq!(engine.submission_count(), 0);
}

#[tokio::test]
async fn test_parse_failure_is_not_submitted() {
    let fixture = Fixture::new(Arc::new(InMemoryExportRunStore::new()));
    let engine = RecordingEngine::new();

    let err = cli::dispatch(
        &fixture.workflows,
        &engine,
        BACKFILL_EXPORT,
        &args(&["--team=42", "--start=2024-01-01"]),
        StartWorkflowOptions::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExportflowError::InvalidInput(_)));
    assert_eq!(cli::exit_code(&err), EXIT_INVALID_INPUT);
    assert_eq!(engine.submission_count(), 0);
}
