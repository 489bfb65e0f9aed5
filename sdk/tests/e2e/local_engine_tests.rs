//! Backfill runs through the in-process engine with a file store

use crate::{args, Fixture};
use exportflow_sdk::cli;
use exportflow_sdk::engine::{LocalEngine, StartWorkflowOptions};
use exportflow_sdk::export::{
    status, ExportRunStore, InMemoryExportRunStore, JsonFileExportRunStore, BACKFILL_EXPORT,
};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_backfill_completes_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runs.json");
    let fixture = Fixture::new(Arc::new(JsonFileExportRunStore::open(&path).unwrap()));
    let engine = LocalEngine::new(
        Arc::clone(&fixture.workflows),
        Arc::clone(&fixture.activities),
    );

    let result = cli::dispatch(
        &fixture.workflows,
        &engine,
        BACKFILL_EXPORT,
        &args(&["--team=42", "--start=2024-01-01", "--end=2024-01-02", "--schedule=daily"]),
        StartWorkflowOptions::new(),
    )
    .await
    .expect("backfill should complete");

    let output = result.output.expect("local engine returns the output");
    assert_eq!(output["status"], status::COMPLETED);

    // A fresh handle on the same file sees the completed run
    let reopened = JsonFileExportRunStore::open(&path).unwrap();
    let runs = reopened.list().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].team_id, 42);
    assert_eq!(runs[0].schedule_id.as_deref(), Some("daily"));
    assert_eq!(runs[0].status, status::COMPLETED);
}

#[tokio::test]
async fn test_restarted_execution_reuses_run() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = Fixture::new(Arc::new(
        JsonFileExportRunStore::open(dir.path().join("runs.json")).unwrap(),
    ));
    let engine = LocalEngine::new(
        Arc::clone(&fixture.workflows),
        Arc::clone(&fixture.activities),
    );
    let execution_id = Uuid::new_v4();
    let raw = args(&["--team=7", "--start=2024-01-01", "--end=2024-01-02"]);

    // Same execution id twice, as when an engine replays a lost create
    for _ in 0..2 {
        cli::dispatch(
            &fixture.workflows,
            &engine,
            BACKFILL_EXPORT,
            &raw,
            StartWorkflowOptions::new().with_workflow_id(execution_id),
        )
        .await
        .unwrap();
    }

    let runs = fixture.store.list().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, status::COMPLETED);
}

#[tokio::test]
async fn test_cancelled_engine_creates_nothing() {
    let fixture = Fixture::new(Arc::new(InMemoryExportRunStore::new()));
    let engine = LocalEngine::new(
        Arc::clone(&fixture.workflows),
        Arc::clone(&fixture.activities),
    );
    engine.cancellation_handle().request_cancellation();

    let err = cli::dispatch(
        &fixture.workflows,
        &engine,
        BACKFILL_EXPORT,
        &args(&["--team=1", "--start=2024-01-01", "--end=2024-01-02"]),
        StartWorkflowOptions::new(),
    )
    .await
    .unwrap_err();

    assert!(err.is_cancellation());
    assert!(fixture.store.list().unwrap().is_empty());
}
