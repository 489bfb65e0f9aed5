//! Export run activity properties, checked against both store backends

#![cfg(feature = "testing")]

use exportflow_sdk::error::ExportflowError;
use exportflow_sdk::export::{
    create_export_run, status, update_export_run_status, CreateExportRunInputs,
    ExportRunStore, InMemoryExportRunStore, JsonFileExportRunStore,
    UpdateExportRunStatusInputs,
};
use std::sync::Arc;
use tempfile::TempDir;

fn stores() -> Vec<(&'static str, Arc<dyn ExportRunStore>, Option<TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let memory: Arc<dyn ExportRunStore> = Arc::new(InMemoryExportRunStore::new());
    let file: Arc<dyn ExportRunStore> =
        Arc::new(JsonFileExportRunStore::open(dir.path().join("runs.json")).unwrap());
    vec![("memory", memory, None), ("file", file, Some(dir))]
}

fn team_42() -> CreateExportRunInputs {
    CreateExportRunInputs {
        team_id: 42,
        schedule_id: None,
        data_interval_start: "2024-01-01T00:00:00Z".to_string(),
        data_interval_end: "2024-01-02T00:00:00Z".to_string(),
        idempotency_key: None,
    }
}

#[tokio::test]
async fn test_created_run_exists() {
    for (backend, store, _dir) in stores() {
        let run_id = create_export_run(store.clone(), team_42()).await.unwrap();

        assert!(!run_id.is_empty(), "{backend}");
        let run = store.get(&run_id).unwrap().expect(backend);
        assert_eq!(run.team_id, 42);
        assert_eq!(run.schedule_id, None);
    }
}

#[tokio::test]
async fn test_completed_status_and_repeat_is_noop() {
    for (backend, store, _dir) in stores() {
        let run_id = create_export_run(store.clone(), team_42()).await.unwrap();
        let completed = UpdateExportRunStatusInputs {
            run_id: run_id.clone(),
            status: status::COMPLETED.to_string(),
        };

        update_export_run_status(store.clone(), completed.clone())
            .await
            .unwrap();
        let first = store.get(&run_id).unwrap().unwrap();
        assert_eq!(first.status, status::COMPLETED, "{backend}");

        update_export_run_status(store.clone(), completed).await.unwrap();
        let second = store.get(&run_id).unwrap().unwrap();
        assert_eq!(first, second, "{backend}");
    }
}

#[tokio::test]
async fn test_update_nonexistent_run_is_not_found() {
    for (backend, store, _dir) in stores() {
        let err = update_export_run_status(
            store.clone(),
            UpdateExportRunStatusInputs {
                run_id: "00000000-0000-0000-0000-000000000000".to_string(),
                status: status::COMPLETED.to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ExportflowError::NotFound(_)), "{backend}");
        assert!(store.list().unwrap().is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn test_retried_create_with_key_makes_one_run() {
    for (backend, store, _dir) in stores() {
        let mut inputs = team_42();
        inputs.idempotency_key = Some("backfill-export:retry".to_string());

        let first = create_export_run(store.clone(), inputs.clone()).await.unwrap();
        let retried = create_export_run(store.clone(), inputs).await.unwrap();

        assert_eq!(first, retried, "{backend}");
        assert_eq!(store.list().unwrap().len(), 1, "{backend}");
    }
}

#[tokio::test]
async fn test_concurrent_updates_to_different_runs_are_independent() {
    let store: Arc<dyn ExportRunStore> = Arc::new(InMemoryExportRunStore::new());
    let mut run_ids = Vec::new();
    for team_id in 0..8 {
        let mut inputs = team_42();
        inputs.team_id = team_id;
        run_ids.push(create_export_run(store.clone(), inputs).await.unwrap());
    }

    let handles: Vec<_> = run_ids
        .iter()
        .map(|run_id| {
            let store = store.clone();
            let inputs = UpdateExportRunStatusInputs {
                run_id: run_id.clone(),
                status: status::RUNNING.to_string(),
            };
            tokio::spawn(update_export_run_status(store, inputs))
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for run in store.list().unwrap() {
        assert_eq!(run.status, status::RUNNING);
    }
}
