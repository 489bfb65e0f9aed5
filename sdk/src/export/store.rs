//! Persistence collaborator for export runs.
//!
//! The store API is synchronous. Activities reach it through
//! [`run_blocking`](crate::activity::blocking::run_blocking).

use crate::error::{ExportflowError, Result};
use crate::export::model::{ExportRun, NewExportRun};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Synchronous store for export run records.
///
/// Records are never deleted through this interface. Concurrent status
/// updates to the same run are last-write-wins.
pub trait ExportRunStore: Send + Sync {
    /// Create a run and return the stored record.
    ///
    /// If `run.idempotency_key` matches an existing record, that record is
    /// returned unchanged and nothing is created.
    fn create(&self, run: NewExportRun) -> Result<ExportRun>;

    /// Set the status of an existing run.
    ///
    /// Fails with `NotFound` if no such run exists. Setting the status a run
    /// already has leaves the record untouched.
    fn update_status(&self, run_id: &str, status: &str) -> Result<()>;

    fn get(&self, run_id: &str) -> Result<Option<ExportRun>>;

    /// All runs in creation order
    fn list(&self) -> Result<Vec<ExportRun>>;
}

/// Run records plus the mutation rules shared by every store
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct RunTable {
    runs: Vec<ExportRun>,
}

impl RunTable {
    pub(crate) fn create(&mut self, run: NewExportRun, now: DateTime<Utc>) -> ExportRun {
        if let Some(key) = run.idempotency_key.as_deref() {
            if let Some(existing) = self
                .runs
                .iter()
                .find(|r| r.idempotency_key.as_deref() == Some(key))
            {
                return existing.clone();
            }
        }

        let run = run.into_run(now);
        self.runs.push(run.clone());
        run
    }

    /// Returns whether the record changed
    pub(crate) fn update_status(
        &mut self,
        run_id: &str,
        status: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let run = self
            .runs
            .iter_mut()
            .find(|r| r.id == run_id)
            .ok_or_else(|| ExportflowError::NotFound(format!("export run {}", run_id)))?;

        if run.status == status {
            return Ok(false);
        }
        run.status = status.to_string();
        run.updated_at = now;
        Ok(true)
    }

    pub(crate) fn get(&self, run_id: &str) -> Option<ExportRun> {
        self.runs.iter().find(|r| r.id == run_id).cloned()
    }

    pub(crate) fn runs(&self) -> &[ExportRun] {
        &self.runs
    }
}

/// In-memory store for tests and single-process use
#[derive(Debug, Default)]
pub struct InMemoryExportRunStore {
    table: RwLock<RunTable>,
}

impl InMemoryExportRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.table.read().runs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().runs().is_empty()
    }
}

impl ExportRunStore for InMemoryExportRunStore {
    fn create(&self, run: NewExportRun) -> Result<ExportRun> {
        Ok(self.table.write().create(run, Utc::now()))
    }

    fn update_status(&self, run_id: &str, status: &str) -> Result<()> {
        self.table
            .write()
            .update_status(run_id, status, Utc::now())
            .map(|_| ())
    }

    fn get(&self, run_id: &str) -> Result<Option<ExportRun>> {
        Ok(self.table.read().get(run_id))
    }

    fn list(&self) -> Result<Vec<ExportRun>> {
        Ok(self.table.read().runs().to_vec())
    }
}
