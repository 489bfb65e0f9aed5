//! Scheduled export runs: the run record, its stores, the activities that
//! create and update it, and the workflows built on them.

pub mod activities;
pub mod backfill;
pub mod file_store;
pub mod model;
pub mod store;

pub use activities::{
    create_export_run, update_export_run_status, CreateExportRunActivity,
    CreateExportRunInputs, UpdateExportRunStatusActivity, UpdateExportRunStatusInputs,
    CREATE_EXPORT_RUN, UPDATE_EXPORT_RUN_STATUS,
};
pub use backfill::{BackfillExportInput, BackfillExportOutput, BackfillExportWorkflow};
pub use file_store::JsonFileExportRunStore;
pub use model::{status, ExportRun, NewExportRun};
pub use store::{ExportRunStore, InMemoryExportRunStore};

use crate::activity::registry::ActivityRegistry;
use crate::error::Result;
use crate::worker::registry::WorkflowRegistry;
use std::sync::Arc;

/// Name the backfill workflow is registered under
pub const BACKFILL_EXPORT: &str = "backfill-export";

/// Register the export workflows and activities against `store`.
pub fn register_all(
    workflows: &WorkflowRegistry,
    activities: &ActivityRegistry,
    store: Arc<dyn ExportRunStore>,
) -> Result<()> {
    activities.register(CreateExportRunActivity::new(Arc::clone(&store)))?;
    activities.register(UpdateExportRunStatusActivity::new(store))?;
    workflows.register(BACKFILL_EXPORT, BackfillExportWorkflow)?;
    Ok(())
}
