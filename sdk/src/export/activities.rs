//! Export run activities.
//!
//! Both activities persist through the synchronous [`ExportRunStore`], so the
//! store call is moved onto the blocking pool with [`run_blocking`].

use crate::activity::blocking::run_blocking;
use crate::activity::context::ActivityContext;
use crate::activity::definition::{Activity, RetryPolicy};
use crate::error::{ExportflowError, Result};
use crate::export::model::{parse_timestamp, NewExportRun};
use crate::export::store::ExportRunStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Activity kind for [`create_export_run`]
pub const CREATE_EXPORT_RUN: &str = "create-export-run";
/// Activity kind for [`update_export_run_status`]
pub const UPDATE_EXPORT_RUN_STATUS: &str = "update-export-run-status";

const DEFAULT_TIMEOUT_SECONDS: u32 = 60;

/// Inputs to create an export run.
///
/// Interval bounds travel as strings so the payload stays plain JSON; they are
/// parsed (RFC 3339 or `YYYY-MM-DD`) when the activity runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExportRunInputs {
    pub team_id: i64,
    pub schedule_id: Option<String>,
    pub data_interval_start: String,
    pub data_interval_end: String,
    /// When set, a retried create returns the run made by the first attempt
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Inputs to update the status of an export run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExportRunStatusInputs {
    pub run_id: String,
    pub status: String,
}

/// Create an export run and return its id.
///
/// Input validation happens before the store is touched, so an invalid
/// interval creates nothing.
pub async fn create_export_run(
    store: Arc<dyn ExportRunStore>,
    inputs: CreateExportRunInputs,
) -> Result<String> {
    let start = parse_timestamp(&inputs.data_interval_start)?;
    let end = parse_timestamp(&inputs.data_interval_end)?;

    let mut new_run = NewExportRun::new(inputs.team_id, start, end)?;
    if let Some(schedule_id) = inputs.schedule_id {
        new_run = new_run.with_schedule_id(schedule_id);
    }
    if let Some(key) = inputs.idempotency_key {
        new_run = new_run.with_idempotency_key(key);
    }

    info!(
        team_id = new_run.team_id,
        schedule_id = ?new_run.schedule_id,
        data_interval_start = %start.to_rfc3339(),
        data_interval_end = %end.to_rfc3339(),
        "Creating export run"
    );

    let run = run_blocking(move || store.create(new_run)).await?;
    debug!(run_id = %run.id, status = %run.status, "Export run stored");
    Ok(run.id)
}

/// Set the status of an existing export run.
///
/// Repeating the status the run already has is a no-op. An unknown run id
/// fails with `NotFound` and creates nothing.
pub async fn update_export_run_status(
    store: Arc<dyn ExportRunStore>,
    inputs: UpdateExportRunStatusInputs,
) -> Result<()> {
    if inputs.status.trim().is_empty() {
        return Err(ExportflowError::InvalidInput(
            "export run status must not be empty".to_string(),
        ));
    }

    info!(run_id = %inputs.run_id, status = %inputs.status, "Updating export run status");

    run_blocking(move || store.update_status(&inputs.run_id, &inputs.status)).await
}

/// [`create_export_run`] as a registrable activity
pub struct CreateExportRunActivity {
    store: Arc<dyn ExportRunStore>,
}

impl CreateExportRunActivity {
    pub fn new(store: Arc<dyn ExportRunStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Activity for CreateExportRunActivity {
    type Input = CreateExportRunInputs;
    type Output = String;

    fn kind(&self) -> &str {
        CREATE_EXPORT_RUN
    }

    async fn execute(&self, input: Self::Input, ctx: &dyn ActivityContext) -> Result<String> {
        ctx.check_cancellation().await?;
        if ctx.attempt() > 1 && input.idempotency_key.is_none() {
            debug!(
                attempt = ctx.attempt(),
                "Retrying create without an idempotency key, a duplicate run may be created"
            );
        }
        create_export_run(Arc::clone(&self.store), input).await
    }

    fn description(&self) -> Option<&str> {
        Some("Create an export run record")
    }

    fn timeout_seconds(&self) -> Option<u32> {
        Some(DEFAULT_TIMEOUT_SECONDS)
    }
}

/// [`update_export_run_status`] as a registrable activity
///
/// Does not check for cancellation: a cancelled workflow still records its
/// final status through this activity.
pub struct UpdateExportRunStatusActivity {
    store: Arc<dyn ExportRunStore>,
}

impl UpdateExportRunStatusActivity {
    pub fn new(store: Arc<dyn ExportRunStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Activity for UpdateExportRunStatusActivity {
    type Input = UpdateExportRunStatusInputs;
    type Output = ();

    fn kind(&self) -> &str {
        UPDATE_EXPORT_RUN_STATUS
    }

    async fn execute(&self, input: Self::Input, _ctx: &dyn ActivityContext) -> Result<()> {
        update_export_run_status(Arc::clone(&self.store), input).await
    }

    fn description(&self) -> Option<&str> {
        Some("Set the status of an export run")
    }

    fn timeout_seconds(&self) -> Option<u32> {
        Some(DEFAULT_TIMEOUT_SECONDS)
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            maximum_interval: Duration::from_secs(30),
            ..RetryPolicy::default()
        }
    }
}
