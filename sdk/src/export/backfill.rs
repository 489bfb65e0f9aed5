//! `backfill-export` workflow: record one export run for a data interval and
//! drive it through its status lifecycle.

use crate::error::{ExportflowError, Result};
use crate::export::activities::{
    CreateExportRunInputs, UpdateExportRunStatusInputs, CREATE_EXPORT_RUN,
    UPDATE_EXPORT_RUN_STATUS,
};
use crate::export::model::{parse_timestamp, status};
use crate::workflow::context::{WorkflowContext, WorkflowContextExt};
use crate::workflow::definition::Workflow;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Input of the `backfill-export` workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BackfillExportInput {
    /// Team that owns the export
    pub team_id: i64,
    /// Schedule the run belongs to, if any
    pub schedule_id: Option<String>,
    pub data_interval_start: DateTime<Utc>,
    pub data_interval_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackfillExportOutput {
    pub run_id: String,
    pub status: String,
}

/// Command-line form of [`BackfillExportInput`]
#[derive(Debug, Parser)]
#[command(name = "backfill-export", no_binary_name = true)]
struct BackfillArgs {
    /// Team that owns the export
    #[arg(long = "team", alias = "team-id")]
    team_id: i64,

    /// Start of the data interval (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp)]
    start: DateTime<Utc>,

    /// End of the data interval (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp)]
    end: DateTime<Utc>,

    /// Schedule the run belongs to
    #[arg(long = "schedule", alias = "schedule-id")]
    schedule_id: Option<String>,
}

/// Creates an export run, marks it running, then completed.
///
/// On failure the run is marked `Failed` (or `Cancelled` when the engine
/// cancelled the workflow) and the original error is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackfillExportWorkflow;

impl BackfillExportWorkflow {
    async fn set_status(ctx: &dyn WorkflowContext, run_id: &str, status: &str) -> Result<()> {
        let inputs = UpdateExportRunStatusInputs {
            run_id: run_id.to_string(),
            status: status.to_string(),
        };
        ctx.execute_activity::<_, ()>(UPDATE_EXPORT_RUN_STATUS, &inputs)
            .await
    }

    async fn drive(ctx: &dyn WorkflowContext, run_id: &str) -> Result<()> {
        Self::set_status(ctx, run_id, status::RUNNING).await?;
        ctx.check_cancellation().await?;
        Self::set_status(ctx, run_id, status::COMPLETED).await
    }
}

#[async_trait]
impl Workflow for BackfillExportWorkflow {
    type Input = BackfillExportInput;
    type Output = BackfillExportOutput;

    fn parse_inputs(inputs: &[String]) -> Result<Self::Input> {
        let args = BackfillArgs::try_parse_from(inputs)
            .map_err(|e| ExportflowError::InvalidInput(e.to_string().trim_end().to_string()))?;

        if args.end < args.start {
            return Err(ExportflowError::InvalidInput(format!(
                "--end ({}) is before --start ({})",
                args.end.to_rfc3339(),
                args.start.to_rfc3339()
            )));
        }

        Ok(BackfillExportInput {
            team_id: args.team_id,
            schedule_id: args.schedule_id,
            data_interval_start: args.start,
            data_interval_end: args.end,
        })
    }

    async fn execute(
        &self,
        ctx: &dyn WorkflowContext,
        input: Self::Input,
    ) -> Result<Self::Output> {
        let create = CreateExportRunInputs {
            team_id: input.team_id,
            schedule_id: input.schedule_id,
            data_interval_start: input
                .data_interval_start
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            data_interval_end: input
                .data_interval_end
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            idempotency_key: Some(format!(
                "{}:{}",
                ctx.workflow_name(),
                ctx.workflow_execution_id()
            )),
        };
        let run_id: String = ctx.execute_activity(CREATE_EXPORT_RUN, &create).await?;
        info!(run_id = %run_id, team_id = input.team_id, "Export run created");

        match Self::drive(ctx, &run_id).await {
            Ok(()) => Ok(BackfillExportOutput {
                run_id,
                status: status::COMPLETED.to_string(),
            }),
            Err(e) => {
                let final_status = if e.is_cancellation() {
                    status::CANCELLED
                } else {
                    status::FAILED
                };
                if let Err(update_err) = Self::set_status(ctx, &run_id, final_status).await {
                    warn!(
                        run_id = %run_id,
                        status = final_status,
                        error = %update_err,
                        "Could not record final export run status"
                    );
                }
                Err(e)
            }
        }
    }

    fn description(&self) -> Option<&str> {
        Some("Record an export run for a data interval")
    }

    fn tags(&self) -> Vec<String> {
        vec!["export".to_string()]
    }
}
