//! In-process engine.
//!
//! Runs a workflow to completion inside `start_workflow`, executing each
//! activity once, in the order the workflow issues them. There is no
//! persistence of workflow state and no retry: a failed activity fails the
//! workflow.

use crate::activity::context::ActivityContext;
use crate::activity::registry::ActivityRegistry;
use crate::config::EngineConfig;
use crate::engine::{StartWorkflowOptions, StartWorkflowResult, WorkflowEngine};
use crate::error::{ExportflowError, Result};
use crate::worker::registry::WorkflowRegistry;
use crate::workflow::context::{ActivityOptions, WorkflowContext};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Shared flag that asks running workflows and activities to stop
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle(Arc<AtomicBool>);

impl CancellationHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_cancellation(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancellation_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Engine that executes workflows in the calling task
pub struct LocalEngine {
    workflows: Arc<WorkflowRegistry>,
    activities: Arc<ActivityRegistry>,
    config: EngineConfig,
    cancellation: CancellationHandle,
}

impl LocalEngine {
    pub fn new(workflows: Arc<WorkflowRegistry>, activities: Arc<ActivityRegistry>) -> Self {
        Self {
            workflows,
            activities,
            config: EngineConfig::default(),
            cancellation: CancellationHandle::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start options on the configured queue
    pub fn start_options(&self) -> StartWorkflowOptions {
        StartWorkflowOptions::new().with_queue(self.config.queue.clone())
    }

    /// Handle that cancels every workflow this engine runs
    pub fn cancellation_handle(&self) -> CancellationHandle {
        self.cancellation.clone()
    }
}

impl std::fmt::Debug for LocalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEngine")
            .field("workflows", &self.workflows.names())
            .field("activities", &self.activities.kinds())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl WorkflowEngine for LocalEngine {
    async fn start_workflow(
        &self,
        name: &str,
        input: Value,
        options: StartWorkflowOptions,
    ) -> Result<StartWorkflowResult> {
        let workflow = self.workflows.resolve(name)?;
        let execution_id = options.workflow_id.unwrap_or_else(Uuid::new_v4);

        let ctx = Arc::new(LocalWorkflowContext {
            execution_id,
            workflow_name: workflow.name().to_string(),
            activities: Arc::clone(&self.activities),
            default_activity_timeout: self.config.default_activity_timeout,
            cancellation: self.cancellation.clone(),
        });

        let span = info_span!(
            "workflow",
            workflow = %workflow.name(),
            execution_id = %execution_id,
            queue = %options.queue
        );

        async move {
            info!(labels = ?options.labels, "Workflow started");
            match workflow.execute(ctx, input).await {
                Ok(output) => {
                    info!("Workflow completed");
                    Ok(StartWorkflowResult {
                        workflow_execution_id: execution_id,
                        output: Some(output),
                    })
                }
                Err(e) => {
                    error!(error = %e, "Workflow failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

struct LocalWorkflowContext {
    execution_id: Uuid,
    workflow_name: String,
    activities: Arc<ActivityRegistry>,
    default_activity_timeout: Duration,
    cancellation: CancellationHandle,
}

#[async_trait]
impl WorkflowContext for LocalWorkflowContext {
    fn workflow_execution_id(&self) -> Uuid {
        self.execution_id
    }

    fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    async fn execute_activity_raw(
        &self,
        kind: &str,
        input: Value,
        options: ActivityOptions,
    ) -> Result<Value> {
        let activity = self
            .activities
            .get(kind)
            .ok_or_else(|| ExportflowError::ActivityNotFound(kind.to_string()))?;

        let timeout = options
            .start_to_close_timeout
            .or_else(|| {
                activity
                    .metadata
                    .timeout_seconds
                    .map(|secs| Duration::from_secs(u64::from(secs)))
            })
            .unwrap_or(self.default_activity_timeout);

        let ctx: Arc<dyn ActivityContext> = Arc::new(LocalActivityContext {
            activity_id: Uuid::new_v4(),
            kind: kind.to_string(),
            workflow_execution_id: self.execution_id,
            cancellation: self.cancellation.clone(),
        });

        let span = info_span!("activity", kind = %kind, activity_id = %ctx.activity_id());
        async move {
            debug!(timeout_ms = timeout.as_millis() as u64, "Activity started");
            match tokio::time::timeout(timeout, activity.execute(ctx, input)).await {
                Ok(result) => {
                    if let Err(e) = &result {
                        error!(error = %e, "Activity failed");
                    }
                    result
                }
                Err(_) => Err(ExportflowError::Timeout(format!(
                    "activity {} exceeded {:?}",
                    kind, timeout
                ))),
            }
        }
        .instrument(span)
        .await
    }

    fn is_cancellation_requested(&self) -> bool {
        self.cancellation.is_cancellation_requested()
    }
}

struct LocalActivityContext {
    activity_id: Uuid,
    kind: String,
    workflow_execution_id: Uuid,
    cancellation: CancellationHandle,
}

#[async_trait]
impl ActivityContext for LocalActivityContext {
    fn activity_id(&self) -> Uuid {
        self.activity_id
    }

    fn activity_kind(&self) -> &str {
        &self.kind
    }

    fn workflow_execution_id(&self) -> Option<Uuid> {
        Some(self.workflow_execution_id)
    }

    fn attempt(&self) -> u32 {
        1
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancellation_requested()
    }
}
