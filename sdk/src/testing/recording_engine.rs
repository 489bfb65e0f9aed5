//! Engine double that records start requests instead of running workflows.

use crate::engine::{StartWorkflowOptions, StartWorkflowResult, WorkflowEngine};
use crate::error::{ExportflowError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A recorded `start_workflow` call
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub input: Value,
    pub options: StartWorkflowOptions,
    pub workflow_execution_id: Uuid,
}

/// [`WorkflowEngine`] that accepts every start request and records it.
///
/// # Example
///
/// ```ignore
/// let engine = RecordingEngine::new();
/// cli::dispatch(&registry, &engine, "backfill-export", &args, options).await?;
/// assert_eq!(engine.submission_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingEngine {
    submissions: Arc<RwLock<Vec<Submission>>>,
    rejection: Option<String>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that records, then rejects, every start request.
    pub fn rejecting(message: &str) -> Self {
        Self {
            submissions: Arc::default(),
            rejection: Some(message.to_string()),
        }
    }

    /// Get all recorded submissions, in call order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.read().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.read().len()
    }

    pub fn last_submission(&self) -> Option<Submission> {
        self.submissions.read().last().cloned()
    }
}

#[async_trait]
impl WorkflowEngine for RecordingEngine {
    async fn start_workflow(
        &self,
        name: &str,
        input: Value,
        options: StartWorkflowOptions,
    ) -> Result<StartWorkflowResult> {
        let workflow_execution_id = options.workflow_id.unwrap_or_else(Uuid::new_v4);
        self.submissions.write().push(Submission {
            name: name.to_string(),
            input,
            options,
            workflow_execution_id,
        });

        if let Some(message) = &self.rejection {
            return Err(ExportflowError::Engine(message.clone()));
        }
        Ok(StartWorkflowResult {
            workflow_execution_id,
            output: None,
        })
    }
}
