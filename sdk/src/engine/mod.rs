//! Seam between the workflow layer and the orchestration engine.
//!
//! The engine owns durability, retries and scheduling. This crate only asks it
//! to start a workflow by name; [`LocalEngine`] runs workflows in-process.

pub mod local;

pub use local::{CancellationHandle, LocalEngine};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Queue used when none is configured
pub const DEFAULT_QUEUE: &str = "default";

/// Options for starting a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct StartWorkflowOptions {
    /// Task queue to use
    pub queue: String,
    /// Execution id to use instead of a generated one
    pub workflow_id: Option<Uuid>,
    pub labels: HashMap<String, String>,
}

impl Default for StartWorkflowOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl StartWorkflowOptions {
    /// Create new options with the default queue
    pub fn new() -> Self {
        Self {
            queue: DEFAULT_QUEUE.to_string(),
            workflow_id: None,
            labels: HashMap::new(),
        }
    }

    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    pub fn with_workflow_id(mut self, id: Uuid) -> Self {
        self.workflow_id = Some(id);
        self
    }

    pub fn with_labels(mut self, labels: HashMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Result of starting a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct StartWorkflowResult {
    /// The workflow execution ID
    pub workflow_execution_id: Uuid,
    /// Workflow output, when the engine ran it to completion before returning
    pub output: Option<Value>,
}

/// Orchestration engine able to start registered workflows
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Start the workflow registered under `name` with an already-parsed input
    async fn start_workflow(
        &self,
        name: &str,
        input: Value,
        options: StartWorkflowOptions,
    ) -> Result<StartWorkflowResult>;
}
