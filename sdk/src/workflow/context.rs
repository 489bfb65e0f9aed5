//! WorkflowContext trait definition

use crate::error::{ExportflowError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// Per-call options for an activity invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityOptions {
    /// Overrides the activity's own start-to-close timeout
    pub start_to_close_timeout: Option<Duration>,
}

impl ActivityOptions {
    pub fn with_start_to_close_timeout(mut self, timeout: Duration) -> Self {
        self.start_to_close_timeout = Some(timeout);
        self
    }
}

/// Context handed to a running workflow by the engine.
///
/// Every activity call is a suspension point: the workflow resumes only once
/// the engine delivers that activity's result or failure. Calls are issued in
/// program order.
#[async_trait]
pub trait WorkflowContext: Send + Sync {
    /// Unique ID of this workflow execution
    fn workflow_execution_id(&self) -> Uuid;

    /// Registered name of the running workflow
    fn workflow_name(&self) -> &str;

    /// Invoke an activity by kind and wait for its result (raw Value version)
    async fn execute_activity_raw(
        &self,
        kind: &str,
        input: Value,
        options: ActivityOptions,
    ) -> Result<Value>;

    /// Check if the engine has requested cancellation
    fn is_cancellation_requested(&self) -> bool;

    /// Return a cancellation error if cancellation was requested
    async fn check_cancellation(&self) -> Result<()> {
        if self.is_cancellation_requested() {
            return Err(ExportflowError::Cancelled(format!(
                "workflow {} ({})",
                self.workflow_name(),
                self.workflow_execution_id()
            )));
        }
        Ok(())
    }
}

/// Typed wrappers around the raw Value methods.
pub trait WorkflowContextExt: WorkflowContext {
    /// Invoke an activity with default options
    fn execute_activity<I, O>(
        &self,
        kind: &str,
        input: &I,
    ) -> impl Future<Output = Result<O>> + Send
    where
        I: Serialize,
        O: DeserializeOwned,
        Self: Sync,
    {
        self.execute_activity_with_options(kind, input, ActivityOptions::default())
    }

    /// Invoke an activity with custom options
    fn execute_activity_with_options<I, O>(
        &self,
        kind: &str,
        input: &I,
        options: ActivityOptions,
    ) -> impl Future<Output = Result<O>> + Send
    where
        I: Serialize,
        O: DeserializeOwned,
        Self: Sync,
    {
        let input = serde_json::to_value(input);
        let kind = kind.to_string();
        async move {
            let output = self.execute_activity_raw(&kind, input?, options).await?;
            serde_json::from_value(output).map_err(ExportflowError::Serialization)
        }
    }
}

impl<T: WorkflowContext + ?Sized> WorkflowContextExt for T {}
