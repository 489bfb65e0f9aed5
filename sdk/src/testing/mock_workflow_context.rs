//! Mock workflow context for unit testing workflows in isolation.

use crate::activity::registry::ActivityRegistry;
use crate::engine::CancellationHandle;
use crate::error::{ExportflowError, Result};
use crate::testing::MockActivityContext;
use crate::workflow::context::{ActivityOptions, WorkflowContext};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Mock implementation of WorkflowContext for testing workflows in isolation.
///
/// Activity calls are answered, in order of precedence, by a configured
/// failure, a configured result, or a real activity from an attached
/// [`ActivityRegistry`]. Every call is recorded, including failed ones.
/// Registry activities share the workflow's cancellation, as they do under
/// [`LocalEngine`](crate::engine::LocalEngine).
///
/// # Example
///
/// ```ignore
/// use exportflow_sdk::testing::MockWorkflowContext;
/// use serde_json::json;
///
/// let ctx = MockWorkflowContext::builder()
///     .activity_result("create-export-run", json!("run-1"))
///     .activity_result("update-export-run-status", json!(null))
///     .build();
///
/// BackfillExportWorkflow.execute(&ctx, input).await?;
///
/// assert!(ctx.was_activity_executed("update-export-run-status"));
/// ```
pub struct MockWorkflowContext {
    inner: Arc<MockWorkflowContextInner>,
}

struct MockWorkflowContextInner {
    workflow_execution_id: Uuid,
    workflow_name: String,
    activity_results: RwLock<HashMap<String, Value>>,
    activity_failures: RwLock<HashMap<String, String>>,
    activities: Option<Arc<ActivityRegistry>>,
    recorded_activities: RwLock<Vec<RecordedActivity>>,
    cancellation: CancellationHandle,
}

impl Clone for MockWorkflowContext {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// An activity invocation issued by the workflow under test
#[derive(Debug, Clone)]
pub struct RecordedActivity {
    pub kind: String,
    pub input: Value,
    pub options: ActivityOptions,
}

impl MockWorkflowContext {
    /// Create a new builder for MockWorkflowContext.
    pub fn builder() -> MockWorkflowContextBuilder {
        MockWorkflowContextBuilder::default()
    }

    /// Create a simple mock context with default values.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Get all recorded activity invocations, in call order.
    pub fn recorded_activities(&self) -> Vec<RecordedActivity> {
        self.inner.recorded_activities.read().clone()
    }

    /// Check if an activity of the given kind was invoked.
    pub fn was_activity_executed(&self, kind: &str) -> bool {
        self.inner
            .recorded_activities
            .read()
            .iter()
            .any(|a| a.kind == kind)
    }

    /// Request cancellation.
    pub fn request_cancellation(&self) {
        self.inner.cancellation.request_cancellation();
    }

    /// Set an activity result for testing.
    pub fn set_activity_result(&self, kind: &str, result: Value) {
        self.inner
            .activity_results
            .write()
            .insert(kind.to_string(), result);
    }
}

impl Default for MockWorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for MockWorkflowContext.
#[derive(Default)]
pub struct MockWorkflowContextBuilder {
    workflow_execution_id: Option<Uuid>,
    workflow_name: Option<String>,
    activity_results: HashMap<String, Value>,
    activity_failures: HashMap<String, String>,
    activities: Option<Arc<ActivityRegistry>>,
    cancellation_requested: bool,
    cancellation: Option<CancellationHandle>,
}

impl MockWorkflowContextBuilder {
    /// Set the workflow execution ID.
    pub fn workflow_execution_id(mut self, id: Uuid) -> Self {
        self.workflow_execution_id = Some(id);
        self
    }

    /// Set the registered name the workflow runs under.
    pub fn workflow_name(mut self, name: &str) -> Self {
        self.workflow_name = Some(name.to_string());
        self
    }

    /// Set an expected activity result.
    pub fn activity_result(mut self, kind: &str, result: Value) -> Self {
        self.activity_results.insert(kind.to_string(), result);
        self
    }

    /// Make every call to an activity kind fail with an engine error.
    pub fn activity_failure(mut self, kind: &str, message: &str) -> Self {
        self.activity_failures
            .insert(kind.to_string(), message.to_string());
        self
    }

    /// Run activities that have no configured result through a registry.
    pub fn with_activities(mut self, activities: Arc<ActivityRegistry>) -> Self {
        self.activities = Some(activities);
        self
    }

    /// Start with cancellation already requested.
    pub fn cancellation_requested(mut self) -> Self {
        self.cancellation_requested = true;
        self
    }

    /// Use `handle` for cancellation, so a test can cancel mid-run.
    pub fn cancellation_handle(mut self, handle: CancellationHandle) -> Self {
        self.cancellation = Some(handle);
        self
    }

    /// Build the MockWorkflowContext.
    pub fn build(self) -> MockWorkflowContext {
        let cancellation = self.cancellation.unwrap_or_default();
        if self.cancellation_requested {
            cancellation.request_cancellation();
        }
        MockWorkflowContext {
            inner: Arc::new(MockWorkflowContextInner {
                workflow_execution_id: self.workflow_execution_id.unwrap_or_else(Uuid::new_v4),
                workflow_name: self
                    .workflow_name
                    .unwrap_or_else(|| "mock-workflow".to_string()),
                activity_results: RwLock::new(self.activity_results),
                activity_failures: RwLock::new(self.activity_failures),
                activities: self.activities,
                recorded_activities: RwLock::new(Vec::new()),
                cancellation,
            }),
        }
    }
}

#[async_trait]
impl WorkflowContext for MockWorkflowContext {
    fn workflow_execution_id(&self) -> Uuid {
        self.inner.workflow_execution_id
    }

    fn workflow_name(&self) -> &str {
        &self.inner.workflow_name
    }

    async fn execute_activity_raw(
        &self,
        kind: &str,
        input: Value,
        options: ActivityOptions,
    ) -> Result<Value> {
        self.inner.recorded_activities.write().push(RecordedActivity {
            kind: kind.to_string(),
            input: input.clone(),
            options,
        });

        if let Some(message) = self.inner.activity_failures.read().get(kind) {
            return Err(ExportflowError::Engine(message.clone()));
        }
        if let Some(result) = self.inner.activity_results.read().get(kind) {
            return Ok(result.clone());
        }

        let activity = self
            .inner
            .activities
            .as_ref()
            .and_then(|registry| registry.get(kind))
            .ok_or_else(|| ExportflowError::ActivityNotFound(kind.to_string()))?;

        let ctx = MockActivityContext::builder()
            .activity_kind(kind)
            .workflow_execution_id(self.inner.workflow_execution_id)
            .cancellation_handle(self.inner.cancellation.clone())
            .build();
        activity.execute(Arc::new(ctx), input).await
    }

    fn is_cancellation_requested(&self) -> bool {
        self.inner.cancellation.is_cancellation_requested()
    }
}
