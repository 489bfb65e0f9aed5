//! Mock activity context for unit testing activities in isolation.

use crate::activity::context::ActivityContext;
use crate::engine::CancellationHandle;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Mock implementation of ActivityContext for testing activities in isolation.
///
/// # Example
///
/// ```ignore
/// use exportflow_sdk::testing::MockActivityContext;
///
/// let ctx = MockActivityContext::builder()
///     .activity_kind("create-export-run")
///     .attempt(2)
///     .build();
///
/// activity.execute(input, &ctx).await?;
/// ```
pub struct MockActivityContext {
    inner: Arc<MockActivityContextInner>,
}

struct MockActivityContextInner {
    activity_id: Uuid,
    activity_kind: String,
    workflow_execution_id: Option<Uuid>,
    attempt: AtomicU32,
    cancellation: CancellationHandle,
}

impl Clone for MockActivityContext {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl MockActivityContext {
    /// Create a new builder for MockActivityContext.
    pub fn builder() -> MockActivityContextBuilder {
        MockActivityContextBuilder::default()
    }

    /// Create a simple mock context with default values.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.inner.cancellation.request_cancellation();
    }

    /// Set the attempt number.
    pub fn set_attempt(&self, attempt: u32) {
        self.inner.attempt.store(attempt, Ordering::SeqCst);
    }
}

impl Default for MockActivityContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for MockActivityContext.
#[derive(Default)]
pub struct MockActivityContextBuilder {
    activity_id: Option<Uuid>,
    activity_kind: Option<String>,
    workflow_execution_id: Option<Uuid>,
    attempt: Option<u32>,
    cancelled: bool,
    cancellation: Option<CancellationHandle>,
}

impl MockActivityContextBuilder {
    pub fn activity_id(mut self, id: Uuid) -> Self {
        self.activity_id = Some(id);
        self
    }

    pub fn activity_kind(mut self, kind: &str) -> Self {
        self.activity_kind = Some(kind.to_string());
        self
    }

    /// Set the workflow execution that issued the activity.
    pub fn workflow_execution_id(mut self, id: Uuid) -> Self {
        self.workflow_execution_id = Some(id);
        self
    }

    pub fn attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Set the activity as cancelled.
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Share cancellation with a workflow context or engine.
    pub fn cancellation_handle(mut self, handle: CancellationHandle) -> Self {
        self.cancellation = Some(handle);
        self
    }

    /// Build the MockActivityContext.
    pub fn build(self) -> MockActivityContext {
        let cancellation = self.cancellation.unwrap_or_default();
        if self.cancelled {
            cancellation.request_cancellation();
        }
        MockActivityContext {
            inner: Arc::new(MockActivityContextInner {
                activity_id: self.activity_id.unwrap_or_else(Uuid::new_v4),
                activity_kind: self.activity_kind.unwrap_or_else(|| "mock".to_string()),
                workflow_execution_id: self.workflow_execution_id,
                attempt: AtomicU32::new(self.attempt.unwrap_or(1)),
                cancellation,
            }),
        }
    }
}

#[async_trait]
impl ActivityContext for MockActivityContext {
    fn activity_id(&self) -> Uuid {
        self.inner.activity_id
    }

    fn activity_kind(&self) -> &str {
        &self.inner.activity_kind
    }

    fn workflow_execution_id(&self) -> Option<Uuid> {
        self.inner.workflow_execution_id
    }

    fn attempt(&self) -> u32 {
        self.inner.attempt.load(Ordering::SeqCst)
    }

    fn is_cancelled(&self) -> bool {
        self.inner.cancellation.is_cancellation_requested()
    }
}
