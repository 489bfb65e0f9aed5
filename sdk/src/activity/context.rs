//! ActivityContext trait definition

use crate::error::{ExportflowError, Result};
use async_trait::async_trait;
use uuid::Uuid;

/// Context for a single activity attempt, supplied by the engine.
#[async_trait]
pub trait ActivityContext: Send + Sync {
    /// Unique ID of this activity execution
    fn activity_id(&self) -> Uuid;

    /// Registered kind of the running activity
    fn activity_kind(&self) -> &str;

    /// Workflow execution that issued this activity, if any
    fn workflow_execution_id(&self) -> Option<Uuid>;

    /// Current attempt number (1-indexed). Values above 1 mean the engine is
    /// redelivering after a failure.
    fn attempt(&self) -> u32;

    /// Check if the engine has cancelled this activity
    fn is_cancelled(&self) -> bool;

    /// Return a cancellation error if the activity was cancelled
    async fn check_cancellation(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ExportflowError::Cancelled(format!(
                "activity {} ({})",
                self.activity_kind(),
                self.activity_id()
            )));
        }
        Ok(())
    }
}
