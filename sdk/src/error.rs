//! Error types for the exportflow SDK

/// Main error type for workflows, activities and their collaborators
#[derive(Debug, thiserror::Error)]
pub enum ExportflowError {
    /// Identity lookup on a workflow type that was never registered
    #[error("Workflow type not registered: {0}")]
    IdentityNotRegistered(String),

    /// Malformed workflow or activity input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Underlying store failure; the engine may retry
    #[error("Persistence error: {0}")]
    TransientPersistence(String),

    /// No workflow registered under the requested name
    #[error("Workflow not found: {0}")]
    WorkflowNotFound(String),

    /// No activity registered under the requested kind
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),

    /// Invalid registration or configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Execution was cancelled by the engine
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Execution exceeded its timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure raised by the orchestration engine itself
    #[error("Engine error: {0}")]
    Engine(String),
}

impl ExportflowError {
    /// Whether an engine may retry the failed call.
    ///
    /// Input, lookup and identity errors are permanent: retrying with the
    /// same arguments cannot succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExportflowError::TransientPersistence(_)
                | ExportflowError::Timeout(_)
                | ExportflowError::Io(_)
                | ExportflowError::Engine(_)
        )
    }

    /// Whether this error reports a cancellation
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ExportflowError::Cancelled(_))
    }
}

/// Result type alias for exportflow operations
pub type Result<T> = std::result::Result<T, ExportflowError>;
