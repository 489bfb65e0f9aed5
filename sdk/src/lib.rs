//! Exportflow SDK for Rust
//!
//! Durable workflow and activity layer for scheduled data exports: workflow
//! identity and CLI input parsing, export run activities over a synchronous
//! store, and a seam to the orchestration engine that runs them.

#![allow(clippy::result_large_err)]

pub mod activity;
pub mod cli;
pub mod common;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod worker;
pub mod workflow;

/// Testing utilities for unit testing workflows and activities.
///
/// Available only with the `testing` feature enabled.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use common::version::SemanticVersion;
pub use error::{ExportflowError, Result};

// Re-export config types
pub use config::{ConfigError, EngineConfig, StoreConfig};

// Re-export engine types
pub use engine::{
    CancellationHandle, LocalEngine, StartWorkflowOptions, StartWorkflowResult, WorkflowEngine,
};

// Re-export workflow types
pub use workflow::context::{ActivityOptions, WorkflowContext, WorkflowContextExt};
pub use workflow::definition::{Workflow, WorkflowDefinition};
pub use workflow::identity::WorkflowIdentity;

// Re-export activity types
pub use activity::blocking::run_blocking;
pub use activity::context::ActivityContext;
pub use activity::definition::{Activity, RetryPolicy};
pub use activity::registry::{ActivityMetadata, ActivityRegistry, RegisteredActivity};

// Re-export worker types
pub use worker::registry::{RegisteredWorkflow, WorkflowRegistry};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::activity::blocking::run_blocking;
    pub use crate::activity::context::ActivityContext;
    pub use crate::activity::definition::{Activity, RetryPolicy};
    pub use crate::activity::registry::ActivityRegistry;
    pub use crate::common::version::SemanticVersion;
    pub use crate::engine::{StartWorkflowOptions, StartWorkflowResult, WorkflowEngine};
    pub use crate::error::{ExportflowError, Result};
    pub use crate::worker::registry::WorkflowRegistry;
    pub use crate::workflow::context::{ActivityOptions, WorkflowContext, WorkflowContextExt};
    pub use crate::workflow::definition::Workflow;
    pub use crate::workflow::identity::WorkflowIdentity;
    pub use async_trait::async_trait;
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value};
    pub use uuid::Uuid;
}
