//! Workflow registration

pub mod registry;

pub use registry::{RegisteredWorkflow, WorkflowRegistry};
