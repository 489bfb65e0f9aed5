//! Test doubles for workflows, activities and engines.
//!
//! Available only with the `testing` feature enabled.

mod mock_activity_context;
mod mock_workflow_context;
mod recording_engine;

pub use mock_activity_context::{MockActivityContext, MockActivityContextBuilder};
pub use mock_workflow_context::{MockWorkflowContext, MockWorkflowContextBuilder, RecordedActivity};
pub use recording_engine::{RecordingEngine, Submission};
