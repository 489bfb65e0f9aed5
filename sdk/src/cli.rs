//! Management command dispatch: workflow name plus raw arguments in, one
//! engine submission out.

use crate::engine::{StartWorkflowOptions, StartWorkflowResult, WorkflowEngine};
use crate::error::{ExportflowError, Result};
use crate::worker::registry::WorkflowRegistry;
use tracing::info;

/// Exit code for an unknown workflow name and other failures
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for arguments the workflow could not parse
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Resolve `name`, parse `raw_args` with the matched workflow, and submit the
/// result to `engine` exactly once.
///
/// Nothing is submitted when the name is unknown or the arguments do not
/// parse.
pub async fn dispatch(
    registry: &WorkflowRegistry,
    engine: &dyn WorkflowEngine,
    name: &str,
    raw_args: &[String],
    options: StartWorkflowOptions,
) -> Result<StartWorkflowResult> {
    let workflow = registry.resolve(name).map_err(|e| match e {
        ExportflowError::WorkflowNotFound(_) => ExportflowError::WorkflowNotFound(format!(
            "'{}' (registered: {})",
            name,
            registry.names().join(", ")
        )),
        other => other,
    })?;

    let input = workflow.parse_inputs(raw_args)?;
    info!(workflow = %workflow.name(), queue = %options.queue, "Submitting workflow");

    engine.start_workflow(workflow.name(), input, options).await
}

/// Process exit code for a dispatch failure
pub fn exit_code(err: &ExportflowError) -> i32 {
    match err {
        ExportflowError::InvalidInput(_) => EXIT_INVALID_INPUT,
        _ => EXIT_FAILURE,
    }
}
