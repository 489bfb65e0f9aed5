//! Workflow trait and registration descriptor

use crate::common::version::SemanticVersion;
use crate::error::Result;
use crate::workflow::context::WorkflowContext;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A durable workflow with typed input and output.
///
/// A workflow does not declare its own name: the name is attached when the
/// type is registered with a [`WorkflowRegistry`](crate::worker::registry::WorkflowRegistry)
/// and read back through [`WorkflowIdentity`](crate::workflow::identity::WorkflowIdentity).
///
/// # Example
///
/// ```ignore
/// registry.register("backfill-export", BackfillExportWorkflow)?;
/// assert!(BackfillExportWorkflow::is_named(&registry, "backfill-export")?);
/// ```
#[async_trait]
pub trait Workflow: Send + Sync + 'static {
    /// Input type, produced by [`Workflow::parse_inputs`] when started from the CLI
    type Input: Serialize + DeserializeOwned + JsonSchema + Send + 'static;
    /// Output type returned to the engine
    type Output: Serialize + DeserializeOwned + Send + 'static;

    /// Parse inputs from the management command CLI.
    ///
    /// Must be deterministic and free of side effects. Malformed arguments
    /// are reported as [`ExportflowError::InvalidInput`](crate::error::ExportflowError::InvalidInput).
    fn parse_inputs(inputs: &[String]) -> Result<Self::Input>
    where
        Self: Sized;

    /// Run the workflow body. Activities are invoked through `ctx`.
    async fn execute(&self, ctx: &dyn WorkflowContext, input: Self::Input) -> Result<Self::Output>;

    /// Optional description shown by `exportflow list`
    fn description(&self) -> Option<&str> {
        None
    }

    fn version(&self) -> SemanticVersion {
        SemanticVersion::default()
    }

    fn tags(&self) -> Vec<String> {
        vec![]
    }
}

/// Descriptor attached to a workflow type at registration time.
///
/// Only the registry builds these; workflow code reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
    /// Registered name, the workflow's identity
    pub name: String,
    pub description: Option<String>,
    pub version: SemanticVersion,
    pub tags: Vec<String>,
    /// JSON Schema of the workflow input
    pub input_schema: Option<Value>,
}

impl WorkflowDefinition {
    /// Build the descriptor for `workflow` registered under `name`
    pub fn for_workflow<W: Workflow>(name: &str, workflow: &W) -> Self {
        Self {
            name: name.to_string(),
            description: workflow.description().map(str::to_string),
            version: workflow.version(),
            tags: workflow.tags(),
            input_schema: Some(generate_schema::<W::Input>()),
        }
    }

    /// Descriptor with only a name, for raw registrations
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            version: SemanticVersion::default(),
            tags: vec![],
            input_schema: None,
        }
    }
}

/// Generate JSON Schema from a type that implements JsonSchema.
pub fn generate_schema<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema).unwrap_or(Value::Null)
}
