//! WorkflowRegistry - registration table for workflow types
//!
//! Registration attaches a name to a workflow type. The registry is the only
//! place that name is stored: identity lookups (`get_name`/`is_named`) and
//! CLI dispatch both read it from here.

use crate::error::{ExportflowError, Result};
use crate::workflow::context::WorkflowContext;
use crate::workflow::definition::{Workflow, WorkflowDefinition};
use parking_lot::RwLock;
use serde_json::Value;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for boxed CLI input parsers
pub type BoxedParseFn = Box<dyn Fn(&[String]) -> Result<Value> + Send + Sync>;

/// Type alias for boxed workflow execution functions
pub type BoxedWorkflowFn = Box<
    dyn Fn(Arc<dyn WorkflowContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// A registered workflow with its descriptor, parser and execution function
pub struct RegisteredWorkflow {
    pub definition: WorkflowDefinition,
    parse_fn: BoxedParseFn,
    execute_fn: BoxedWorkflowFn,
}

impl RegisteredWorkflow {
    pub fn new(
        definition: WorkflowDefinition,
        parse_fn: BoxedParseFn,
        execute_fn: BoxedWorkflowFn,
    ) -> Self {
        Self {
            definition,
            parse_fn,
            execute_fn,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Check if this workflow's registered name matches `candidate`
    pub fn is_named(&self, candidate: &str) -> bool {
        self.definition.name == candidate
    }

    /// Parse raw CLI arguments into the workflow's serialized input
    pub fn parse_inputs(&self, raw_args: &[String]) -> Result<Value> {
        (self.parse_fn)(raw_args)
    }

    /// Execute the workflow
    pub async fn execute(&self, ctx: Arc<dyn WorkflowContext>, input: Value) -> Result<Value> {
        (self.execute_fn)(ctx, input).await
    }
}

impl std::fmt::Debug for RegisteredWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredWorkflow")
            .field("definition", &self.definition)
            .field("parse_fn", &"<function>")
            .field("execute_fn", &"<function>")
            .finish()
    }
}

#[derive(Default)]
struct RegistryTable {
    by_name: HashMap<String, Arc<RegisteredWorkflow>>,
    by_type: HashMap<TypeId, String>,
}

/// Registration table mapping workflow names to their implementations.
///
/// Populated once at process startup.
#[derive(Default)]
pub struct WorkflowRegistry {
    table: RwLock<RegistryTable>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow type under `name`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// registry.register("backfill-export", BackfillExportWorkflow)?;
    /// ```
    pub fn register<W: Workflow>(&self, name: &str, workflow: W) -> Result<()> {
        let definition = WorkflowDefinition::for_workflow(name, &workflow);
        let workflow = Arc::new(workflow);

        let parse_fn: BoxedParseFn = Box::new(|raw_args: &[String]| {
            let input = W::parse_inputs(raw_args)?;
            serde_json::to_value(input).map_err(ExportflowError::Serialization)
        });

        let execute_fn: BoxedWorkflowFn = Box::new(move |ctx, input| {
            let workflow = Arc::clone(&workflow);
            Box::pin(async move {
                let typed_input: W::Input = serde_json::from_value(input).map_err(|e| {
                    ExportflowError::InvalidInput(format!("workflow input does not match: {e}"))
                })?;
                let output = workflow.execute(ctx.as_ref(), typed_input).await?;
                serde_json::to_value(output).map_err(ExportflowError::Serialization)
            })
        });

        self.insert(
            RegisteredWorkflow::new(definition, parse_fn, execute_fn),
            Some(TypeId::of::<W>()),
        )
    }

    /// Register a workflow from a descriptor and boxed functions.
    ///
    /// Raw registrations have no Rust type behind them, so they can be
    /// resolved by name but have no type identity.
    pub fn register_raw(&self, workflow: RegisteredWorkflow) -> Result<()> {
        self.insert(workflow, None)
    }

    fn insert(&self, workflow: RegisteredWorkflow, type_id: Option<TypeId>) -> Result<()> {
        let name = workflow.definition.name.clone();
        validate_name(&name)?;

        let mut table = self.table.write();
        if table.by_name.contains_key(&name) {
            return Err(ExportflowError::InvalidConfiguration(format!(
                "Workflow '{}' is already registered. Each workflow name must be unique.",
                name
            )));
        }
        if let Some(type_id) = type_id {
            if let Some(existing) = table.by_type.get(&type_id) {
                return Err(ExportflowError::InvalidConfiguration(format!(
                    "Workflow type is already registered as '{}'",
                    existing
                )));
            }
            table.by_type.insert(type_id, name.clone());
        }

        table.by_name.insert(name, Arc::new(workflow));
        Ok(())
    }

    /// Registered name of workflow type `W`
    pub fn name_of<W: 'static>(&self) -> Result<String> {
        self.table
            .read()
            .by_type
            .get(&TypeId::of::<W>())
            .cloned()
            .ok_or_else(|| ExportflowError::IdentityNotRegistered(type_name::<W>().to_string()))
    }

    /// Resolve a CLI-supplied name to the matching workflow
    pub fn resolve(&self, candidate: &str) -> Result<Arc<RegisteredWorkflow>> {
        self.table
            .read()
            .by_name
            .values()
            .find(|w| w.is_named(candidate))
            .cloned()
            .ok_or_else(|| ExportflowError::WorkflowNotFound(candidate.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Arc<RegisteredWorkflow>> {
        self.table.read().by_name.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.table.read().by_name.contains_key(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.read().by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// All registered descriptors, sorted by name
    pub fn definitions(&self) -> Vec<WorkflowDefinition> {
        let mut definitions: Vec<WorkflowDefinition> = self
            .table
            .read()
            .by_name
            .values()
            .map(|w| w.definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.table.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().by_name.is_empty()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ExportflowError::InvalidConfiguration(format!(
            "Invalid workflow name '{}': must be non-empty without whitespace",
            name
        )));
    }
    Ok(())
}

impl std::fmt::Debug for WorkflowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRegistry")
            .field("workflows", &self.names())
            .finish()
    }
}
