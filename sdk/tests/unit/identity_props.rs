//! Workflow identity and input parsing properties
//!
//! 1. A registered workflow type is named by exactly its registered name
//! 2. Parsing the same arguments twice yields equal inputs
//! 3. Malformed arguments fail with `InvalidInput` and submit nothing

#![cfg(feature = "testing")]

use async_trait::async_trait;
use exportflow_sdk::error::{ExportflowError, Result};
use exportflow_sdk::export::{BackfillExportWorkflow, BACKFILL_EXPORT};
use exportflow_sdk::worker::registry::WorkflowRegistry;
use exportflow_sdk::workflow::context::WorkflowContext;
use exportflow_sdk::workflow::definition::Workflow;
use exportflow_sdk::workflow::identity::WorkflowIdentity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
struct ReplayInput {
    days: u32,
}

/// Second workflow so identity is checked against a non-trivial table
struct ReplayWorkflow;

#[async_trait]
impl Workflow for ReplayWorkflow {
    type Input = ReplayInput;
    type Output = u32;

    fn parse_inputs(inputs: &[String]) -> Result<ReplayInput> {
        match inputs {
            [days] => days
                .parse()
                .map(|days| ReplayInput { days })
                .map_err(|e| ExportflowError::InvalidInput(format!("days: {e}"))),
            _ => Err(ExportflowError::InvalidInput(
                "expected exactly one argument".to_string(),
            )),
        }
    }

    async fn execute(&self, _ctx: &dyn WorkflowContext, input: ReplayInput) -> Result<u32> {
        Ok(input.days)
    }
}

/// Never registered anywhere
struct OrphanWorkflow;

#[async_trait]
impl Workflow for OrphanWorkflow {
    type Input = ();
    type Output = ();

    fn parse_inputs(_inputs: &[String]) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, _ctx: &dyn WorkflowContext, _input: ()) -> Result<()> {
        Ok(())
    }
}

fn registry() -> WorkflowRegistry {
    let registry = WorkflowRegistry::new();
    registry.register(BACKFILL_EXPORT, BackfillExportWorkflow).unwrap();
    registry.register("replay-export", ReplayWorkflow).unwrap();
    registry
}

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_registered_workflow_is_named_by_its_name() {
    let registry = registry();

    let name = BackfillExportWorkflow::get_name(&registry).unwrap();
    assert_eq!(name, BACKFILL_EXPORT);
    assert!(BackfillExportWorkflow::is_named(&registry, &name).unwrap());

    let name = ReplayWorkflow::get_name(&registry).unwrap();
    assert_eq!(name, "replay-export");
    assert!(ReplayWorkflow::is_named(&registry, &name).unwrap());
}

#[test]
fn test_registered_workflow_is_not_named_by_anything_else() {
    let registry = registry();

    for candidate in [
        "",
        "replay-export",
        "backfill",
        "Backfill-Export",
        "backfill-export ",
        "backfill-export-v2",
    ] {
        assert!(
            !BackfillExportWorkflow::is_named(&registry, candidate).unwrap(),
            "{candidate:?} should not match"
        );
    }
}

#[test]
fn test_unregistered_workflow_has_no_identity() {
    let registry = registry();

    assert!(matches!(
        OrphanWorkflow::get_name(&registry),
        Err(ExportflowError::IdentityNotRegistered(_))
    ));
    assert!(matches!(
        OrphanWorkflow::is_named(&registry, "orphan"),
        Err(ExportflowError::IdentityNotRegistered(_))
    ));
}

#[test]
fn test_resolve_matches_identity() {
    let registry = registry();

    for name in registry.names() {
        let workflow = registry.resolve(&name).unwrap();
        assert!(workflow.is_named(&name));
    }
}

#[test]
fn test_parse_inputs_is_deterministic() {
    let registry = registry();
    let cases = [
        (BACKFILL_EXPORT, args(&["--team=42", "--start=2024-01-01", "--end=2024-01-02"])),
        (
            BACKFILL_EXPORT,
            args(&["--team", "7", "--start", "2024-01-01T00:00:00Z", "--end", "2024-01-01T01:00:00Z", "--schedule", "hourly"]),
        ),
        ("replay-export", args(&["30"])),
    ];

    for (name, raw) in cases {
        let workflow = registry.resolve(name).unwrap();
        let first = workflow.parse_inputs(&raw).unwrap();
        let second = workflow.parse_inputs(&raw).unwrap();
        assert_eq!(first, second, "{name} {raw:?}");
    }
}

#[test]
fn test_malformed_arguments_are_invalid_input() {
    let registry = registry();
    let cases = [
        (BACKFILL_EXPORT, args(&[])),
        (BACKFILL_EXPORT, args(&["--team=42"])),
        (BACKFILL_EXPORT, args(&["--team=x", "--start=2024-01-01", "--end=2024-01-02"])),
        (BACKFILL_EXPORT, args(&["--team=1", "--start=2024-02-30", "--end=2024-03-01"])),
        (BACKFILL_EXPORT, args(&["--team=1", "--start=2024-01-02", "--end=2024-01-01"])),
        ("replay-export", args(&[])),
        ("replay-export", args(&["-3"])),
        ("replay-export", args(&["1", "2"])),
    ];

    for (name, raw) in cases {
        let workflow = registry.resolve(name).unwrap();
        let err = workflow.parse_inputs(&raw).unwrap_err();
        assert!(
            matches!(err, ExportflowError::InvalidInput(_)),
            "{name} {raw:?} gave {err:?}"
        );
    }
}
