//! End-to-end tests for exportflow-sdk
//!
//! These tests wire the export workflows and activities into registries the
//! way the `exportflow` binary does, then drive them through CLI dispatch and
//! the in-process engine.
//!
//! ```bash
//! cargo test --test e2e -p exportflow-sdk
//! ```

#![cfg(feature = "testing")]

mod dispatch_tests;
mod local_engine_tests;

use exportflow_sdk::activity::registry::ActivityRegistry;
use exportflow_sdk::export::{self, ExportRunStore};
use exportflow_sdk::worker::registry::WorkflowRegistry;
use std::sync::Arc;

/// Initialize tracing once for all tests
static TRACING_INITIALIZED: std::sync::Once = std::sync::Once::new();

fn init_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Registries populated with the export workflows and activities over `store`
pub struct Fixture {
    pub workflows: Arc<WorkflowRegistry>,
    pub activities: Arc<ActivityRegistry>,
    pub store: Arc<dyn ExportRunStore>,
}

impl Fixture {
    pub fn new(store: Arc<dyn ExportRunStore>) -> Self {
        init_tracing();

        let workflows = Arc::new(WorkflowRegistry::new());
        let activities = Arc::new(ActivityRegistry::new());
        export::register_all(&workflows, &activities, Arc::clone(&store))
            .expect("Failed to register export workflows");

        Self {
            workflows,
            activities,
            store,
        }
    }
}

pub fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
