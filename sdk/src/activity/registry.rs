//! ActivityRegistry - Registry for activity definitions

use crate::activity::context::ActivityContext;
use crate::activity::definition::{Activity, RetryPolicy};
use crate::error::{ExportflowError, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Activity metadata extracted from an activity definition
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityMetadata {
    /// Unique activity kind identifier
    pub kind: String,
    pub description: Option<String>,
    /// Start-to-close timeout in seconds
    pub timeout_seconds: Option<u32>,
    pub retry_policy: RetryPolicy,
}

/// Type alias for boxed activity execution functions
pub type BoxedActivityFn = Box<
    dyn Fn(Arc<dyn ActivityContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// A registered activity with its metadata and execution function
pub struct RegisteredActivity {
    pub metadata: ActivityMetadata,
    execute_fn: BoxedActivityFn,
}

impl RegisteredActivity {
    pub fn new(metadata: ActivityMetadata, execute_fn: BoxedActivityFn) -> Self {
        Self {
            metadata,
            execute_fn,
        }
    }

    /// Execute one attempt of the activity
    pub async fn execute(&self, ctx: Arc<dyn ActivityContext>, input: Value) -> Result<Value> {
        (self.execute_fn)(ctx, input).await
    }
}

impl std::fmt::Debug for RegisteredActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredActivity")
            .field("metadata", &self.metadata)
            .field("execute_fn", &"<function>")
            .finish()
    }
}

/// Registry for activity implementations, keyed by kind.
#[derive(Default)]
pub struct ActivityRegistry {
    activities: RwLock<HashMap<String, Arc<RegisteredActivity>>>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity with metadata and execution function
    pub fn register_raw(&self, activity: RegisteredActivity) -> Result<()> {
        let kind = activity.metadata.kind.clone();
        let mut activities = self.activities.write();

        if activities.contains_key(&kind) {
            return Err(ExportflowError::InvalidConfiguration(format!(
                "Activity '{}' is already registered. Each activity kind must be unique.",
                kind
            )));
        }

        activities.insert(kind, Arc::new(activity));
        Ok(())
    }

    /// Register an activity definition.
    ///
    /// Input that does not deserialize into the activity's input type is an
    /// `InvalidInput` failure, which the engine must not retry.
    pub fn register<A: Activity>(&self, activity: A) -> Result<()> {
        let metadata = ActivityMetadata {
            kind: activity.kind().to_string(),
            description: activity.description().map(str::to_string),
            timeout_seconds: activity.timeout_seconds(),
            retry_policy: activity.retry_policy(),
        };

        let activity = Arc::new(activity);

        let execute_fn: BoxedActivityFn = Box::new(move |ctx, input| {
            let activity = Arc::clone(&activity);
            Box::pin(async move {
                let typed_input: A::Input = serde_json::from_value(input).map_err(|e| {
                    ExportflowError::InvalidInput(format!(
                        "{} input does not match: {e}",
                        activity.kind()
                    ))
                })?;
                let output = activity.execute(typed_input, ctx.as_ref()).await?;
                serde_json::to_value(output).map_err(ExportflowError::Serialization)
            })
        });

        self.register_raw(RegisteredActivity::new(metadata, execute_fn))
    }

    pub fn get(&self, kind: &str) -> Option<Arc<RegisteredActivity>> {
        self.activities.read().get(kind).cloned()
    }

    pub fn has(&self, kind: &str) -> bool {
        self.activities.read().contains_key(kind)
    }

    /// All registered kinds, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.activities.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.activities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.read().is_empty()
    }
}

impl std::fmt::Debug for ActivityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRegistry")
            .field("activities", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockActivityContext;
    use async_trait::async_trait;
    use serde_json::json;

    struct DoubleActivity;

    #[async_trait]
    impl Activity for DoubleActivity {
        type Input = i64;
        type Output = i64;

        fn kind(&self) -> &str {
            "double"
        }

        async fn execute(&self, input: i64, ctx: &dyn ActivityContext) -> Result<i64> {
            ctx.check_cancellation().await?;
            Ok(input * 2)
        }

        fn timeout_seconds(&self) -> Option<u32> {
            Some(5)
        }

        fn retry_policy(&self) -> RetryPolicy {
            RetryPolicy::no_retry()
        }
    }

    #[test]
    fn test_register_extracts_metadata() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        let activity = registry.get("double").unwrap();
        assert_eq!(activity.metadata.kind, "double");
        assert_eq!(activity.metadata.timeout_seconds, Some(5));
        assert_eq!(activity.metadata.retry_policy, RetryPolicy::no_retry());
        assert!(registry.has("double"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        match registry.register(DoubleActivity) {
            Err(ExportflowError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("already registered"))
            }
            other => panic!("Expected InvalidConfiguration error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registered_activity_execute() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        let ctx = Arc::new(MockActivityContext::new());
        let output = registry
            .get("double")
            .unwrap()
            .execute(ctx, json!(21))
            .await
            .unwrap();
        assert_eq!(output, json!(42));
    }

    #[tokio::test]
    async fn test_mismatched_input_is_invalid_input() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        let ctx = Arc::new(MockActivityContext::new());
        let err = registry
            .get("double")
            .unwrap()
            .execute(ctx, json!("twenty"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportflowError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context_propagates() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        let ctx = Arc::new(MockActivityContext::builder().cancelled().build());
        let err = registry
            .get("double")
            .unwrap()
            .execute(ctx, json!(1))
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_kinds_sorted_and_debug() {
        let registry = ActivityRegistry::new();
        registry.register(DoubleActivity).unwrap();

        let execute_fn: BoxedActivityFn =
            Box::new(|_ctx, input| Box::pin(async move { Ok(input) }));
        let metadata = ActivityMetadata {
            kind: "a-first".to_string(),
            description: None,
            timeout_seconds: None,
            retry_policy: RetryPolicy::default(),
        };
        registry
            .register_raw(RegisteredActivity::new(metadata, execute_fn))
            .unwrap();

        assert_eq!(registry.kinds(), vec!["a-first", "double"]);
        assert!(format!("{:?}", registry).contains("double"));
    }
}
