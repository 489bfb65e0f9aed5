//! Activity trait

use crate::activity::context::ActivityContext;
use crate::error::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Retry policy an activity asks the engine to apply.
///
/// The core never retries on its own; this is metadata handed to the engine
/// at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (None = unlimited)
    pub maximum_attempts: Option<u32>,
    /// Delay before the first retry
    pub initial_interval: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_coefficient: f64,
    /// Upper bound for the delay between retries
    pub maximum_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            maximum_attempts: None,
            initial_interval: Duration::from_secs(1),
            backoff_coefficient: 2.0,
            maximum_interval: Duration::from_secs(100),
        }
    }
}

impl RetryPolicy {
    /// Policy for calls that must run at most once
    pub fn no_retry() -> Self {
        Self {
            maximum_attempts: Some(1),
            ..Self::default()
        }
    }
}

/// Definition of an activity with typed input and output
#[async_trait]
pub trait Activity: Send + Sync + 'static {
    type Input: Serialize + DeserializeOwned + Send + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;

    /// Unique identifier for this activity type
    fn kind(&self) -> &str;

    /// Execute one attempt of the activity
    async fn execute(&self, input: Self::Input, ctx: &dyn ActivityContext) -> Result<Self::Output>;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Start-to-close timeout in seconds (None = engine default)
    fn timeout_seconds(&self) -> Option<u32> {
        None
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }
}
