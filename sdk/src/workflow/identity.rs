//! Workflow identity lookups against the registration table

use crate::error::Result;
use crate::worker::registry::WorkflowRegistry;
use crate::workflow::definition::Workflow;

/// Name accessors derived for every [`Workflow`].
///
/// The name lives only in the registry, so a workflow body and its
/// registration can never disagree about it.
pub trait WorkflowIdentity: Workflow {
    /// Get this workflow's registered name.
    ///
    /// Fails with `IdentityNotRegistered` if the type was never registered.
    fn get_name(registry: &WorkflowRegistry) -> Result<String>
    where
        Self: Sized,
    {
        registry.name_of::<Self>()
    }

    /// Check if this workflow's registered name equals `candidate`
    fn is_named(registry: &WorkflowRegistry, candidate: &str) -> Result<bool>
    where
        Self: Sized,
    {
        Ok(Self::get_name(registry)? == candidate)
    }
}

impl<W: Workflow> WorkflowIdentity for W {}
