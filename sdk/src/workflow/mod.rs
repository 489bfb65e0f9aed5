//! Workflow contract, identity and execution context

pub mod context;
pub mod definition;
pub mod identity;
