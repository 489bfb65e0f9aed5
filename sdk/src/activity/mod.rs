//! Activity contract, context, registry and the blocking bridge

pub mod blocking;
pub mod context;
pub mod definition;
pub mod registry;
