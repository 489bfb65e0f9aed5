//! Shared value types

pub mod version;
