//! Tracing/logging setup shared by every embedding of the client.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{init, init_for_tests};
