//! Runtime support for reactive primitives.
//!
//! This module provides the infrastructure for dependency tracking,
//! version bookkeeping, batching and observer scheduling.

mod context;

pub use context::{NodeId, ReactiveRuntime};
