//! High-level state management with stores.
//!
//! Stores provide a convenient abstraction for managing application state
//! with automatic reactivity and change subscriptions.

mod store;
mod subscribers;

pub use store::Store;
pub use subscribers::{Subscribers, Subscription};
