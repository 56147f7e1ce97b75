//! Fine-grained reactive primitives.
//!
//! This module provides the core building blocks for reactive programming:
//! - Signals: Versioned reactive cells
//! - Memos: Derived values revalidated against source versions on read
//! - Effects: Side effects that re-run when what they read changes

mod effect;
mod memo;
mod signal;

pub use effect::{batch, create_effect, untrack, Effect};
pub use memo::{create_memo, Memo};
pub use signal::Signal;
