//! # Todostore
//!
//! An observable todo-list store built on a small fine-grained reactive core.
//!
//! ## Signals (Low-level primitives)
//!
//! Single-threaded reactive primitives the store is built from:
//! - `Signal<T>` - Versioned reactive cells that notify dependents when changed
//! - `Memo<T>` - Derived values, revalidated against source versions on read
//! - `Effect` - Side effects that re-run when what they read changes
//!
//! ## Stores (State management)
//!
//! - `Store<T>` - Generic state container with whole-state subscriptions
//! - `TodoStore` - The todo list: ordered items, an editing marker, derived
//!   views (`active_todos`, `completed_todos`, `all_completed`,
//!   `active_todos_count`) and the mutations that keep them consistent
//!
//! ## App
//!
//! `TodoApp` is the composition root a renderer talks to: routing filters,
//! input drafts and a plain-data `AppView`.

pub mod app;
pub mod error;
pub mod runtime;
pub mod signal;
pub mod store;
pub mod todo;

// Re-export main types for convenience
pub use app::{AppView, Filter, TodoApp};
pub use error::{Result, StoreError};
pub use signal::{batch, create_effect, create_memo, untrack, Effect, Memo, Signal};
pub use store::{Store, Subscription};
pub use todo::{
    InitialState, SetLabel, StoreSnapshot, Todo, TodoHandle, TodoId, TodoSeed, TodoStore,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = TodoStore::new();
        let id = store.add_todo("Buy a unicorn");
        assert_eq!(
            store.get(id).map(|todo| todo.label().to_string()).as_deref(),
            Some("Buy a unicorn")
        );
        assert_eq!(store.active_todos_count(), 1);
    }
}
