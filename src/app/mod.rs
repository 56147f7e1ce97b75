//! Presentation-side glue over the todo store.
//!
//! Nothing here renders anything. These types hold the UI-only state (the
//! selected filter, text drafts) and reduce store plus UI state to a plain
//! [`AppView`] that a renderer draws and re-draws when notified.

mod filter;
mod input;
mod todo_app;
mod view;

pub use filter::{Filter, ParseFilterError};
pub use input::{EditDraft, NewTodoDraft};
pub use todo_app::{TodoApp, UiState};
pub use view::{AppView, TodoRow};
