//! The todo list core: items, the observable store and its serializable forms.

mod handle;
mod item;
mod snapshot;
mod store;

pub use handle::TodoHandle;
pub use item::{Todo, TodoId};
pub use snapshot::{InitialState, StoreSnapshot, TodoSeed};
pub use store::{SetLabel, TodoStore};
