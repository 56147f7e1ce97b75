use crate::todo::{SetLabel, Todo, TodoId, TodoStore};

/// A per-item view onto a [`TodoStore`], for presentation code.
///
/// Every operation forwards to the store by id. `remove` consumes the
/// handle and `set_label` only hands it back while the todo still exists,
/// so a handle never outlives its todo through its own operations.
/// Handles are deliberately neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct TodoHandle<'s> {
    store: &'s TodoStore,
    id: TodoId,
}

impl<'s> TodoHandle<'s> {
    pub(crate) fn new(store: &'s TodoStore, id: TodoId) -> Self {
        Self { store, id }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    /// A copy of the todo's current state.
    pub fn todo(&self) -> Option<Todo> {
        self.store.get(self.id)
    }

    pub fn label(&self) -> Option<String> {
        self.store.with_todo(self.id, |todo| todo.label().to_string())
    }

    pub fn is_completed(&self) -> bool {
        self.store
            .with_todo(self.id, Todo::is_completed)
            .unwrap_or(false)
    }

    pub fn is_editing(&self) -> bool {
        self.store.is_editing(self.id)
    }

    /// See [`TodoStore::toggle`].
    pub fn toggle(&self, completed: Option<bool>) -> Option<bool> {
        self.store.toggle(self.id, completed)
    }

    /// Enter edit mode for this todo.
    pub fn edit(&self) -> bool {
        self.store.edit_todo(self.id)
    }

    /// Relabel; returns the handle back unless the todo was removed.
    pub fn set_label(self, label: &str) -> Option<Self> {
        match self.store.set_label(self.id, label) {
            SetLabel::Relabeled => Some(self),
            SetLabel::Removed | SetLabel::Missing => None,
        }
    }

    /// Ask the owning store to remove this todo.
    pub fn remove(self) -> bool {
        self.store.remove_todo(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_forwards_to_store() {
        let store = TodoStore::new();
        let id = store.add_todo("Buy a unicorn");
        let handle = store.todo(id).unwrap();

        assert_eq!(handle.toggle(None), Some(true));
        assert!(handle.is_completed());
        assert!(handle.edit());
        assert!(handle.is_editing());

        let handle = handle.set_label(" Buy two unicorns ").unwrap();
        assert_eq!(handle.label().as_deref(), Some("Buy two unicorns"));

        assert!(handle.remove());
        assert!(store.todo(id).is_none());
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn empty_label_consumes_handle() {
        let store = TodoStore::new();
        let id = store.add_todo("a");

        let handle = store.todo(id).unwrap();
        assert!(handle.set_label("").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn handles_follow_store_order() {
        let store = TodoStore::new();
        let ids = [store.add_todo("a"), store.add_todo("b")];
        let handle_ids: Vec<TodoId> = store.handles().iter().map(TodoHandle::id).collect();
        assert_eq!(handle_ids, ids);
    }
}
