//! Text-entry drafts for the "new todo" field and the inline editor.
//!
//! Drafts hold what the user has typed but not yet committed. Only a commit
//! reaches the store; this is where surrounding whitespace is trimmed.

use crate::todo::{SetLabel, TodoId, TodoStore};

/// The "What needs to be done?" field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTodoDraft {
    text: String,
}

impl NewTodoDraft {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the typed text.
    pub fn stage(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Take the trimmed label to submit, clearing the field.
    ///
    /// Whitespace-only text yields `None` and is left in place.
    pub fn commit(&mut self) -> Option<String> {
        let label = self.text.trim();
        if label.is_empty() {
            return None;
        }
        let label = label.to_string();
        self.text.clear();
        Some(label)
    }
}

/// The inline editor of one todo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    id: TodoId,
    text: String,
}

impl EditDraft {
    /// Start editing from the todo's current label.
    pub fn new(id: TodoId, label: impl Into<String>) -> Self {
        Self {
            id,
            text: label.into(),
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn stage(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Write the draft through [`TodoStore::set_label`] and leave edit mode.
    ///
    /// An empty draft removes the todo.
    pub fn commit(self, store: &TodoStore) -> SetLabel {
        store.batch(|| {
            let outcome = store.set_label(self.id, &self.text);
            store.stop_editing();
            outcome
        })
    }

    /// Leave edit mode, discarding the draft.
    pub fn cancel(self, store: &TodoStore) {
        store.stop_editing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_commit_trims_and_clears() {
        let mut draft = NewTodoDraft::default();
        draft.stage("  Create a TODO for testing  ");
        assert_eq!(draft.commit().as_deref(), Some("Create a TODO for testing"));
        assert_eq!(draft.text(), "");
    }

    #[test]
    fn whitespace_only_draft_is_not_submitted() {
        let mut draft = NewTodoDraft::default();
        draft.stage("   \t ");
        assert_eq!(draft.commit(), None);
        assert_eq!(NewTodoDraft::default().commit(), None);
    }

    #[test]
    fn edit_commit_relabels_and_leaves_edit_mode() {
        let store = TodoStore::new();
        let id = store.add_todo("old");
        store.edit_todo(id);

        let mut draft = EditDraft::new(id, "old");
        draft.stage(" new ");
        assert_eq!(draft.commit(&store), SetLabel::Relabeled);
        assert_eq!(store.get(id).unwrap().label(), "new");
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn empty_edit_commit_removes() {
        let store = TodoStore::new();
        let id = store.add_todo("old");
        store.edit_todo(id);

        let mut draft = EditDraft::new(id, "old");
        draft.stage("");
        assert_eq!(draft.commit(&store), SetLabel::Removed);
        assert!(store.is_empty());
    }

    #[test]
    fn cancel_keeps_label() {
        let store = TodoStore::new();
        let id = store.add_todo("keep me");
        store.edit_todo(id);

        let mut draft = EditDraft::new(id, "keep me");
        draft.stage("");
        draft.cancel(&store);
        assert_eq!(store.get(id).unwrap().label(), "keep me");
        assert_eq!(store.editing(), None);
    }
}
