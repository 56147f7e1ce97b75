use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::app::{AppView, EditDraft, Filter, NewTodoDraft, TodoRow};
use crate::runtime::ReactiveRuntime;
use crate::signal::Effect;
use crate::store::Store;
use crate::todo::{SetLabel, TodoId, TodoStore};

/// UI-only state that never reaches the todo store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub filter: Filter,
    pub new_todo: NewTodoDraft,
    pub edit: Option<EditDraft>,
}

/// Composition root wiring UI events to a [`TodoStore`].
///
/// Holds the store plus the UI-only state (current filter and text drafts)
/// and turns both into an [`AppView`]. Event methods mirror what a renderer
/// would call from its input handlers.
#[derive(Clone)]
pub struct TodoApp {
    store: TodoStore,
    ui: Store<UiState>,
}

impl TodoApp {
    /// The UI state is allocated in the store's runtime so a single
    /// observer tracks both.
    pub fn new(store: TodoStore) -> Self {
        let ui = ReactiveRuntime::with_runtime(Rc::clone(store.runtime()), || {
            Store::new(UiState::default())
        });
        Self { store, ui }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.ui.read(|ui| ui.filter)
    }

    /// Follow a route such as `/active`.
    pub fn navigate(&self, path: &str) -> Filter {
        let filter = Filter::from_path(path);
        if self.ui.read(|ui| ui.filter) != filter {
            debug!(%filter, "switching filter");
            self.ui.update(|ui| ui.filter = filter);
        }
        filter
    }

    pub fn type_new_todo(&self, text: impl Into<String>) {
        let text = text.into();
        self.ui.update(|ui| ui.new_todo.stage(text));
    }

    /// Submit the new-todo field. Whitespace-only input adds nothing.
    pub fn submit_new_todo(&self) -> Option<TodoId> {
        let label = self.ui.update(|ui| ui.new_todo.commit())?;
        Some(self.store.add_todo(label))
    }

    /// Open the inline editor on a todo, closing any other editor.
    pub fn begin_edit(&self, id: TodoId) -> bool {
        let Some(todo) = self.store.get(id) else {
            warn!(todo_id = %id, "cannot edit unknown todo");
            return false;
        };

        self.store.batch(|| {
            self.ui
                .update(|ui| ui.edit = Some(EditDraft::new(id, todo.label())));
            self.store.edit_todo(id)
        })
    }

    pub fn type_edit(&self, text: impl Into<String>) {
        let text = text.into();
        self.ui.update(|ui| {
            if let Some(draft) = ui.edit.as_mut() {
                draft.stage(text);
            }
        });
    }

    /// Commit the inline editor (Enter). Returns `None` when nothing was open.
    pub fn commit_edit(&self) -> Option<SetLabel> {
        let draft = self.ui.update(|ui| ui.edit.take())?;
        if !self.store.is_editing(draft.id()) {
            debug!(todo_id = %draft.id(), "dropping edit draft for a closed editor");
            return None;
        }
        Some(draft.commit(&self.store))
    }

    /// Close the inline editor without saving (blur).
    pub fn cancel_edit(&self) {
        match self.ui.update(|ui| ui.edit.take()) {
            Some(draft) => draft.cancel(&self.store),
            None => self.store.stop_editing(),
        }
    }

    pub fn toggle(&self, id: TodoId) -> Option<bool> {
        self.store.toggle(id, None)
    }

    pub fn destroy(&self, id: TodoId) -> bool {
        self.store.batch(|| {
            let removed = self.store.remove_todo(id);
            self.release_stale_edit();
            removed
        })
    }

    pub fn toggle_all(&self) -> bool {
        self.store.toggle_all()
    }

    pub fn clear_completed(&self) -> usize {
        self.store.batch(|| {
            let cleared = self.store.clear_completed_todos();
            self.release_stale_edit();
            cleared
        })
    }

    /// Drop the edit draft once its todo is gone from the store.
    fn release_stale_edit(&self) {
        let stale = self.ui.read(|ui| {
            ui.edit
                .as_ref()
                .is_some_and(|draft| !self.store.contains(draft.id()))
        });
        if stale {
            self.ui.update(|ui| ui.edit = None);
        }
    }

    /// Build the current view model. Reads are tracked.
    pub fn view(&self) -> AppView {
        let editing = self.store.editing();
        let (filter, new_todo, edit_text) = self.ui.read(|ui| {
            (
                ui.filter,
                ui.new_todo.text().to_string(),
                // A draft only shows while the store still edits its todo
                ui.edit
                    .as_ref()
                    .filter(|draft| editing == Some(draft.id()))
                    .map(|draft| draft.text().to_string()),
            )
        });

        let rows: Vec<TodoRow> = filter
            .select(&self.store)
            .into_iter()
            .map(|todo| TodoRow {
                id: todo.id(),
                editing: editing == Some(todo.id()),
                label: todo.label().to_string(),
                completed: todo.is_completed(),
            })
            .collect();

        AppView {
            filter,
            show_main: !rows.is_empty(),
            rows,
            show_footer: !self.store.is_empty(),
            toggle_all_checked: self.store.all_completed(),
            active_count: self.store.active_todos_count(),
            show_clear_completed: self.store.completed_todos_count() > 0,
            new_todo,
            edit_text,
        }
    }

    /// Call `render` with a fresh view now and after every relevant change.
    pub fn render<F>(&self, render: F) -> Effect
    where
        F: Fn(&AppView) + 'static,
    {
        let app = self.clone();
        self.store.observe(move |_| render(&app.view()))
    }

    /// Log the full store state for inspection.
    pub fn debug_dump(&self) {
        match self.store.snapshot().to_json_pretty() {
            Ok(json) => info!(store = %json, "todo store state"),
            Err(err) => warn!(error = %err, "could not serialize todo store"),
        }
    }
}
