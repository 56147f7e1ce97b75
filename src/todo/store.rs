use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::runtime::ReactiveRuntime;
use crate::signal::{Effect, Memo, Signal};
use crate::store::{Subscribers, Subscription};
use crate::todo::{InitialState, StoreSnapshot, Todo, TodoHandle, TodoId};

/// Outcome of [`TodoStore::set_label`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetLabel {
    /// The todo now carries the trimmed label.
    Relabeled,
    /// The trimmed label was empty, so the todo was removed.
    Removed,
    /// No todo with that id exists.
    Missing,
}

/// The observable store behind a todo list.
///
/// Owns an ordered list of [`Todo`]s and the single "being edited" marker,
/// exposes derived views over them and is the only place items are added,
/// changed or removed. Clones are handles to the same store.
///
/// Reads are tracked: reading a view inside an [`Effect`] (see
/// [`TodoStore::observe`]) re-runs that effect after any mutation touching
/// what it read. Whole-store subscribers (see [`TodoStore::subscribe`]) are
/// called exactly once after every mutation that changed something.
///
/// # Examples
///
/// ```
/// use todostore::{InitialState, TodoSeed, TodoStore};
///
/// let store = TodoStore::create(InitialState::new(vec![
///     TodoSeed::completed("Taste JavaScript"),
///     TodoSeed::active("Buy a unicorn"),
/// ]));
///
/// assert_eq!(store.active_todos_count(), 1);
/// assert!(!store.all_completed());
///
/// store.toggle_all();
/// assert!(store.all_completed());
///
/// store.clear_completed_todos();
/// assert!(store.is_empty());
/// ```
#[derive(Clone)]
pub struct TodoStore {
    todos: Signal<Vec<Todo>>,
    editing: Signal<Option<TodoId>>,
    active_todos: Memo<Vec<Todo>>,
    completed_todos: Memo<Vec<Todo>>,
    all_completed: Memo<bool>,
    active_todos_count: Memo<usize>,
    subscribers: Subscribers<TodoStore>,
}

impl TodoStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    /// A store seeded with `initial`, in order, with nothing being edited.
    ///
    /// Labels are taken as given.
    pub fn create(initial: InitialState) -> Self {
        let todos = initial
            .todos
            .into_iter()
            .map(|seed| Todo::new(seed.label, seed.completed))
            .collect();
        Self::from_parts(todos, None)
    }

    /// A store seeded from the JSON form of [`InitialState`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::create(InitialState::from_json(json)?))
    }

    /// Restore a store from a snapshot, ids included.
    ///
    /// # Errors
    /// Fails when the snapshot breaks a store invariant; see
    /// [`StoreSnapshot::validate`].
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self::from_parts(snapshot.todos, snapshot.editing))
    }

    fn from_parts(todos: Vec<Todo>, editing: Option<TodoId>) -> Self {
        debug!(todos = todos.len(), "creating todo store");

        let todos = Signal::new(todos);
        let editing = Signal::new(editing);

        let active_todos: Memo<Vec<Todo>> = todos.map(|todos| {
            todos
                .iter()
                .filter(|todo| !todo.is_completed())
                .cloned()
                .collect()
        });
        let completed_todos: Memo<Vec<Todo>> = todos.map(|todos| {
            todos
                .iter()
                .filter(|todo| todo.is_completed())
                .cloned()
                .collect()
        });
        // Vacuously true for an empty list
        let all_completed: Memo<bool> = todos.map(|todos| todos.iter().all(Todo::is_completed));
        let active_todos_count = {
            let active = active_todos.clone();
            Memo::in_runtime(todos.runtime(), move || active.with(Vec::len))
        };

        Self {
            todos,
            editing,
            active_todos,
            completed_todos,
            all_completed,
            active_todos_count,
            subscribers: Subscribers::new(),
        }
    }

    // ---- reads ----------------------------------------------------------

    /// All todos in insertion order.
    pub fn todos(&self) -> Vec<Todo> {
        self.todos.get()
    }

    /// Read all todos without cloning them.
    pub fn with_todos<R>(&self, f: impl FnOnce(&[Todo]) -> R) -> R {
        self.todos.with(|todos| f(todos))
    }

    /// Todos not yet completed, in order.
    pub fn active_todos(&self) -> Vec<Todo> {
        self.active_todos.get()
    }

    /// Completed todos, in order.
    pub fn completed_todos(&self) -> Vec<Todo> {
        self.completed_todos.get()
    }

    /// Whether every todo is completed. `true` for an empty store.
    pub fn all_completed(&self) -> bool {
        self.all_completed.get()
    }

    pub fn active_todos_count(&self) -> usize {
        self.active_todos_count.get()
    }

    pub fn completed_todos_count(&self) -> usize {
        self.completed_todos.with(Vec::len)
    }

    /// The todo currently being edited, if any.
    pub fn editing(&self) -> Option<TodoId> {
        self.editing.get()
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.editing.with(|editing| *editing == Some(id))
    }

    pub fn len(&self) -> usize {
        self.todos.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.with_todo(id, Todo::clone)
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.with_todo(id, |_| ()).is_some()
    }

    pub(crate) fn with_todo<R>(&self, id: TodoId, f: impl FnOnce(&Todo) -> R) -> Option<R> {
        self.todos
            .with(|todos| todos.iter().find(|todo| todo.id() == id).map(f))
    }

    /// A handle on one todo, if it exists.
    pub fn todo(&self, id: TodoId) -> Option<TodoHandle<'_>> {
        self.contains(id).then(|| TodoHandle::new(self, id))
    }

    /// Handles on every todo, in order.
    pub fn handles(&self) -> Vec<TodoHandle<'_>> {
        self.todos.with(|todos| {
            todos
                .iter()
                .map(|todo| TodoHandle::new(self, todo.id()))
                .collect()
        })
    }

    /// Current state, ids included.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            todos: self.todos(),
            editing: self.editing(),
        }
    }

    // ---- observation ----------------------------------------------------

    /// Call `callback` once after every mutation that changed the store.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&TodoStore) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Run `f` now and again after every mutation affecting what it read.
    pub fn observe<F>(&self, f: F) -> Effect
    where
        F: Fn(&TodoStore) + 'static,
    {
        let store = self.clone();
        Effect::in_runtime(self.todos.runtime(), move || f(&store))
    }

    /// The runtime every signal and memo of this store lives in.
    pub(crate) fn runtime(&self) -> &Rc<ReactiveRuntime> {
        self.todos.runtime()
    }

    /// Run `f` with effect execution deferred until it returns.
    ///
    /// Subscribers are still called once per mutation inside `f`.
    pub fn batch<R>(&self, f: impl FnOnce() -> R) -> R {
        self.todos.runtime().batch(f)
    }

    // ---- mutations ------------------------------------------------------

    /// Append an active todo. The label is stored as given.
    pub fn add_todo(&self, label: impl Into<String>) -> TodoId {
        self.add_todo_with_status(label, false)
    }

    /// Append a todo with an explicit completion flag.
    pub fn add_todo_with_status(&self, label: impl Into<String>, completed: bool) -> TodoId {
        let todo = Todo::new(label.into(), completed);
        let id = todo.id();

        self.todos.update(|todos| todos.push(todo));
        debug!(todo_id = %id, completed, "added todo");
        self.notify();
        id
    }

    /// Remove a todo. Returns `false` when it was not present.
    ///
    /// Clears the editing marker if it pointed at the removed todo.
    pub fn remove_todo(&self, id: TodoId) -> bool {
        let removed = self.transact(|| {
            let removed = self.todos.update_if(|todos| {
                let before = todos.len();
                todos.retain(|todo| todo.id() != id);
                todos.len() != before
            });
            if removed {
                self.release_editing_if(|editing| editing == id);
            }
            removed
        });

        if removed {
            debug!(todo_id = %id, "removed todo");
            self.notify();
        }
        removed
    }

    /// Remove every completed todo, keeping the order of the rest.
    ///
    /// Returns how many were removed.
    pub fn clear_completed_todos(&self) -> usize {
        let removed = self.transact(|| {
            let mut removed = 0;
            self.todos.update_if(|todos| {
                let before = todos.len();
                todos.retain(|todo| !todo.is_completed());
                removed = before - todos.len();
                removed > 0
            });
            if removed > 0 {
                let todos = &self.todos;
                self.release_editing_if(|editing| {
                    todos.with_untracked(|todos| todos.iter().all(|todo| todo.id() != editing))
                });
            }
            removed
        });

        if removed > 0 {
            debug!(removed, "cleared completed todos");
            self.notify();
        }
        removed
    }

    /// Force every todo to `!all_completed()`.
    ///
    /// Repeated calls alternate between all completed and all active.
    /// Returns the completion state applied.
    pub fn toggle_all(&self) -> bool {
        let (target, changed) = self.transact(|| {
            let target = !self.all_completed.get();
            let changed = self.todos.update_if(|todos| {
                todos
                    .iter_mut()
                    .fold(false, |changed, todo| todo.set_completed(target) || changed)
            });
            (target, changed)
        });

        if changed {
            debug!(completed = target, "toggled all todos");
            self.notify();
        }
        target
    }

    /// Set a todo's completion flag, or flip it when `completed` is `None`.
    ///
    /// Returns the new flag, or `None` when the todo does not exist.
    pub fn toggle(&self, id: TodoId, completed: Option<bool>) -> Option<bool> {
        let mut applied = None;
        let changed = self.todos.update_if(|todos| {
            let Some(todo) = todos.iter_mut().find(|todo| todo.id() == id) else {
                return false;
            };
            let target = completed.unwrap_or(!todo.is_completed());
            applied = Some(target);
            todo.set_completed(target)
        });

        if changed {
            debug!(todo_id = %id, completed = ?applied, "toggled todo");
            self.notify();
        }
        applied
    }

    /// Relabel a todo with `label` trimmed; an empty result removes it.
    pub fn set_label(&self, id: TodoId, label: &str) -> SetLabel {
        let label = label.trim();
        if label.is_empty() {
            return if self.remove_todo(id) {
                SetLabel::Removed
            } else {
                SetLabel::Missing
            };
        }

        let mut found = false;
        let changed = self.todos.update_if(|todos| {
            match todos.iter_mut().find(|todo| todo.id() == id) {
                Some(todo) => {
                    found = true;
                    todo.set_label(label)
                }
                None => false,
            }
        });

        if changed {
            debug!(todo_id = %id, "relabeled todo");
            self.notify();
        }
        if found {
            SetLabel::Relabeled
        } else {
            SetLabel::Missing
        }
    }

    /// Put a todo into edit mode, or leave edit mode with `None`.
    ///
    /// Only one todo is edited at a time. Naming an unknown todo changes
    /// nothing and returns `false`.
    pub fn edit_todo(&self, id: impl Into<Option<TodoId>>) -> bool {
        let id = id.into();
        if let Some(id) = id {
            let exists = self
                .todos
                .with_untracked(|todos| todos.iter().any(|todo| todo.id() == id));
            if !exists {
                debug!(todo_id = %id, "ignoring edit request for unknown todo");
                return false;
            }
        }

        let changed = self.editing.update_if(|editing| {
            let changed = *editing != id;
            *editing = id;
            changed
        });

        if changed {
            debug!(editing = ?id, "editing marker changed");
            self.notify();
        }
        true
    }

    /// Leave edit mode.
    pub fn stop_editing(&self) {
        self.edit_todo(None);
    }

    fn release_editing_if(&self, released: impl Fn(TodoId) -> bool) {
        self.editing.update_if(|editing| match *editing {
            Some(id) if released(id) => {
                *editing = None;
                true
            }
            _ => false,
        });
    }

    /// Run a multi-step mutation as one untracked batch.
    fn transact<R>(&self, f: impl FnOnce() -> R) -> R {
        let runtime = self.todos.runtime();
        runtime.batch(|| runtime.untrack(f))
    }

    fn notify(&self) {
        self.subscribers.notify(self);
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<InitialState> for TodoStore {
    fn from(initial: InitialState) -> Self {
        Self::create(initial)
    }
}

impl fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.todos.runtime().untrack(|| self.snapshot());
        f.debug_struct("TodoStore")
            .field("todos", &snapshot.todos)
            .field("editing", &snapshot.editing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::TodoSeed;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn seeded() -> TodoStore {
        TodoStore::create(InitialState::new(vec![
            TodoSeed::completed("Taste JavaScript"),
            TodoSeed::active("Buy a unicorn"),
        ]))
    }

    fn labels(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(Todo::label).collect()
    }

    fn count_notifications(store: &TodoStore) -> (Rc<Cell<usize>>, Subscription) {
        let calls = Rc::new(Cell::new(0));
        let subscription = store.subscribe({
            let calls = Rc::clone(&calls);
            move |_| calls.set(calls.get() + 1)
        });
        (calls, subscription)
    }

    #[test]
    fn seeded_store_derives_views() {
        let store = seeded();

        assert_eq!(store.len(), 2);
        assert_eq!(store.active_todos_count(), 1);
        assert_eq!(store.completed_todos_count(), 1);
        assert!(!store.all_completed());
        assert_eq!(labels(&store.active_todos()), vec!["Buy a unicorn"]);
        assert_eq!(labels(&store.completed_todos()), vec!["Taste JavaScript"]);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn empty_store_is_vacuously_all_completed() {
        let store = TodoStore::new();
        assert!(store.all_completed());
        assert_eq!(store.active_todos_count(), 0);
    }

    #[test]
    fn add_todo_appends_with_fresh_ids() {
        let store = TodoStore::new();
        let a = store.add_todo("first");
        let b = store.add_todo_with_status("second", true);
        let c = store.add_todo("first");

        assert_ne!(a, b);
        assert_ne!(a, c);
        let todos = store.todos();
        assert_eq!(labels(&todos), vec!["first", "second", "first"]);
        assert_eq!(todos[1].id(), b);
        assert!(todos[1].is_completed());
    }

    #[test]
    fn add_todo_keeps_whitespace_at_store_boundary() {
        let store = TodoStore::new();
        let id = store.add_todo("   ");
        assert_eq!(store.get(id).map(|todo| todo.label().to_string()), Some("   ".to_string()));
    }

    #[test]
    fn toggle_flips_or_forces() {
        let store = TodoStore::new();
        let id = store.add_todo("a");

        assert_eq!(store.toggle(id, None), Some(true));
        assert_eq!(store.toggle(id, None), Some(false));
        assert_eq!(store.toggle(id, Some(false)), Some(false));
        assert_eq!(store.toggle(TodoId::new(), None), None);
    }

    #[test]
    fn toggle_all_forces_a_single_value() {
        let store = seeded();

        assert!(store.toggle_all());
        assert!(store.todos().iter().all(Todo::is_completed));
        assert!(store.all_completed());

        assert!(!store.toggle_all());
        assert!(store.todos().iter().all(|todo| !todo.is_completed()));
    }

    #[test]
    fn clear_completed_keeps_order_and_is_idempotent() {
        let store = TodoStore::new();
        store.add_todo("a");
        store.add_todo_with_status("b", true);
        store.add_todo("c");
        store.add_todo_with_status("d", true);

        assert_eq!(store.clear_completed_todos(), 2);
        assert_eq!(labels(&store.todos()), vec!["a", "c"]);
        assert_eq!(store.clear_completed_todos(), 0);
        assert_eq!(labels(&store.todos()), vec!["a", "c"]);
    }

    #[test]
    fn set_label_trims_and_empty_removes() {
        let store = TodoStore::new();
        let id = store.add_todo("old");

        assert_eq!(store.set_label(id, "  new  "), SetLabel::Relabeled);
        assert_eq!(store.get(id).map(|todo| todo.label().to_string()), Some("new".to_string()));

        assert_eq!(store.set_label(id, "   "), SetLabel::Removed);
        assert!(store.is_empty());
        assert_eq!(store.set_label(id, "again"), SetLabel::Missing);
    }

    #[test]
    fn remove_absent_todo_is_a_noop() {
        let store = seeded();
        let (calls, _subscription) = count_notifications(&store);

        assert!(!store.remove_todo(TodoId::new()));
        assert_eq!(store.len(), 2);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn single_editing_marker() {
        let store = seeded();
        let ids: Vec<TodoId> = store.todos().iter().map(Todo::id).collect();

        assert!(store.edit_todo(ids[0]));
        assert!(store.is_editing(ids[0]));

        assert!(store.edit_todo(ids[1]));
        assert!(!store.is_editing(ids[0]));
        assert_eq!(store.editing(), Some(ids[1]));

        assert!(!store.edit_todo(TodoId::new()));
        assert_eq!(store.editing(), Some(ids[1]));

        store.stop_editing();
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn removing_the_edited_todo_clears_the_marker() {
        let store = seeded();
        let completed = store.completed_todos()[0].id();
        let active = store.active_todos()[0].id();

        store.edit_todo(completed);
        store.clear_completed_todos();
        assert_eq!(store.editing(), None);

        store.edit_todo(active);
        store.remove_todo(active);
        assert_eq!(store.editing(), None);
    }

    #[test]
    fn subscribers_hear_each_change_once() {
        let store = seeded();
        let (calls, subscription) = count_notifications(&store);

        store.add_todo("c");
        store.toggle_all();
        store.clear_completed_todos();
        assert_eq!(calls.get(), 3);

        // Nothing left to change
        store.clear_completed_todos();
        store.toggle_all();
        store.stop_editing();
        assert_eq!(calls.get(), 3);

        subscription.unsubscribe();
        store.add_todo("d");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn clear_completed_is_atomic_for_observers() {
        let store = TodoStore::new();
        for label in ["a", "b", "c"] {
            store.add_todo_with_status(label, true);
        }
        store.add_todo("d");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let _effect = store.observe({
            let seen = Rc::clone(&seen);
            move |store| seen.borrow_mut().push(store.len())
        });

        store.clear_completed_todos();
        assert_eq!(*seen.borrow(), vec![4, 1]);
    }

    #[test]
    fn observers_rerun_only_for_what_they_read() {
        let store = seeded();
        let counts = Rc::new(RefCell::new(Vec::new()));

        let _effect = store.observe({
            let counts = Rc::clone(&counts);
            move |store| counts.borrow_mut().push(store.active_todos_count())
        });

        let first = store.todos()[0].id();
        store.edit_todo(first);
        assert_eq!(*counts.borrow(), vec![1]);

        store.toggle(first, Some(false));
        assert_eq!(*counts.borrow(), vec![1, 2]);
    }

    #[test]
    fn snapshot_round_trips_ids_and_editing() {
        let store = seeded();
        let id = store.todos()[1].id();
        store.edit_todo(id);

        let restored = TodoStore::from_snapshot(store.snapshot()).unwrap();
        assert_eq!(restored.todos(), store.todos());
        assert_eq!(restored.editing(), Some(id));
    }
}
