//! Property-based tests for the todo store
//!
//! These tests drive the store with arbitrary operation sequences and check
//! the invariants that must hold after every step.

use proptest::prelude::*;
use std::collections::HashSet;
use todostore::{InitialState, TodoId, TodoSeed, TodoStore};

#[derive(Clone, Debug)]
enum Op {
    Add(String, bool),
    Toggle(usize),
    Relabel(usize, String),
    Remove(usize),
    Edit(usize),
    ToggleAll,
    ClearCompleted,
}

/// Generate arbitrary labels, blank ones included
fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z0-9 ]{1,24}",
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_label(), any::<bool>()).prop_map(|(label, done)| Op::Add(label, done)),
        2 => any::<usize>().prop_map(Op::Toggle),
        1 => (any::<usize>(), arb_label()).prop_map(|(i, label)| Op::Relabel(i, label)),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::Edit),
        1 => Just(Op::ToggleAll),
        1 => Just(Op::ClearCompleted),
    ]
}

fn pick(store: &TodoStore, index: usize) -> Option<TodoId> {
    store.with_todos(|todos| {
        if todos.is_empty() {
            None
        } else {
            Some(todos[index % todos.len()].id())
        }
    })
}

fn apply(store: &TodoStore, op: &Op) {
    match op {
        Op::Add(label, done) => {
            store.add_todo_with_status(label.clone(), *done);
        }
        Op::Toggle(i) => {
            if let Some(id) = pick(store, *i) {
                store.toggle(id, None);
            }
        }
        Op::Relabel(i, label) => {
            if let Some(id) = pick(store, *i) {
                store.set_label(id, label);
            }
        }
        Op::Remove(i) => {
            if let Some(id) = pick(store, *i) {
                store.remove_todo(id);
            }
        }
        Op::Edit(i) => {
            if let Some(id) = pick(store, *i) {
                store.edit_todo(id);
            }
        }
        Op::ToggleAll => {
            store.toggle_all();
        }
        Op::ClearCompleted => {
            store.clear_completed_todos();
        }
    }
}

fn assert_invariants(store: &TodoStore) -> Result<(), TestCaseError> {
    let todos = store.todos();
    let ids: HashSet<TodoId> = todos.iter().map(|todo| todo.id()).collect();
    prop_assert_eq!(ids.len(), todos.len());

    let active = todos.iter().filter(|todo| !todo.is_completed()).count();
    prop_assert_eq!(store.active_todos_count(), active);
    prop_assert_eq!(
        store.active_todos_count() + store.completed_todos().len(),
        todos.len()
    );
    prop_assert_eq!(
        store.all_completed(),
        todos.iter().all(|todo| todo.is_completed())
    );

    let in_order: Vec<TodoId> = todos
        .iter()
        .filter(|todo| todo.is_completed())
        .map(|todo| todo.id())
        .collect();
    let completed: Vec<TodoId> = store
        .completed_todos()
        .iter()
        .map(|todo| todo.id())
        .collect();
    prop_assert_eq!(completed, in_order);

    if let Some(editing) = store.editing() {
        prop_assert!(ids.contains(&editing));
    }
    Ok(())
}

proptest! {
    /// Property: Adds append in call order with pairwise distinct ids
    #[test]
    fn adds_append_in_order(labels in prop::collection::vec("[a-z]{1,12}", 0..40)) {
        let store = TodoStore::new();
        let ids: Vec<TodoId> = labels
            .iter()
            .map(|label| store.add_todo(label.clone()))
            .collect();

        prop_assert_eq!(store.len(), labels.len());
        let unique: HashSet<&TodoId> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());

        let stored: Vec<String> = store
            .todos()
            .iter()
            .map(|todo| todo.label().to_string())
            .collect();
        prop_assert_eq!(stored, labels);
        let stored_ids: Vec<TodoId> = store.todos().iter().map(|todo| todo.id()).collect();
        prop_assert_eq!(stored_ids, ids);
    }

    /// Property: Derived views stay consistent after any operation sequence
    #[test]
    fn views_stay_consistent(ops in prop::collection::vec(arb_op(), 0..60)) {
        let store = TodoStore::new();
        for op in &ops {
            apply(&store, op);
            assert_invariants(&store)?;
        }
    }

    /// Property: toggle_all alternates between all completed and all active
    #[test]
    fn toggle_all_alternates(
        seeds in prop::collection::vec(("[a-z]{1,8}", any::<bool>()), 1..20),
    ) {
        let store = TodoStore::create(
            seeds
                .into_iter()
                .map(|(label, done)| TodoSeed::new(label, done))
                .collect::<InitialState>(),
        );

        let first = store.toggle_all();
        prop_assert!(store.todos().iter().all(|todo| todo.is_completed() == first));
        let second = store.toggle_all();
        prop_assert_eq!(second, !first);
        prop_assert!(store.todos().iter().all(|todo| todo.is_completed() == second));
    }

    /// Property: Clearing completed todos twice equals clearing once
    #[test]
    fn clear_completed_is_idempotent(ops in prop::collection::vec(arb_op(), 0..40)) {
        let store = TodoStore::new();
        for op in &ops {
            apply(&store, op);
        }

        store.clear_completed_todos();
        let once = store.snapshot();
        prop_assert_eq!(store.clear_completed_todos(), 0);
        prop_assert_eq!(store.snapshot(), once);
        prop_assert!(store.todos().iter().all(|todo| !todo.is_completed()));
    }

    /// Property: An empty or blank label removes the todo
    #[test]
    fn blank_label_is_remove(
        labels in prop::collection::vec("[a-z]{1,8}", 1..10),
        index in any::<usize>(),
        blank in "[ \t]{0,4}",
    ) {
        let store = TodoStore::new();
        for label in &labels {
            store.add_todo(label.clone());
        }
        let id = pick(&store, index).unwrap();

        store.set_label(id, &blank);
        prop_assert_eq!(store.len(), labels.len() - 1);
        prop_assert!(store.get(id).is_none());
    }
}
