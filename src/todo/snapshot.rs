//! Seeds and snapshots: the serializable forms of a [`TodoStore`](crate::TodoStore).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, StoreError};
use crate::todo::{Todo, TodoId};

/// One record used to seed a new store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoSeed {
    pub label: String,
    #[serde(default)]
    pub completed: bool,
}

impl TodoSeed {
    pub fn new(label: impl Into<String>, completed: bool) -> Self {
        Self {
            label: label.into(),
            completed,
        }
    }

    /// An active (not completed) seed.
    pub fn active(label: impl Into<String>) -> Self {
        Self::new(label, false)
    }

    /// A completed seed.
    pub fn completed(label: impl Into<String>) -> Self {
        Self::new(label, true)
    }
}

/// Initial contents for [`TodoStore::create`](crate::TodoStore::create).
///
/// Accepts the `{ "todos": [{ "label": ..., "completed": ... }] }` shape;
/// `completed` defaults to `false` and a missing `todos` means empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialState {
    #[serde(default)]
    pub todos: Vec<TodoSeed>,
}

impl InitialState {
    pub fn new(todos: Vec<TodoSeed>) -> Self {
        Self { todos }
    }

    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromIterator<TodoSeed> for InitialState {
    fn from_iter<I: IntoIterator<Item = TodoSeed>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Full store state, including ids and the editing marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub editing: Option<TodoId>,
}

impl StoreSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants a live store relies on.
    ///
    /// # Errors
    /// - `DuplicateId` when two todos share an id.
    /// - `EmptyLabel` when a todo has an empty label.
    /// - `UnknownEditingId` when `editing` names no todo in the snapshot.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.todos.len());
        for todo in &self.todos {
            if !seen.insert(todo.id()) {
                return Err(StoreError::DuplicateId(todo.id()));
            }
            if todo.label().is_empty() {
                return Err(StoreError::EmptyLabel(todo.id()));
            }
        }

        match self.editing {
            Some(id) if !seen.contains(&id) => Err(StoreError::UnknownEditingId(id)),
            _ => Ok(()),
        }
    }
}
