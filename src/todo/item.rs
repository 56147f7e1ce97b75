use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a todo item.
///
/// Generated once at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A single todo item.
///
/// Items are owned by exactly one [`TodoStore`](crate::TodoStore); only the
/// store changes them, so the fields are read through accessors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    label: String,
    #[serde(default)]
    completed: bool,
}

impl Todo {
    pub(crate) fn new(label: String, completed: bool) -> Self {
        Self {
            id: TodoId::new(),
            label,
            completed,
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Set the completion flag; returns whether it changed.
    pub(crate) fn set_completed(&mut self, completed: bool) -> bool {
        let changed = self.completed != completed;
        self.completed = completed;
        changed
    }

    /// Replace the label; returns whether it changed.
    pub(crate) fn set_label(&mut self, label: &str) -> bool {
        if self.label == label {
            return false;
        }
        self.label = label.to_string();
        true
    }
}
