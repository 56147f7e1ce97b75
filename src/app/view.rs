use serde::Serialize;

use crate::app::Filter;
use crate::todo::TodoId;

/// One visible row of the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoRow {
    pub id: TodoId,
    pub label: String,
    pub completed: bool,
    pub editing: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AppView {
    pub filter: Filter,
    pub rows: Vec<TodoRow>,
    /// The list and the "mark all" toggle; hidden when no row is visible.
    pub show_main: bool,
    /// Count, filter links and "clear completed"; hidden for an empty store.
    pub show_footer: bool,
    pub toggle_all_checked: bool,
    pub active_count: usize,
    pub show_clear_completed: bool,
    pub new_todo: String,
    pub edit_text: Option<String>,
}

impl AppView {
    /// Footer counter text.
    pub fn items_left(&self) -> String {
        match self.active_count {
            1 => "1 item left".to_string(),
            n => format!("{n} items left"),
        }
    }
}
