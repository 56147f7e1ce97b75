use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::todo::{Todo, TodoStore};

/// Which todos the list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown filter `{0}`; expected all, active or completed")]
pub struct ParseFilterError(String);

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Filter for a route such as `/`, `/active` or `/completed`.
    ///
    /// Unknown routes show everything.
    pub fn from_path(path: &str) -> Self {
        let view = path.trim().trim_start_matches('/').trim_end_matches('/');
        view.parse().unwrap_or(Filter::All)
    }

    /// Route that selects this filter.
    pub fn path(self) -> &'static str {
        match self {
            Filter::All => "/",
            Filter::Active => "/active",
            Filter::Completed => "/completed",
        }
    }

    /// Link text in the footer.
    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// The todos this filter shows, in order.
    pub fn select(self, store: &TodoStore) -> Vec<Todo> {
        match self {
            Filter::All => store.todos(),
            Filter::Active => store.active_todos(),
            Filter::Completed => store.completed_todos(),
        }
    }
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::{InitialState, TodoSeed};

    #[test]
    fn routes_map_to_filters() {
        assert_eq!(Filter::from_path("/"), Filter::All);
        assert_eq!(Filter::from_path(""), Filter::All);
        assert_eq!(Filter::from_path("/active"), Filter::Active);
        assert_eq!(Filter::from_path("/completed/"), Filter::Completed);
        assert_eq!(Filter::from_path("/elsewhere"), Filter::All);

        for filter in Filter::ALL {
            assert_eq!(Filter::from_path(filter.path()), filter);
        }
    }

    #[test]
    fn strict_parse_rejects_unknown_names() {
        assert_eq!("Active".parse::<Filter>(), Ok(Filter::Active));
        assert_eq!(
            "done".parse::<Filter>(),
            Err(ParseFilterError("done".to_string()))
        );
    }

    #[test]
    fn select_uses_store_views() {
        let store = TodoStore::create(InitialState::new(vec![
            TodoSeed::completed("Taste JavaScript"),
            TodoSeed::active("Buy a unicorn"),
        ]));

        assert_eq!(Filter::All.select(&store).len(), 2);
        assert_eq!(Filter::Active.select(&store)[0].label(), "Buy a unicorn");
        assert_eq!(Filter::Completed.select(&store)[0].label(), "Taste JavaScript");
    }
}
