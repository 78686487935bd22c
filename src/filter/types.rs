//! Filter types
//!
//! Value objects passed from the filter inputs to the pagination coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire representation ("ASC" / "DESC")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// The opposite direction
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}', expected ASC or DESC")),
        }
    }
}

/// Complete set of list filters
///
/// A new value is produced on every committed change; consumers always receive
/// the whole set, never a partial update. Empty strings mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Free-text search term (committed, not the live input)
    #[serde(default)]
    pub search_term: String,
    /// Strategy category
    #[serde(default)]
    pub category: String,
    /// Strategy type
    #[serde(default)]
    pub strategy_type: String,
    /// Field to sort by
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort direction
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_sort_by() -> String {
    "updated_at".to_string()
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: String::new(),
            strategy_type: String::new(),
            sort_by: default_sort_by(),
            sort_order: SortOrder::default(),
        }
    }
}

impl FilterCriteria {
    /// Builder: set the search term
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Builder: set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set the strategy type
    #[must_use]
    pub fn with_strategy_type(mut self, strategy_type: impl Into<String>) -> Self {
        self.strategy_type = strategy_type.into();
        self
    }

    /// Builder: set the sort field and direction
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = sort_by.into();
        self.sort_order = order;
        self
    }

    /// Whether any narrowing filter (search, category, type) is active
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || !self.category.is_empty() || !self.strategy_type.is_empty()
    }
}

/// Emitted once per settled filter change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChanged {
    /// The merged criteria to reset the list with
    pub criteria: FilterCriteria,
}
