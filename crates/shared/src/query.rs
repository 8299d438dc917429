use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::SortDirection;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Pagination, sort and filter state that drives a fetch.
///
/// Filters live in an ordered map, so two queries holding the same filters
/// compare equal regardless of the order the user typed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    pub page_index: u64,
    pub page_size: u64,
    pub sort_keys: Vec<SortKey>,
    pub filters: BTreeMap<String, String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl TableQuery {
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            sort_keys: Vec::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page_index * self.page_size
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sort_keys
            .iter()
            .find(|key| key.column_id == column_id)
            .map(|key| key.direction)
    }

    pub fn filter_value(&self, column_id: &str) -> Option<&str> {
        self.filters.get(column_id).map(String::as_str)
    }

    /// True when page index, page size or sort keys differ. These changes
    /// are fetched without waiting for the debounce window.
    pub fn paging_differs(&self, other: &TableQuery) -> bool {
        self.page_index != other.page_index
            || self.page_size != other.page_size
            || self.sort_keys != other.sort_keys
    }
}
