//! Remote table controller: owns pagination/sort/filter state, decides when a
//! fetch is issued, and commits only the settlement of the latest request.
//!
//! The controller never touches the network or a clock. Callers pass `now`
//! into every transition and hand issued [`FetchRequest`]s to a gateway; the
//! owner of the controller feeds settlements back through [`settle`].
//!
//! [`settle`]: RemoteTableController::settle

use std::time::{Duration, Instant};

use shared::{
    columns::{find_column, ColumnDescriptor},
    domain::{RequestId, SortDirection},
    error::TableError,
    protocol::{FetchRequest, TablePage, TableResult},
    query::{SortKey, TableQuery, DEFAULT_PAGE_SIZE},
};
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce_window: Duration,
    pub page_size: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Debouncing { deadline: Instant },
    Fetching { request_id: RequestId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Committed,
    Discarded,
}

enum FetchTiming {
    Immediate,
    Debounced,
    Unchanged,
}

pub fn page_count(filtered_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    filtered_count.div_ceil(page_size)
}

pub struct RemoteTableController {
    columns: Vec<ColumnDescriptor>,
    debounce_window: Duration,
    query: TableQuery,
    last_fetched: Option<TableQuery>,
    debounce_deadline: Option<Instant>,
    latest_request: Option<RequestId>,
    in_flight: Option<RequestId>,
    result: TableResult,
    page_count: u64,
}

impl RemoteTableController {
    pub fn new(columns: Vec<ColumnDescriptor>, settings: ControllerSettings) -> Self {
        Self {
            columns,
            debounce_window: settings.debounce_window,
            query: TableQuery::with_page_size(settings.page_size),
            last_fetched: None,
            debounce_deadline: None,
            latest_request: None,
            in_flight: None,
            result: TableResult::default(),
            page_count: 0,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn query(&self) -> &TableQuery {
        &self.query
    }

    pub fn result(&self) -> &TableResult {
        &self.result
    }

    pub fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn page_count(&self) -> u64 {
        self.page_count
    }

    pub fn latest_request_id(&self) -> Option<RequestId> {
        self.latest_request
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce_deadline
    }

    pub fn phase(&self) -> ControllerPhase {
        if let Some(deadline) = self.debounce_deadline {
            ControllerPhase::Debouncing { deadline }
        } else if let Some(request_id) = self.in_flight {
            ControllerPhase::Fetching { request_id }
        } else {
            ControllerPhase::Idle
        }
    }

    /// Issues the initial fetch. Later calls are no-ops until the query changes.
    pub fn start(&mut self, now: Instant) -> Option<FetchRequest> {
        self.reconcile(now)
    }

    /// Moves to `page_index`. Forward moves must stay below the known page
    /// count; anything else is ignored.
    pub fn goto_page(&mut self, page_index: u64, now: Instant) -> Option<FetchRequest> {
        let current = self.query.page_index;
        let can_navigate = match page_index.cmp(&current) {
            std::cmp::Ordering::Greater => page_index < self.page_count,
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => false,
        };
        if !can_navigate {
            debug!(page_index, page_count = self.page_count, "ignoring page move");
            return None;
        }
        self.query.page_index = page_index;
        self.reconcile(now)
    }

    /// Changes the page size while keeping the current top row on screen.
    pub fn set_page_size(&mut self, page_size: u64, now: Instant) -> Option<FetchRequest> {
        if page_size == 0 || page_size == self.query.page_size {
            return None;
        }
        let top_row_index = self.query.page_size * self.query.page_index;
        self.query.page_index = top_row_index / page_size;
        self.query.page_size = page_size;
        self.reconcile(now)
    }

    /// Header click. Without `multi` the column becomes the only sort key
    /// and cycles asc -> desc -> unsorted; with `multi` the column's key is
    /// appended, flipped or removed in place. Returns to the first page.
    pub fn toggle_sort(&mut self, column_id: &str, multi: bool, now: Instant) -> Option<FetchRequest> {
        if !find_column(&self.columns, column_id).is_some_and(|column| column.can_sort) {
            debug!(column_id, "ignoring sort on unsortable column");
            return None;
        }

        let keys = &mut self.query.sort_keys;
        let existing = keys.iter().position(|key| key.column_id == column_id);

        match existing {
            Some(index) if multi || keys.len() == 1 => {
                if keys[index].direction.is_desc() {
                    keys.remove(index);
                } else {
                    keys[index].direction = SortDirection::Desc;
                }
            }
            None if multi => keys.push(SortKey::asc(column_id)),
            _ => *keys = vec![SortKey::asc(column_id)],
        }

        self.query.page_index = 0;
        self.reconcile(now)
    }

    /// Sets or clears one column filter. An empty value removes it. Returns
    /// to the first page, so an edit made away from it fetches at once.
    pub fn set_filter(
        &mut self,
        column_id: &str,
        value: Option<String>,
        now: Instant,
    ) -> Option<FetchRequest> {
        if !find_column(&self.columns, column_id).is_some_and(|column| column.can_filter) {
            debug!(column_id, "ignoring filter on unfilterable column");
            return None;
        }

        let value = value.filter(|value| !value.is_empty());
        if self.query.filters.get(column_id) == value.as_ref() {
            return None;
        }
        match value {
            Some(value) => {
                self.query.filters.insert(column_id.to_string(), value);
            }
            None => {
                self.query.filters.remove(column_id);
            }
        }
        self.query.page_index = 0;
        self.reconcile(now)
    }

    /// Fires the debounced fetch once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<FetchRequest> {
        match self.debounce_deadline {
            Some(deadline) if deadline <= now => {
                self.debounce_deadline = None;
                Some(self.issue())
            }
            _ => None,
        }
    }

    /// Applies the outcome of a fetch. Only the latest issued request can
    /// commit; anything older is dropped without touching visible state.
    /// A page whose echoed id differs from its request ends the fetch but
    /// keeps the previous result.
    pub fn settle(
        &mut self,
        request_id: RequestId,
        outcome: Result<TablePage, TableError>,
    ) -> Settlement {
        if self.in_flight != Some(request_id) {
            debug!(
                request_id = request_id.0,
                latest = ?self.latest_request.map(|id| id.0),
                "discarding stale table response"
            );
            return Settlement::Discarded;
        }
        self.in_flight = None;

        if let Ok(TablePage {
            fetch_id: Some(echoed),
            ..
        }) = &outcome
        {
            if *echoed != request_id {
                debug!(
                    request_id = request_id.0,
                    echoed = echoed.0,
                    "dropping table response with mismatched fetch id"
                );
                return Settlement::Discarded;
            }
        }

        match outcome {
            Ok(page) => {
                let page_size = self
                    .last_fetched
                    .as_ref()
                    .map_or(self.query.page_size, |query| query.page_size);
                self.page_count = page_count(page.filtered_count, page_size);
                debug!(
                    request_id = request_id.0,
                    rows = page.rows.len(),
                    filtered = page.filtered_count,
                    total = page.total_count,
                    "committed table response"
                );
                self.result = TableResult::Loaded(page);
            }
            Err(err) => {
                warn!(request_id = request_id.0, "table fetch failed: {err}");
                self.page_count = 0;
                self.result = TableResult::Failed {
                    error: err.description(),
                };
            }
        }
        Settlement::Committed
    }

    fn reconcile(&mut self, now: Instant) -> Option<FetchRequest> {
        let timing = match &self.last_fetched {
            None => FetchTiming::Immediate,
            Some(prev) if self.query.paging_differs(prev) => FetchTiming::Immediate,
            Some(prev) if self.query.filters != prev.filters => FetchTiming::Debounced,
            Some(_) => FetchTiming::Unchanged,
        };

        self.debounce_deadline = None;
        match timing {
            FetchTiming::Immediate => Some(self.issue()),
            FetchTiming::Debounced => {
                self.debounce_deadline = Some(now + self.debounce_window);
                None
            }
            FetchTiming::Unchanged => None,
        }
    }

    fn issue(&mut self) -> FetchRequest {
        let request_id = self.latest_request.map_or(RequestId(1), RequestId::next);
        self.latest_request = Some(request_id);
        self.in_flight = Some(request_id);
        self.last_fetched = Some(self.query.clone());

        debug!(
            request_id = request_id.0,
            page_index = self.query.page_index,
            page_size = self.query.page_size,
            sort_keys = self.query.sort_keys.len(),
            filters = self.query.filters.len(),
            "issuing table fetch"
        );
        FetchRequest::build(request_id, &self.query, &self.columns)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
