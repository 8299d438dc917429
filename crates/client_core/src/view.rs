//! Presentation helpers shared by table views: the pagination window, the
//! summary row and header sort markers. Nothing here holds state.

use shared::{domain::SortDirection, protocol::TableResult, query::TableQuery};

pub const PAGE_SIZE_OPTIONS: [u64; 5] = [10, 20, 30, 40, 50];
pub const FETCH_ERROR_SUMMARY: &str = "Failed to fetch data.";
pub const FETCH_ERROR_MODAL: &str = "Failed to fetch data. Please try again!";
pub const LOADING_LABEL: &str = "Loading...";

/// How many neighbouring pages are shown on each side of the current one.
const PAGE_WINDOW_RADIUS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    First { target: Option<u64> },
    Prev { target: Option<u64> },
    Ellipsis,
    Page { index: u64, active: bool },
    Next { target: Option<u64> },
    Last { target: Option<u64> },
}

impl PageControl {
    pub fn label(&self) -> String {
        match self {
            PageControl::First { .. } => "«".to_string(),
            PageControl::Prev { .. } => "‹".to_string(),
            PageControl::Ellipsis => "…".to_string(),
            PageControl::Page { index, .. } => (index + 1).to_string(),
            PageControl::Next { .. } => "›".to_string(),
            PageControl::Last { .. } => "»".to_string(),
        }
    }

    /// Page to navigate to when clicked; `None` for disabled controls,
    /// ellipses and the active page.
    pub fn target(&self) -> Option<u64> {
        match *self {
            PageControl::First { target }
            | PageControl::Prev { target }
            | PageControl::Next { target }
            | PageControl::Last { target } => target,
            PageControl::Page { index, active } => (!active).then_some(index),
            PageControl::Ellipsis => None,
        }
    }
}

/// Builds the pagination bar. Page items are only emitted for pages in
/// `[0, page_count - 1]`; an ellipsis marks skipped pages on its side.
pub fn pagination_controls(page_index: u64, page_count: u64) -> Vec<PageControl> {
    let has_prev = page_index > 0 && page_count > 0;
    let has_next = page_index + 1 < page_count;
    let window_start = page_index.saturating_sub(PAGE_WINDOW_RADIUS);
    let window_end = page_index + PAGE_WINDOW_RADIUS;

    let mut controls = vec![
        PageControl::First {
            target: has_prev.then_some(0),
        },
        PageControl::Prev {
            target: has_prev.then(|| (page_index - 1).min(page_count - 1)),
        },
    ];

    if window_start > 0 && page_count > 0 {
        controls.push(PageControl::Ellipsis);
    }

    controls.extend(
        (window_start..=window_end)
            .filter(|index| *index < page_count)
            .map(|index| PageControl::Page {
                index,
                active: index == page_index,
            }),
    );

    if window_end + 1 < page_count {
        controls.push(PageControl::Ellipsis);
    }

    controls.push(PageControl::Next {
        target: has_next.then(|| page_index + 1),
    });
    controls.push(PageControl::Last {
        target: has_next.then(|| page_count - 1),
    });
    controls
}

pub fn page_label(page_index: u64, page_count: u64) -> String {
    format!("Page {} of {page_count}. Go to page:", page_index + 1)
}

/// Parses the 1-based "go to page" input. Empty input means the first page;
/// zero, negatives and garbage are ignored.
pub fn parse_page_input(input: &str) -> Option<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Some(0);
    }
    input.parse::<u64>().ok().and_then(|page| page.checked_sub(1))
}

pub fn summary_line(query: &TableQuery, result: &TableResult, loading: bool) -> String {
    if result.error().is_some() {
        return FETCH_ERROR_SUMMARY.to_string();
    }
    if loading {
        return LOADING_LABEL.to_string();
    }

    let offset = query.offset();
    let filtered = result.filtered_count();
    let total = result.total_count();
    let mut line = format!(
        "Showing {} to {} of {filtered} entries",
        offset + 1,
        offset + result.rows().len() as u64
    );
    if filtered < total {
        line.push_str(&format!(" (filtered from {total} total entries)"));
    }
    line
}

pub fn sort_marker(direction: Option<SortDirection>) -> &'static str {
    match direction {
        None => "⇅",
        Some(SortDirection::Asc) => "▲",
        Some(SortDirection::Desc) => "▼",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared::protocol::TablePage;

    use super::*;

    fn pages(controls: &[PageControl]) -> Vec<u64> {
        controls
            .iter()
            .filter_map(|control| match control {
                PageControl::Page { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn ellipses(controls: &[PageControl]) -> usize {
        controls
            .iter()
            .filter(|control| matches!(control, PageControl::Ellipsis))
            .count()
    }

    #[test]
    fn last_page_disables_next_and_last() {
        let controls = pagination_controls(9, 10);
        assert_eq!(pages(&controls), vec![7, 8, 9]);
        assert_eq!(controls.last(), Some(&PageControl::Last { target: None }));
        assert!(controls.contains(&PageControl::Next { target: None }));
        assert!(controls.contains(&PageControl::Prev { target: Some(8) }));
        assert_eq!(ellipses(&controls), 1);
    }

    #[test]
    fn first_page_disables_first_and_prev() {
        let controls = pagination_controls(0, 10);
        assert_eq!(controls[0], PageControl::First { target: None });
        assert_eq!(controls[1], PageControl::Prev { target: None });
        assert_eq!(pages(&controls), vec![0, 1, 2]);
        assert_eq!(ellipses(&controls), 1);
        assert_eq!(controls.last(), Some(&PageControl::Last { target: Some(9) }));
    }

    #[test]
    fn middle_page_shows_both_ellipses() {
        let controls = pagination_controls(5, 10);
        assert_eq!(pages(&controls), vec![3, 4, 5, 6, 7]);
        assert_eq!(ellipses(&controls), 2);
        assert_eq!(controls[2], PageControl::Ellipsis);
    }

    #[test]
    fn no_ellipsis_when_nothing_is_skipped() {
        assert_eq!(ellipses(&pagination_controls(2, 5)), 0);
        assert_eq!(pages(&pagination_controls(2, 5)), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn never_emits_pages_outside_range() {
        for page_count in 0..8 {
            for page_index in 0..10 {
                for control in pagination_controls(page_index, page_count) {
                    if let PageControl::Page { index, .. } = control {
                        assert!(index < page_count, "{page_index}/{page_count}: {index}");
                    }
                    if let Some(target) = control.target() {
                        assert!(target < page_count, "{page_index}/{page_count}: {target}");
                    }
                }
            }
        }
    }

    #[test]
    fn empty_result_has_no_page_items() {
        let controls = pagination_controls(0, 0);
        assert!(pages(&controls).is_empty());
        assert_eq!(ellipses(&controls), 0);
        assert!(controls.iter().all(|control| control.target().is_none()));
    }

    #[test]
    fn active_page_is_not_a_link() {
        let active = PageControl::Page {
            index: 4,
            active: true,
        };
        assert_eq!(active.target(), None);
        assert_eq!(active.label(), "5");
    }

    #[test]
    fn page_input_is_one_based() {
        assert_eq!(parse_page_input(""), Some(0));
        assert_eq!(parse_page_input(" 3 "), Some(2));
        assert_eq!(parse_page_input("0"), None);
        assert_eq!(parse_page_input("-1"), None);
        assert_eq!(parse_page_input("abc"), None);
    }

    #[test]
    fn summary_mentions_filtering_only_when_it_applies() {
        let mut query = TableQuery::with_page_size(10);
        query.page_index = 2;
        let result = TableResult::Loaded(TablePage {
            fetch_id: None,
            rows: vec![json!({}); 10],
            total_count: 599,
            filtered_count: 95,
        });
        assert_eq!(
            summary_line(&query, &result, false),
            "Showing 21 to 30 of 95 entries (filtered from 599 total entries)"
        );

        let unfiltered = TableResult::Loaded(TablePage {
            fetch_id: None,
            rows: vec![json!({}); 10],
            total_count: 95,
            filtered_count: 95,
        });
        assert_eq!(
            summary_line(&query, &unfiltered, false),
            "Showing 21 to 30 of 95 entries"
        );
        assert_eq!(summary_line(&query, &unfiltered, true), LOADING_LABEL);
    }

    #[test]
    fn summary_reports_errors_before_loading() {
        let failed = TableResult::Failed {
            error: "Network error".into(),
        };
        assert_eq!(
            summary_line(&TableQuery::default(), &failed, true),
            FETCH_ERROR_SUMMARY
        );
    }

    #[test]
    fn page_label_is_one_based() {
        assert_eq!(page_label(0, 10), "Page 1 of 10. Go to page:");
    }
}
