use super::ports::Identifiable;
use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub struct PaginationResult {
    /// Number of items in the filtered set, ignoring the page window.
    pub total_items: usize,
    /// Id of the last item on this page, present only when more items follow.
    pub next_cursor: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(rename = "pagination_params")]
    pub pagination: PaginationResult,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationResult::default(),
        }
    }

    /// Converts every item while keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Resolves the requested page size. Non-positive limits select no items.
pub fn effective_limit(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_LIMIT,
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Cuts one page out of an already filtered, ordered set.
///
/// The page starts right after the item whose id equals `cursor`, or at the
/// beginning when no such item is in `filtered`.
pub fn paginate<T>(filtered: &[&T], cursor: Option<i64>, limit: Option<i64>) -> Page<T>
where
    T: Identifiable + Clone,
{
    let total_items = filtered.len();
    let start = cursor
        .and_then(|cursor| filtered.iter().position(|item| item.id() == cursor))
        .map_or(0, |index| index + 1);
    let end = start.saturating_add(effective_limit(limit)).min(total_items);

    let items: Vec<T> = filtered[start..end].iter().map(|item| (*item).clone()).collect();

    let next_cursor = if end < total_items {
        items.last().map(Identifiable::id)
    } else {
        None
    };

    Page {
        items,
        pagination: PaginationResult {
            total_items,
            next_cursor,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl Identifiable for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n).map(Row).collect()
    }

    fn ids(page: &Page<Row>) -> Vec<i64> {
        page.items.iter().map(|r| r.0).collect()
    }

    #[test]
    fn test_default_limit_applies() {
        let data = rows(25);
        let refs: Vec<&Row> = data.iter().collect();

        let page = paginate(&refs, None, None);
        assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());
        assert_eq!(page.pagination.total_items, 25);
        assert_eq!(page.pagination.next_cursor, Some(10));
    }

    #[test]
    fn test_cursor_resumes_after_item() {
        let data = rows(5);
        let refs: Vec<&Row> = data.iter().collect();

        let page = paginate(&refs, Some(2), Some(2));
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page.pagination.next_cursor, Some(4));

        let last = paginate(&refs, Some(4), Some(2));
        assert_eq!(ids(&last), vec![5]);
        assert_eq!(last.pagination.next_cursor, None);
    }

    #[test]
    fn test_unknown_cursor_starts_at_beginning() {
        let data = rows(5);
        let refs: Vec<&Row> = data.iter().collect();

        let unknown = paginate(&refs, Some(99), None);
        let fresh = paginate(&refs, None, None);
        assert_eq!(unknown, fresh);
    }

    #[test]
    fn test_exact_fit_has_no_next_cursor() {
        let data = rows(4);
        let refs: Vec<&Row> = data.iter().collect();

        let page = paginate(&refs, None, Some(4));
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.pagination.next_cursor, None);
    }

    #[test]
    fn test_non_positive_limit_returns_no_items() {
        let data = rows(3);
        let refs: Vec<&Row> = data.iter().collect();

        for limit in [0, -1, i64::MIN] {
            let page = paginate(&refs, None, Some(limit));
            assert!(page.items.is_empty());
            assert_eq!(page.pagination.total_items, 3);
            assert_eq!(page.pagination.next_cursor, None);
        }
    }

    #[test]
    fn test_huge_limit_does_not_overflow() {
        let data = rows(3);
        let refs: Vec<&Row> = data.iter().collect();

        let page = paginate(&refs, Some(1), Some(i64::MAX));
        assert_eq!(ids(&page), vec![2, 3]);
        assert_eq!(page.pagination.next_cursor, None);
    }

    #[test]
    fn test_walking_cursors_visits_every_item_once() {
        let data = rows(23);
        let refs: Vec<&Row> = data.iter().collect();

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = paginate(&refs, cursor, Some(4));
            seen.extend(ids(&page));
            match page.pagination.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(seen, (1..=23).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_serializes_pagination_params() {
        let page: Page<i64> = Page {
            items: vec![1, 2],
            pagination: PaginationResult {
                total_items: 5,
                next_cursor: Some(2),
            },
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination_params"]["total_items"], 5);
        assert_eq!(json["pagination_params"]["next_cursor"], 2);
    }
}
