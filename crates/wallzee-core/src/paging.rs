//! Fixed-size pagination with a windowed page selector.
//!
//! # Design
//! - Pages are 1-based; out-of-range requests are clamped, never rejected.
//! - An empty list still has one (empty) page.
//! - The selector shows at most five consecutive page numbers plus the first
//!   and last page, separated by ellipses when there is a gap.

/// Default number of wallpapers per page.
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Width of the consecutive page-number window.
const WINDOW: usize = 5;

/// A single page cut from a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
    /// Clamped current page.
    pub current: usize,
}

/// Entry rendered by the page selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageToken {
    /// A clickable page number.
    Page(usize),
    /// A gap between numbers.
    Ellipsis,
}

/// Number of pages needed for `len` items.
#[must_use]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Clamp a requested page into `[1, total]`.
#[must_use]
pub fn clamp_page(requested: usize, total: usize) -> usize {
    requested.clamp(1, total.max(1))
}

/// Cut page `requested` out of `items`.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested: usize) -> Page<T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let current = clamp_page(requested, total);
    let start = (current - 1) * size;
    let end = (start + size).min(items.len());
    let slice = items.get(start..end).unwrap_or_default();
    Page {
        items: slice.to_vec(),
        total_pages: total,
        current,
    }
}

/// Next page, stopping at the last one.
#[must_use]
pub fn next_page(current: usize, total: usize) -> usize {
    clamp_page(current.saturating_add(1), total)
}

/// Previous page, stopping at the first one.
#[must_use]
pub fn prev_page(current: usize, total: usize) -> usize {
    clamp_page(current.saturating_sub(1), total)
}

/// Whether page controls should be shown at all.
#[must_use]
pub const fn needs_pagination(len: usize, page_size: usize) -> bool {
    len > page_size
}

/// Page selector entries for `current` out of `total`.
#[must_use]
pub fn page_window(current: usize, total: usize) -> Vec<PageToken> {
    let total = total.max(1);
    let current = clamp_page(current, total);
    let span = WINDOW - 1;
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + span).min(total);
    if end - start < span {
        start = end.saturating_sub(span).max(1);
    }

    let mut tokens = Vec::with_capacity(WINDOW + 4);
    if start > 1 {
        tokens.push(PageToken::Page(1));
        if start > 2 {
            tokens.push(PageToken::Ellipsis);
        }
    }
    tokens.extend((start..=end).map(PageToken::Page));
    if end < total {
        if end + 1 < total {
            tokens.push(PageToken::Ellipsis);
        }
        tokens.push(PageToken::Page(total));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageToken::{Ellipsis, Page as P};

    #[test]
    fn eighty_five_items_make_three_pages() {
        let items: Vec<u32> = (0..85).collect();
        let first = paginate(&items, 40, 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 40);
        let last = paginate(&items, 40, 3);
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items.first(), Some(&80));
    }

    #[test]
    fn pagination_is_idempotent() {
        let items: Vec<u32> = (0..85).collect();
        for page in 0..6 {
            assert_eq!(paginate(&items, 40, page), paginate(&items, 40, page));
        }
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(paginate(&items, 4, 0).current, 1);
        let beyond = paginate(&items, 4, 99);
        assert_eq!(beyond.current, 3);
        assert_eq!(beyond.items, vec![8, 9]);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let page = paginate::<u32>(&[], 40, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!needs_pagination(0, 40));
        assert!(!needs_pagination(40, 40));
        assert!(needs_pagination(41, 40));
    }

    #[test]
    fn next_and_prev_stop_at_bounds() {
        assert_eq!(next_page(3, 3), 3);
        assert_eq!(next_page(1, 3), 2);
        assert_eq!(prev_page(1, 3), 1);
        assert_eq!(prev_page(2, 3), 1);
    }

    #[test]
    fn window_for_small_totals_lists_every_page() {
        assert_eq!(page_window(1, 1), vec![P(1)]);
        assert_eq!(page_window(2, 3), vec![P(1), P(2), P(3)]);
    }

    #[test]
    fn window_adds_edges_and_ellipses() {
        assert_eq!(
            page_window(1, 10),
            vec![P(1), P(2), P(3), P(4), P(5), Ellipsis, P(10)]
        );
        assert_eq!(
            page_window(6, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), P(7), P(8), Ellipsis, P(10)]
        );
        assert_eq!(
            page_window(10, 10),
            vec![P(1), Ellipsis, P(6), P(7), P(8), P(9), P(10)]
        );
        assert_eq!(
            page_window(4, 7),
            vec![P(1), P(2), P(3), P(4), P(5), P(6), P(7)]
        );
    }
}
