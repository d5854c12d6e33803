//! Fixed-size pagination over a filtered product sequence.

use crate::catalog::Product;
use serde::Serialize;

/// Products per page.
pub const PAGE_SIZE: usize = 12;

/// Page links shown before the window collapses into gaps.
const MAX_VISIBLE_PAGES: usize = 7;

/// Pages shown on each side of the current one in a collapsed window.
const WINDOW_RADIUS: usize = 3;

/// One page of a product sequence. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a> {
    pub items: &'a [Product],
    /// 1-based page number
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl Page<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based position of the first item in the whole sequence.
    pub fn first_item_number(&self) -> usize {
        (self.page_number - 1) * self.page_size + 1
    }
}

/// Number of pages needed for `total_items`.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamps `page` into `[1, total_pages]`; returns 1 when there are no pages.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices `items` into the requested page.
///
/// Returns `None` when there is nothing to page through. Out-of-range page
/// numbers are clamped to the first or last page.
pub fn paginate(items: &[Product], page: usize, page_size: usize) -> Option<Page<'_>> {
    let total_pages = total_pages(items.len(), page_size);
    if total_pages == 0 {
        return None;
    }

    let page_number = clamp_page(page, total_pages);
    let start = (page_number - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Some(Page {
        items: &items[start..end],
        page_number,
        page_size,
        total_items: items.len(),
        total_pages,
        has_previous_page: page_number > 1,
        has_next_page: page_number < total_pages,
    })
}

/// An entry in a page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMarker {
    Number(usize),
    Gap,
}

/// Page links to display around `current`.
///
/// Up to seven pages are all listed. Beyond that, the pages within three of
/// the current one are shown, plus the first and last page, with a gap
/// wherever pages are skipped.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageMarker> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(PageMarker::Number).collect();
    }

    let current = clamp_page(current, total_pages);
    let start = current.saturating_sub(WINDOW_RADIUS).max(1);
    let end = (current + WINDOW_RADIUS).min(total_pages);

    let mut markers = Vec::with_capacity(MAX_VISIBLE_PAGES + 4);
    if start > 1 {
        markers.push(PageMarker::Number(1));
        if start > 2 {
            markers.push(PageMarker::Gap);
        }
    }

    markers.extend((start..=end).map(PageMarker::Number));

    if end < total_pages {
        if end < total_pages - 1 {
            markers.push(PageMarker::Gap);
        }
        markers.push(PageMarker::Number(total_pages));
    }

    markers
}
