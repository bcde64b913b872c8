//! Page slicing for table views

use serde::Serialize;

/// One page of a larger table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    /// Rows on this page
    pub items: &'a [T],
    /// 1-based page number after clamping
    pub page: usize,
    /// Rows per page
    pub per_page: usize,
    /// Rows in the whole table
    pub total_items: usize,
    /// Number of pages, at least 1
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    /// 1-based index of the first row on the page, 0 for an empty table
    #[must_use]
    pub const fn first_row(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last row on the page
    #[must_use]
    pub const fn last_row(&self) -> usize {
        (self.page - 1) * self.per_page + self.items.len()
    }
}

/// Slice `items` into the requested page
///
/// `page` is 1-based and clamped into `1..=total_pages`; a `per_page` of 0
/// is read as 1.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);

    Page {
        items: &items[start..end],
        page,
        per_page,
        total_items,
        total_pages,
    }
}
