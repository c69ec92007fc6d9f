//! Page slicing for transaction history

use serde::Serialize;

/// Rows shown per history page
pub const ROWS_PER_PAGE: usize = 10;

/// Number of pages needed for `len` rows
pub fn total_pages(len: usize) -> usize {
    len.div_ceil(ROWS_PER_PAGE)
}

/// Rows on 1-based `page`. Out-of-range pages (including 0) are empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(ROWS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = page.saturating_mul(ROWS_PER_PAGE).min(items.len());
    &items[start..end]
}

/// One page of rows plus the totals the pager needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<T>,
}

impl<T: Clone> Page<T> {
    pub fn from_slice(items: &[T], page: usize) -> Self {
        Self {
            page,
            total_pages: total_pages(items.len()),
            total_items: items.len(),
            items: paginate(items, page).to_vec(),
        }
    }
}
