//! Page slicing and page metadata

use serde::Deserialize;
use serde::Serialize;

/// One page of rows with pagination information.
///
/// Pages are 1-based. A page past the end, page 0 and a page size of 0 all
/// produce an empty page; the metadata still reports the real totals.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::paginate;
///
/// let rows: Vec<u32> = (1..=23).collect();
/// let page = paginate(&rows, 3, 10);
///
/// assert_eq!(page.data(), &[21, 22, 23]);
/// assert_eq!(page.total_pages(), 3);
/// assert_eq!(page.range(), Some((21, 23)));
/// assert!(!page.has_next());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    data: Vec<T>,
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
}

impl<T> Page<T> {
    /// Returns the rows on this page.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the page and returns its rows.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns the requested page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the requested page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the number of rows across all pages.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Returns the number of pages.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the number of rows on this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// Returns the 1-based positions of the first and last row on this page,
    /// as shown in a "showing x to y of n" footer.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.data.is_empty() {
            return None;
        }
        let start = (self.page - 1) * self.page_size + 1;
        Some((start, start + self.data.len() - 1))
    }

    /// Returns the pagination state without the rows.
    pub fn state(&self) -> PaginationState {
        PaginationState {
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    /// Maps every row on the page, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Pagination metadata, detached from any rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Current page, 1-based.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Rows across all pages.
    pub total_items: usize,
    /// Number of pages.
    pub total_pages: usize,
}

impl PaginationState {
    /// Creates a state for `total_items` rows, starting at page 1.
    pub fn new(page_size: usize, total_items: usize) -> Self {
        Self {
            page: 1,
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
        }
    }

    /// Updates the row count, keeping the current page in range.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.total_pages = total_pages(total_items, self.page_size);
        self.page = clamp_page(self.page, self.total_pages);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.total_pages = total_pages(self.total_items, page_size);
        self.page = 1;
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn go_to(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages);
    }

    /// Moves to the next page if there is one.
    pub fn next(&mut self) -> bool {
        if self.page < self.total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous page if there is one.
    pub fn previous(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}

/// Returns `ceil(total_items / page_size)`, or 0 when `page_size` is 0.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    }
}

/// Clamps a page number into `1..=total_pages`. With no pages the result is 1.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices one page out of `rows`.
///
/// The page holds rows `[(page - 1) * page_size, page * page_size)` clamped
/// to the row count. The page number is not clamped; see [`clamp_page`].
pub fn paginate<T: Clone>(rows: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_items = rows.len();
    let total_pages = total_pages(total_items, page_size);

    let data = if page == 0 || page_size == 0 {
        Vec::new()
    } else {
        let start = (page - 1).saturating_mul(page_size).min(total_items);
        let end = page.saturating_mul(page_size).min(total_items);
        rows[start..end].to_vec()
    };

    Page {
        data,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_slices() {
        let rows = rows(23);
        assert_eq!(paginate(&rows, 1, 10).data(), &rows[0..10]);
        assert_eq!(paginate(&rows, 2, 10).data(), &rows[10..20]);
        assert_eq!(paginate(&rows, 3, 10).len(), 3);
        assert_eq!(paginate(&rows, 3, 10).total_pages(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let rows = rows(5);
        let page = paginate(&rows, 4, 2);
        assert!(page.is_empty());
        assert_eq!(page.total_items(), 5);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.range(), None);
        assert!(paginate(&rows, 0, 2).is_empty());
        assert!(paginate(&rows, usize::MAX, 2).is_empty());
    }

    #[test]
    fn test_zero_page_size() {
        let page = paginate(&rows(5), 1, 0);
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_rows() {
        let page = paginate::<u32>(&[], 1, 10);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_navigation_flags() {
        let rows = rows(30);
        let first = paginate(&rows, 1, 10);
        assert!(first.has_next());
        assert!(!first.has_previous());
        let middle = paginate(&rows, 2, 10);
        assert_eq!(middle.range(), Some((11, 20)));
        assert!(middle.has_next() && middle.has_previous());
    }

    #[test]
    fn test_pagination_state() {
        let mut state = PaginationState::new(10, 95);
        assert_eq!(state.total_pages, 10);
        state.go_to(42);
        assert_eq!(state.page, 10);
        assert!(!state.next());
        state.set_total_items(15);
        assert_eq!(state.page, 2);
        assert!(state.previous());
        state.set_page_size(0);
        assert_eq!(state.total_pages, 0);
        assert_eq!(clamp_page(0, 0), 1);
    }
}
