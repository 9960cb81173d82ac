//! Filter, sort and paginate in one pass

use super::FilterClause;
use super::Groups;
use super::Page;
use super::SortKeys;
use super::filter;
use super::group;
use super::paginate;
use super::sort;
use crate::config::GridConfig;
use crate::model::ColumnDef;

/// Result of running a [`DataView`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<'a, R> {
    /// Rows left after filtering, before pagination.
    pub filtered_count: usize,
    /// The requested page of sorted rows.
    pub page: Page<&'a R>,
}

/// A view over a column set: filter clauses, a search, sort keys and a page.
///
/// Applying the view runs filter, then sort, then pagination.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::{DataView, FilterClause, SortKeys};
/// use tabula_lib::model::{ColumnDef, ColumnType, Record};
///
/// let rows = vec![
///     Record::new().set("id", 1i64).set("amount", 50i64),
///     Record::new().set("id", 2i64).set("amount", 150i64),
///     Record::new().set("id", 3i64).set("amount", 100i64),
/// ];
/// let columns = vec![
///     ColumnDef::new("id", ColumnType::Number),
///     ColumnDef::new("amount", ColumnType::Currency),
/// ];
///
/// let result = DataView::new(&columns)
///     .filter(FilterClause::gte("amount", 100i64))
///     .sort(SortKeys::desc("amount"))
///     .page(1, 10)
///     .apply(&rows);
///
/// assert_eq!(result.filtered_count, 2);
/// assert_eq!(result.page.data()[0].get("id"), rows[1].get("id"));
/// ```
#[derive(Debug, Clone)]
pub struct DataView<'c, R> {
    columns: &'c [ColumnDef<R>],
    clauses: Vec<FilterClause>,
    search: Option<String>,
    sort: SortKeys,
    page: usize,
    page_size: usize,
}

impl<'c, R> DataView<'c, R> {
    /// Creates a view with no filters, no sort and the default page size.
    pub fn new(columns: &'c [ColumnDef<R>]) -> Self {
        Self::with_config(columns, &GridConfig::default())
    }

    /// Creates a view taking its page size from `config`.
    pub fn with_config(columns: &'c [ColumnDef<R>], config: &GridConfig) -> Self {
        Self {
            columns,
            clauses: Vec::new(),
            search: None,
            sort: SortKeys::new(),
            page: 1,
            page_size: config.page_size,
        }
    }

    /// Adds a filter clause.
    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Adds several filter clauses.
    pub fn filters(mut self, clauses: impl IntoIterator<Item = FilterClause>) -> Self {
        self.clauses.extend(clauses);
        self
    }

    /// Sets the global search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Sets the sort keys.
    pub fn sort(mut self, keys: impl Into<SortKeys>) -> Self {
        self.sort = keys.into();
        self
    }

    /// Sets the page number and size.
    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Returns the filter clauses.
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Returns the sort keys.
    pub fn sort_keys(&self) -> &SortKeys {
        &self.sort
    }

    /// Runs the view over `rows`.
    pub fn apply<'a, I>(&self, rows: I) -> ViewResult<'a, R>
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let filtered = self.filtered(rows);
        let filtered_count = filtered.len();
        let sorted = sort(filtered, self.sort.as_slice(), self.columns);
        ViewResult {
            filtered_count,
            page: paginate(&sorted, self.page, self.page_size),
        }
    }

    /// Filters and sorts `rows`, then groups them by `column_id`.
    ///
    /// The page setting is ignored; every matching row is grouped.
    pub fn apply_grouped<'a, I>(&self, rows: I, column_id: &str) -> Groups<'a, R>
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let filtered = self.filtered(rows);
        let sorted = sort(filtered, self.sort.as_slice(), self.columns);
        group(sorted, column_id, self.columns)
    }

    fn filtered<'a, I>(&self, rows: I) -> Vec<&'a R>
    where
        R: 'a,
        I: IntoIterator<Item = &'a R>,
    {
        filter(rows, &self.clauses, self.columns, self.search.as_deref())
    }
}
