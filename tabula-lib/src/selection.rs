//! Row selection keyed by row identity
//!
//! Selection is tracked by row id, not by position, so it survives paging,
//! sorting and filtering. Ids are read with an [`Accessor`] and compared by
//! their rendered text.

use std::collections::HashSet;

use crate::model::Accessor;
use crate::model::FieldSource;

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// No selection allowed.
    None,
    /// At most one row (radio-button style).
    Single,
    /// Any number of rows (checkbox style).
    #[default]
    Multi,
}

/// Tracks selected rows by id.
///
/// Rows whose id resolves to null cannot be selected.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Record;
/// use tabula_lib::selection::SelectionController;
///
/// let rows: Vec<Record> = (1..=4i64).map(|i| Record::new().set("id", i)).collect();
/// let mut selection = SelectionController::new();
///
/// selection.toggle(&rows[1]);
/// assert!(selection.is_selected(&rows[1]));
/// assert!(selection.is_partially_selected(&rows[..2]));
///
/// selection.select_all(&rows[..2]);
/// assert!(selection.is_all_selected(&rows[..2]));
/// assert!(!selection.is_all_selected(&rows));
/// ```
#[derive(Debug, Clone)]
pub struct SelectionController<R> {
    mode: SelectionMode,
    id: Accessor<R>,
    selected: HashSet<String>,
}

impl<R: FieldSource> Default for SelectionController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FieldSource> SelectionController<R> {
    /// Creates a multi-select controller reading ids from the `id` key.
    pub fn new() -> Self {
        Self::with_id(Accessor::key("id"))
    }
}

impl<R> SelectionController<R> {
    /// Creates a multi-select controller with a custom id accessor.
    pub fn with_id(id: Accessor<R>) -> Self {
        Self {
            mode: SelectionMode::Multi,
            id,
            selected: HashSet::new(),
        }
    }

    /// Sets the selection mode. Switching to `None` clears the selection and
    /// switching to `Single` keeps at most one id.
    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.set_mode(mode);
        self
    }

    /// Changes the selection mode in place.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => self.selected.clear(),
            SelectionMode::Single if self.selected.len() > 1 => self.selected.clear(),
            _ => {}
        }
    }

    /// Returns the selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Returns the id of a row, or `None` if it resolves to null.
    pub fn row_id(&self, row: &R) -> Option<String> {
        let value = self.id.resolve(row);
        if value.is_null() { None } else { Some(value.to_string()) }
    }

    /// Toggles one row. Returns `true` if the selection changed.
    pub fn toggle(&mut self, row: &R) -> bool {
        let Some(id) = self.row_id(row) else {
            return false;
        };

        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let was_selected = self.selected.contains(&id);
                self.selected.clear();
                if !was_selected {
                    self.selected.insert(id);
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                true
            }
        }
    }

    /// Adds every visible row. Rows selected elsewhere stay selected.
    ///
    /// Only applies in multi-select mode.
    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a R>) -> bool
    where
        R: 'a,
    {
        if self.mode != SelectionMode::Multi {
            return false;
        }
        let before = self.selected.len();
        for row in visible {
            if let Some(id) = self.row_id(row) {
                self.selected.insert(id);
            }
        }
        self.selected.len() != before
    }

    /// Selects the visible rows between two positions, inclusive, in either
    /// order. Positions past the end are clamped.
    ///
    /// Only applies in multi-select mode.
    pub fn select_range(&mut self, visible: &[R], from: usize, to: usize) -> bool {
        if self.mode != SelectionMode::Multi || visible.is_empty() {
            return false;
        }
        let last = visible.len() - 1;
        let (start, end) = (from.min(to).min(last), from.max(to).min(last));
        self.select_all(&visible[start..=end])
    }

    /// Clears the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Returns `true` if the row is selected.
    pub fn is_selected(&self, row: &R) -> bool {
        self.row_id(row).is_some_and(|id| self.selected.contains(&id))
    }

    /// Returns `true` if there is at least one visible row and every visible
    /// row is selected.
    pub fn is_all_selected<'a>(&self, visible: impl IntoIterator<Item = &'a R>) -> bool
    where
        R: 'a,
    {
        let (selected, total) = self.count_selected(visible);
        total > 0 && selected == total
    }

    /// Returns `true` if some, but not all, visible rows are selected.
    pub fn is_partially_selected<'a>(&self, visible: impl IntoIterator<Item = &'a R>) -> bool
    where
        R: 'a,
    {
        let (selected, total) = self.count_selected(visible);
        selected > 0 && selected < total
    }

    /// Returns the rows in `rows` that are selected, in order.
    pub fn selected_rows<'a>(&self, rows: impl IntoIterator<Item = &'a R>) -> Vec<&'a R>
    where
        R: 'a,
    {
        rows.into_iter().filter(|row| self.is_selected(row)).collect()
    }

    /// Drops selected ids that no row in `rows` has.
    ///
    /// Returns the number of ids removed.
    pub fn retain_present<'a>(&mut self, rows: impl IntoIterator<Item = &'a R>) -> usize
    where
        R: 'a,
    {
        let present: HashSet<String> = rows.into_iter().filter_map(|row| self.row_id(row)).collect();
        let before = self.selected.len();
        self.selected.retain(|id| present.contains(id));
        before - self.selected.len()
    }

    /// Returns the selected ids.
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Returns the number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn count_selected<'a>(&self, visible: impl IntoIterator<Item = &'a R>) -> (usize, usize)
    where
        R: 'a,
    {
        visible.into_iter().fold((0, 0), |(selected, total), row| {
            (selected + usize::from(self.is_selected(row)), total + 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::model::Value;

    fn rows(n: i64) -> Vec<Record> {
        (1..=n).map(|i| Record::new().set("id", i).set("code", format!("R{}", i))).collect()
    }

    #[test]
    fn test_multi_toggle() {
        let rows = rows(3);
        let mut selection = SelectionController::new();
        assert!(selection.toggle(&rows[0]));
        assert!(selection.toggle(&rows[2]));
        assert!(selection.toggle(&rows[0]));
        assert_eq!(selection.selected_ids().collect::<Vec<_>>(), ["3"]);
    }

    #[test]
    fn test_single_mode() {
        let rows = rows(3);
        let mut selection = SelectionController::new().mode(SelectionMode::Single);
        selection.toggle(&rows[0]);
        selection.toggle(&rows[1]);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_selected(&rows[1]));
        assert!(!selection.select_all(&rows));
        selection.toggle(&rows[1]);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_none_mode() {
        let rows = rows(2);
        let mut selection = SelectionController::new().mode(SelectionMode::None);
        assert!(!selection.toggle(&rows[0]));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_header_checkbox_states() {
        let rows = rows(4);
        let mut selection = SelectionController::new();
        assert!(!selection.is_all_selected(&rows));
        assert!(!selection.is_partially_selected(&rows));
        assert!(!selection.is_all_selected(&rows[..0]));

        selection.toggle(&rows[0]);
        assert!(selection.is_partially_selected(&rows));
        selection.select_all(&rows);
        assert!(selection.is_all_selected(&rows));
        assert!(!selection.is_partially_selected(&rows));
        selection.deselect_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_keeps_other_pages() {
        let rows = rows(6);
        let mut selection = SelectionController::new();
        selection.toggle(&rows[5]);
        selection.select_all(&rows[..3]);
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.selected_rows(&rows).len(), 4);
    }

    #[test]
    fn test_select_range() {
        let rows = rows(5);
        let mut selection = SelectionController::new();
        assert!(selection.select_range(&rows, 3, 1));
        assert_eq!(selection.len(), 3);
        assert!(selection.select_range(&rows, 4, 40));
        assert!(selection.is_selected(&rows[4]));
        assert!(!selection.is_selected(&rows[0]));
    }

    #[test]
    fn test_custom_id_and_null_ids() {
        let rows = rows(2);
        let mut selection = SelectionController::with_id(Accessor::key("code"));
        selection.toggle(&rows[1]);
        assert_eq!(selection.selected_ids().collect::<Vec<_>>(), ["R2"]);

        let orphan = Record::new().set("code", Value::Null);
        assert!(!selection.toggle(&orphan));
        assert!(!selection.is_selected(&orphan));
    }

    #[test]
    fn test_retain_present() {
        let rows = rows(4);
        let mut selection = SelectionController::new();
        selection.select_all(&rows);
        assert_eq!(selection.retain_present(&rows[1..3]), 2);
        assert_eq!(selection.len(), 2);
    }
}
