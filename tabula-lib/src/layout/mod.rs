//! Column order and widths
//!
//! A [`LayoutManager`] owns the layout of one grid, identified by a storage
//! key. Every reorder, resize and reset is written to a [`LayoutStore`]
//! straight away.
//!
//! [`LayoutStore`]: crate::store::LayoutStore

mod manager;

pub use manager::*;

use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

/// The persisted layout record.
///
/// Serialized as `{"order": [...], "widths": {"id": px}}`. Columns without
/// an entry in `widths` use the configured default width.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Column ids, left to right.
    pub order: Vec<String>,
    /// Explicit widths in pixels.
    pub widths: BTreeMap<String, u32>,
}

impl ColumnLayout {
    /// Creates a layout with the given order and no explicit widths.
    pub fn with_order<S: Into<String>>(order: impl IntoIterator<Item = S>) -> Self {
        Self {
            order: order.into_iter().map(Into::into).collect(),
            widths: BTreeMap::new(),
        }
    }

    /// Returns the position of a column.
    pub fn position(&self, column_id: &str) -> Option<usize> {
        self.order.iter().position(|id| id == column_id)
    }

    /// Fits a loaded layout onto the current column set.
    ///
    /// Ids not in `columns` are dropped, repeated ids keep their first
    /// position, and columns missing from the layout are appended in
    /// `columns` order. Widths for unknown ids are dropped and widths below
    /// `min_width` are raised to it.
    pub fn reconcile(self, columns: &[String], min_width: u32) -> Self {
        let known: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();

        let mut order: Vec<String> = self
            .order
            .into_iter()
            .filter(|id| known.contains(id.as_str()) && seen.insert(id.clone()))
            .collect();
        order.extend(columns.iter().filter(|id| !seen.contains(*id)).cloned());

        let widths = self
            .widths
            .into_iter()
            .filter(|(id, _)| known.contains(id.as_str()))
            .map(|(id, width)| (id, width.max(min_width)))
            .collect();

        Self { order, widths }
    }
}
