//! Column definitions

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::Accessor;
use super::FieldSource;
use crate::error::ParseError;

/// The data type of a column.
///
/// The type decides how values compare, which filter coercions apply and
/// which aggregates [`column_stats`](crate::engine::column_stats) computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text, compared with natural collation.
    #[default]
    Text,
    /// Plain number.
    Number,
    /// Monetary amount.
    Currency,
    /// Percentage, stored as a number.
    Percentage,
    /// Boolean flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
    /// Application-defined values, compared as text.
    Custom,
}

impl ColumnType {
    /// Returns `true` for number, currency and percentage columns.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Number | ColumnType::Currency | ColumnType::Percentage
        )
    }

    /// Returns `true` for date and datetime columns.
    pub fn is_temporal(self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Datetime)
    }

    /// Returns the lowercase name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Currency => "currency",
            ColumnType::Percentage => "percentage",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
            ColumnType::Custom => "custom",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "currency" => Ok(ColumnType::Currency),
            "percentage" | "percent" => Ok(ColumnType::Percentage),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "date" => Ok(ColumnType::Date),
            "datetime" => Ok(ColumnType::Datetime),
            "custom" => Ok(ColumnType::Custom),
            other => Err(ParseError::UnknownColumnType(other.to_string())),
        }
    }
}

/// A column definition.
///
/// Columns are sortable and filterable unless switched off.
///
/// # Examples
///
/// ```
/// use tabula_lib::model::{ColumnDef, ColumnType, Record};
///
/// let columns: Vec<ColumnDef<Record>> = vec![
///     ColumnDef::new("id", ColumnType::Number).filterable(false),
///     ColumnDef::new("name", ColumnType::Text).header("Name"),
///     ColumnDef::new("amount", ColumnType::Currency),
/// ];
/// assert_eq!(columns[1].header, "Name");
/// assert!(!columns[0].filterable);
/// ```
pub struct ColumnDef<R> {
    /// Unique identifier within the column set.
    pub id: String,
    /// Header text.
    pub header: String,
    /// How to read this column's value from a row.
    pub accessor: Accessor<R>,
    /// Data type.
    pub kind: ColumnType,
    /// Whether the column can be sorted by header interaction.
    pub sortable: bool,
    /// Whether clauses and global search apply to this column.
    pub filterable: bool,
}

impl<R: FieldSource> ColumnDef<R> {
    /// Creates a column whose accessor is the key `id`.
    pub fn new(id: impl Into<String>, kind: ColumnType) -> Self {
        let id = id.into();
        let accessor = Accessor::key(id.clone());
        Self::with_accessor(id, kind, accessor)
    }
}

impl<R> ColumnDef<R> {
    /// Creates a column with an explicit accessor.
    pub fn with_accessor(id: impl Into<String>, kind: ColumnType, accessor: Accessor<R>) -> Self {
        let id = id.into();
        Self {
            header: id.clone(),
            accessor,
            id,
            kind,
            sortable: true,
            filterable: true,
        }
    }

    /// Sets the header text.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Sets whether the column is sortable.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column is filterable.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            kind: self.kind,
            sortable: self.sortable,
            filterable: self.filterable,
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish()
    }
}

/// Finds a column by id. The first definition wins if ids repeat.
pub fn find_column<'c, R>(columns: &'c [ColumnDef<R>], id: &str) -> Option<&'c ColumnDef<R>> {
    columns.iter().find(|c| c.id == id)
}

/// Returns ids that appear more than once, in order of their second appearance.
pub fn duplicate_column_ids<R>(columns: &[ColumnDef<R>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for column in columns {
        if !seen.insert(column.id.as_str()) && !duplicates.contains(&column.id) {
            log::warn!("duplicate column id {:?}; first definition wins", column.id);
            duplicates.push(column.id.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_column_type_parse() {
        assert_eq!("Currency".parse::<ColumnType>().unwrap(), ColumnType::Currency);
        assert_eq!("bool".parse::<ColumnType>().unwrap(), ColumnType::Boolean);
        assert!("money".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_column_type_serde() {
        let kind: ColumnType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(kind, ColumnType::Datetime);
        assert_eq!(serde_json::to_string(&ColumnType::Percentage).unwrap(), "\"percentage\"");
    }

    #[test]
    fn test_duplicate_ids() {
        let columns: Vec<ColumnDef<Record>> = vec![
            ColumnDef::new("a", ColumnType::Text),
            ColumnDef::new("b", ColumnType::Text).header("first b"),
            ColumnDef::new("b", ColumnType::Number).header("second b"),
            ColumnDef::new("b", ColumnType::Number),
        ];
        assert_eq!(duplicate_column_ids(&columns), vec!["b".to_string()]);
        assert_eq!(find_column(&columns, "b").unwrap().header, "first b");
        assert!(find_column(&columns, "c").is_none());
    }
}
