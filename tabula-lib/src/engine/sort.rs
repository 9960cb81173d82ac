//! Multi-key sorting

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::compare;
use crate::error::ParseError;
use crate::model::ColumnDef;
use crate::model::Value;
use crate::model::find_column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9, nulls first).
    Asc,
    /// Descending order (Z-A, 9-0, nulls last).
    Desc,
}

impl Direction {
    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Asc),
            "desc" | "descending" => Ok(Direction::Desc),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }
}

/// One sort criterion.
///
/// Keys are applied in ascending `priority`; the lowest priority is the
/// primary sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortKey {
    /// Column to sort by.
    pub column_id: String,
    /// Sort direction.
    pub direction: Direction,
    /// Evaluation order; lower sorts first.
    #[serde(default)]
    pub priority: i32,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(column_id: impl Into<String>, direction: Direction, priority: i32) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
            priority,
        }
    }
}

/// Parses `column` or `column:direction`.
impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, direction.parse()?),
            None => (s, Direction::Asc),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(ParseError::malformed("sort key", s));
        }
        Ok(SortKey::new(column, direction, 0))
    }
}

/// An ordered set of sort keys.
///
/// Builder methods assign priorities in call order, so the first key added is
/// the primary sort.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::{Direction, SortKeys};
///
/// let keys = SortKeys::desc("amount").then_asc("name");
/// assert_eq!(keys.len(), 2);
/// assert_eq!(keys.direction_of("name"), Some(Direction::Asc));
/// assert_eq!(keys.as_slice()[1].priority, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKeys {
    keys: Vec<SortKey>,
}

impl SortKeys {
    /// Creates an empty key set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending sort on a column.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new().then_asc(column_id)
    }

    /// Creates a descending sort on a column.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new().then_desc(column_id)
    }

    /// Adds a lower-priority ascending key.
    pub fn then_asc(self, column_id: impl Into<String>) -> Self {
        self.then(column_id, Direction::Asc)
    }

    /// Adds a lower-priority descending key.
    pub fn then_desc(self, column_id: impl Into<String>) -> Self {
        self.then(column_id, Direction::Desc)
    }

    fn then(mut self, column_id: impl Into<String>, direction: Direction) -> Self {
        let priority = self.next_priority();
        self.keys.push(SortKey::new(column_id, direction, priority));
        self
    }

    fn next_priority(&self) -> i32 {
        self.keys
            .iter()
            .map(|k| k.priority)
            .max()
            .map_or(0, |p| p.saturating_add(1))
    }

    /// Returns the keys as a slice.
    pub fn as_slice(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no key is set.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Returns the direction a column is currently sorted in.
    pub fn direction_of(&self, column_id: &str) -> Option<Direction> {
        self.keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// Cycles a column through ascending, descending and unsorted, the way a
    /// header click does.
    ///
    /// Without `multi` the column becomes the only key. With `multi` other
    /// keys are kept and a newly sorted column is appended as the lowest
    /// priority. Columns that are not sortable are left alone.
    ///
    /// Returns `true` if the keys changed.
    pub fn toggle<R>(&mut self, column: &ColumnDef<R>, multi: bool) -> bool {
        if !column.sortable {
            return false;
        }

        let next = match self.direction_of(&column.id) {
            None => Some(Direction::Asc),
            Some(Direction::Asc) => Some(Direction::Desc),
            Some(Direction::Desc) => None,
        };

        if !multi {
            self.keys.retain(|k| k.column_id == column.id);
        }

        match next {
            Some(direction) => {
                if let Some(key) = self.keys.iter_mut().find(|k| k.column_id == column.id) {
                    key.direction = direction;
                } else {
                    let priority = self.next_priority();
                    self.keys.push(SortKey::new(&column.id, direction, priority));
                }
            }
            None => self.keys.retain(|k| k.column_id != column.id),
        }

        self.renumber();
        true
    }

    /// Rewrites priorities as `0..n` preserving the current order.
    fn renumber(&mut self) {
        self.keys.sort_by_key(|k| k.priority);
        for (i, key) in self.keys.iter_mut().enumerate() {
            key.priority = i as i32;
        }
    }
}

impl From<Vec<SortKey>> for SortKeys {
    fn from(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }
}

impl AsRef<[SortKey]> for SortKeys {
    fn as_ref(&self) -> &[SortKey] {
        &self.keys
    }
}

/// Sorts rows by an ordered list of keys.
///
/// The sort is stable: rows that tie on every key keep their input order.
/// Keys naming an unknown column are skipped. With no usable key the rows
/// come back in input order.
///
/// Each row's key values are resolved once, before sorting.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::{sort, SortKeys};
/// use tabula_lib::model::{ColumnDef, ColumnType, Record, Value};
///
/// let rows = vec![
///     Record::new().set("id", 1i64).set("amount", 50i64),
///     Record::new().set("id", 2i64).set("amount", 150i64),
///     Record::new().set("id", 3i64).set("amount", 100i64),
/// ];
/// let columns = vec![ColumnDef::new("amount", ColumnType::Number)];
///
/// let sorted = sort(&rows, SortKeys::desc("amount").as_slice(), &columns);
/// let ids: Vec<Value> = sorted.iter().map(|r| r.get("id").cloned().unwrap_or_default()).collect();
/// assert_eq!(ids, vec![Value::Int(2), Value::Int(3), Value::Int(1)]);
/// ```
pub fn sort<'a, R, I>(rows: I, keys: &[SortKey], columns: &[ColumnDef<R>]) -> Vec<&'a R>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
{
    let rows: Vec<&'a R> = rows.into_iter().collect();
    let plan = resolve_keys(keys, columns);
    if plan.is_empty() {
        return rows;
    }

    let mut decorated: Vec<(Vec<Value>, &'a R)> = rows
        .into_iter()
        .map(|row| {
            let values = plan.iter().map(|(column, _)| column.accessor.resolve(row)).collect();
            (values, row)
        })
        .collect();

    decorated.sort_by(|(a, _), (b, _)| {
        for (i, (column, direction)) in plan.iter().enumerate() {
            let ordering = direction.apply(compare(&a[i], &b[i], column.kind));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    decorated.into_iter().map(|(_, row)| row).collect()
}

fn resolve_keys<'c, R>(
    keys: &[SortKey],
    columns: &'c [ColumnDef<R>],
) -> Vec<(&'c ColumnDef<R>, Direction)> {
    let mut ordered: Vec<&SortKey> = keys.iter().collect();
    ordered.sort_by_key(|k| k.priority);

    ordered
        .into_iter()
        .filter_map(|key| match find_column(columns, &key.column_id) {
            Some(column) => Some((column, key.direction)),
            None => {
                log::debug!("sort key skipped: unknown column {:?}", key.column_id);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;
    use crate::model::Record;

    fn rows() -> Vec<Record> {
        vec![
            Record::new().set("id", 1i64).set("name", "Bravo").set("group", "b"),
            Record::new().set("id", 2i64).set("name", "Alpha").set("group", "a"),
            Record::new().set("id", 3i64).set("name", "Charlie").set("group", "b"),
            Record::new().set("id", 4i64).set("group", "a"),
        ]
    }

    fn columns() -> Vec<ColumnDef<Record>> {
        vec![
            ColumnDef::new("id", ColumnType::Number),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("group", ColumnType::Text).sortable(false),
        ]
    }

    fn ids(rows: &[&Record]) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.get("id") {
                Some(Value::Int(id)) => *id,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn test_empty_keys_keep_order() {
        let rows = rows();
        assert_eq!(ids(&sort(&rows, &[], &columns())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_column_skipped() {
        let rows = rows();
        let keys = [SortKey::new("nope", Direction::Desc, 0), SortKey::new("id", Direction::Desc, 1)];
        assert_eq!(ids(&sort(&rows, &keys, &columns())), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_priority_order() {
        let rows = rows();
        // listed out of priority order on purpose
        let keys = [
            SortKey::new("id", Direction::Desc, 5),
            SortKey::new("group", Direction::Asc, 1),
        ];
        assert_eq!(ids(&sort(&rows, &keys, &columns())), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_nulls_first_then_last() {
        let rows = rows();
        let asc = sort(&rows, SortKeys::asc("name").as_slice(), &columns());
        assert_eq!(ids(&asc), vec![4, 2, 1, 3]);
        let desc = sort(&rows, SortKeys::desc("name").as_slice(), &columns());
        assert_eq!(ids(&desc), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_toggle_cycle() {
        let columns = columns();
        let mut keys = SortKeys::new();

        assert!(keys.toggle(&columns[1], false));
        assert_eq!(keys.direction_of("name"), Some(Direction::Asc));
        assert!(keys.toggle(&columns[1], false));
        assert_eq!(keys.direction_of("name"), Some(Direction::Desc));
        assert!(keys.toggle(&columns[1], false));
        assert!(keys.is_empty());

        // not sortable
        assert!(!keys.toggle(&columns[2], false));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_toggle_multi() {
        let columns = columns();
        let mut keys = SortKeys::new();
        keys.toggle(&columns[1], false);
        keys.toggle(&columns[0], true);
        assert_eq!(keys.as_slice()[0].column_id, "name");
        assert_eq!(keys.as_slice()[1].column_id, "id");
        assert_eq!(keys.as_slice()[1].priority, 1);

        // single-click on another column replaces the set
        keys.toggle(&columns[0], false);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.direction_of("id"), Some(Direction::Desc));
        assert_eq!(keys.as_slice()[0].priority, 0);
    }

    #[test]
    fn test_parse_sort_key() {
        let key: SortKey = "amount:desc".parse().unwrap();
        assert_eq!(key, SortKey::new("amount", Direction::Desc, 0));
        let key: SortKey = "name".parse().unwrap();
        assert_eq!(key.direction, Direction::Asc);
        assert!("amount:sideways".parse::<SortKey>().is_err());
        assert!(":asc".parse::<SortKey>().is_err());
    }
}
