//! Grouping rows by a column's rendered value

use std::collections::HashMap;

use serde::Serialize;

use crate::model::ColumnDef;
use crate::model::find_column;

/// Group key used when the grouping column is unknown.
pub const ALL_GROUP: &str = "All";

/// Group key used for rows whose group value is null.
pub const UNGROUPED: &str = "Ungrouped";

/// Rows sharing one rendered group value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a, R> {
    /// Rendered group value.
    pub key: String,
    /// Rows in input order.
    pub rows: Vec<&'a R>,
}

impl<R> Group<'_, R> {
    /// Returns the number of rows in the group.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the group has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Groups in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Groups<'a, R> {
    groups: Vec<Group<'a, R>>,
}

impl<'a, R> Groups<'a, R> {
    /// Returns the group with `key`.
    pub fn get(&self, key: &str) -> Option<&Group<'a, R>> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Returns the group keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    /// Returns an iterator over the groups.
    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, R>> {
        self.groups.iter()
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the groups.
    pub fn into_vec(self) -> Vec<Group<'a, R>> {
        self.groups
    }
}

impl<'a, R> IntoIterator for Groups<'a, R> {
    type Item = Group<'a, R>;
    type IntoIter = std::vec::IntoIter<Group<'a, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'g, 'a, R> IntoIterator for &'g Groups<'a, R> {
    type Item = &'g Group<'a, R>;
    type IntoIter = std::slice::Iter<'g, Group<'a, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partitions rows by the rendered value of one column.
///
/// Groups appear in the order their first row appears. Rows with a null
/// value land in [`UNGROUPED`]. An unknown column puts every row in a single
/// [`ALL_GROUP`] group. No rows means no groups.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::group;
/// use tabula_lib::model::{ColumnDef, ColumnType, Record};
///
/// let rows = vec![
///     Record::new().set("region", "West"),
///     Record::new().set("region", "East"),
///     Record::new(),
///     Record::new().set("region", "West"),
/// ];
/// let columns = vec![ColumnDef::new("region", ColumnType::Text)];
///
/// let groups = group(&rows, "region", &columns);
/// assert_eq!(groups.keys().collect::<Vec<_>>(), ["West", "East", "Ungrouped"]);
/// assert_eq!(groups.get("West").unwrap().len(), 2);
/// ```
pub fn group<'a, R, I>(rows: I, column_id: &str, columns: &[ColumnDef<R>]) -> Groups<'a, R>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
{
    let Some(column) = find_column(columns, column_id) else {
        log::debug!("grouping by unknown column {:?}", column_id);
        let rows: Vec<&R> = rows.into_iter().collect();
        let groups = if rows.is_empty() {
            Vec::new()
        } else {
            vec![Group {
                key: ALL_GROUP.to_string(),
                rows,
            }]
        };
        return Groups { groups };
    };

    let mut groups: Vec<Group<'a, R>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let value = column.accessor.resolve(row);
        let key = if value.is_null() {
            UNGROUPED.to_string()
        } else {
            value.to_string()
        };

        match index.get(&key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group { key, rows: vec![row] });
            }
        }
    }

    Groups { groups }
}
