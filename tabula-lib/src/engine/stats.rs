//! Column statistics

use std::collections::HashSet;

use chrono::DateTime;
use serde::Serialize;

use super::Groups;
use crate::model::ColumnDef;
use crate::model::Value;

/// Summary statistics for one column.
///
/// `count` is the number of rows. `unique` counts distinct non-null values
/// and `nulls` counts the rest. The aggregates depend on the column type:
///
/// | Column type | `min`/`max` | `avg`/`sum` |
/// |-------------|-------------|-------------|
/// | number, currency, percentage | `Value::Float` | yes |
/// | date, datetime | `Value::DateTime` | no |
/// | others | no | no |
///
/// Values that do not coerce are left out of the aggregates. An aggregate is
/// `None` when no value qualifies.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Number of rows.
    pub count: usize,
    /// Number of distinct non-null values.
    pub unique: usize,
    /// Number of null values.
    pub nulls: usize,
    /// Smallest value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Largest value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Mean of the numeric values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Sum of the numeric values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

/// Identity used to count distinct values.
///
/// Numbers are equal across variants when their values match; everything
/// else is distinct per variant and rendered text, so `1` and `"1"` differ.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DistinctKey {
    Number(u64),
    Other(&'static str, String),
}

impl DistinctKey {
    fn of(value: &Value) -> Self {
        let number = match value {
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => value.as_f64(),
            Value::Json(serde_json::Value::Number(_)) => value.as_f64(),
            _ => None,
        };
        match number {
            // -0.0 and 0.0 are the same value
            Some(n) if n == 0.0 => DistinctKey::Number(0.0f64.to_bits()),
            Some(n) => DistinctKey::Number(n.to_bits()),
            None => DistinctKey::Other(value.type_name(), value.to_string()),
        }
    }
}

#[derive(Default)]
struct Extremes<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: PartialOrd + Copy> Extremes<T> {
    fn push(&mut self, v: T) {
        if self.min.is_none_or(|m| v < m) {
            self.min = Some(v);
        }
        if self.max.is_none_or(|m| v > m) {
            self.max = Some(v);
        }
    }
}

/// Computes statistics for one column over the given rows.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::column_stats;
/// use tabula_lib::model::{ColumnDef, ColumnType, Record, Value};
///
/// let rows = vec![
///     Record::new().set("amount", 50i64),
///     Record::new().set("amount", 150i64),
///     Record::new().set("amount", "n/a"),
///     Record::new(),
/// ];
/// let column = ColumnDef::new("amount", ColumnType::Currency);
///
/// let stats = column_stats(&rows, &column);
/// assert_eq!((stats.count, stats.unique, stats.nulls), (4, 3, 1));
/// assert_eq!(stats.sum, Some(200.0));
/// assert_eq!(stats.avg, Some(100.0));
/// assert_eq!(stats.max, Some(Value::Float(150.0)));
/// ```
pub fn column_stats<'a, R, I>(rows: I, column: &ColumnDef<R>) -> ColumnStats
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut count = 0;
    let mut non_null = 0;
    let mut distinct = HashSet::new();
    let mut numbers = Extremes::<f64>::default();
    let mut sum = 0.0;
    let mut numeric_count = 0usize;
    let mut timestamps = Extremes::<i64>::default();

    for row in rows {
        count += 1;
        let value = column.accessor.resolve(row);
        if value.is_null() {
            continue;
        }
        non_null += 1;

        if column.kind.is_numeric() {
            if let Some(n) = value.as_finite_f64() {
                numbers.push(n);
                sum += n;
                numeric_count += 1;
            }
        } else if column.kind.is_temporal() {
            if let Some(ms) = value.as_timestamp_millis() {
                timestamps.push(ms);
            }
        }

        distinct.insert(DistinctKey::of(&value));
    }

    let mut stats = ColumnStats {
        count,
        unique: distinct.len(),
        nulls: count - non_null,
        ..ColumnStats::default()
    };

    if column.kind.is_numeric() && numeric_count > 0 {
        stats.min = numbers.min.map(Value::Float);
        stats.max = numbers.max.map(Value::Float);
        stats.sum = Some(sum);
        stats.avg = Some(sum / numeric_count as f64);
    } else if column.kind.is_temporal() {
        let to_value = |ms: i64| DateTime::from_timestamp_millis(ms).map(Value::DateTime);
        stats.min = timestamps.min.and_then(to_value);
        stats.max = timestamps.max.and_then(to_value);
    }

    stats
}

/// Computes statistics for one column within each group, in group order.
pub fn group_stats<R>(
    groups: &Groups<'_, R>,
    column: &ColumnDef<R>,
) -> Vec<(String, ColumnStats)> {
    groups
        .iter()
        .map(|g| (g.key.clone(), column_stats(g.rows.iter().copied(), column)))
        .collect()
}
