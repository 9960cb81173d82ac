//! Column predicates and global search

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ParseError;
use crate::model::ColumnDef;
use crate::model::Value;
use crate::model::find_column;

/// Filter operator.
///
/// Text operators compare rendered values case-insensitively. Ordering
/// operators and `Between` coerce both sides to numbers. `In` and `NotIn`
/// test raw membership in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Rendered text equals the filter text.
    Equals,
    /// Rendered text contains the filter text.
    Contains,
    /// Rendered text starts with the filter text.
    StartsWith,
    /// Rendered text ends with the filter text.
    EndsWith,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
    /// Inclusive range `[min, max]`.
    Between,
    /// Member of a list.
    In,
    /// Not a member of a list.
    NotIn,
}

impl FilterOperator {
    /// Returns the operator name as used in serialized clauses.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::Gt => "gt",
            FilterOperator::Lt => "lt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lte => "lte",
            FilterOperator::Between => "between",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "notIn",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" | "=" => Ok(FilterOperator::Equals),
            "contains" => Ok(FilterOperator::Contains),
            "startswith" => Ok(FilterOperator::StartsWith),
            "endswith" => Ok(FilterOperator::EndsWith),
            "gt" | ">" => Ok(FilterOperator::Gt),
            "lt" | "<" => Ok(FilterOperator::Lt),
            "gte" | "ge" | ">=" => Ok(FilterOperator::Gte),
            "lte" | "le" | "<=" => Ok(FilterOperator::Lte),
            "between" => Ok(FilterOperator::Between),
            "in" => Ok(FilterOperator::In),
            "notin" => Ok(FilterOperator::NotIn),
            other => Err(ParseError::UnknownOperator(other.to_string())),
        }
    }
}

/// A single column predicate.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::{FilterClause, FilterOperator};
///
/// let clause = FilterClause::gte("amount", 100i64);
/// assert_eq!(clause.operator, FilterOperator::Gte);
///
/// let clause = FilterClause::between("amount", 10i64, 20i64);
/// let json = serde_json::to_string(&clause).unwrap();
/// assert_eq!(json, r#"{"columnId":"amount","operator":"between","value":[10,20]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    /// Column the predicate applies to.
    pub column_id: String,
    /// Operator.
    pub operator: FilterOperator,
    /// Operand: a scalar, a `[min, max]` list for `Between`, or a list for
    /// `In`/`NotIn`.
    #[serde(default)]
    pub value: Value,
}

impl FilterClause {
    /// Creates a clause.
    pub fn new(column_id: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an `equals` clause.
    pub fn equals(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Equals, value)
    }

    /// Creates a `contains` clause.
    pub fn contains(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Contains, value)
    }

    /// Creates a `startsWith` clause.
    pub fn starts_with(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::StartsWith, value)
    }

    /// Creates an `endsWith` clause.
    pub fn ends_with(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::EndsWith, value)
    }

    /// Creates a `gt` clause.
    pub fn gt(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Gt, value)
    }

    /// Creates an `lt` clause.
    pub fn lt(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Lt, value)
    }

    /// Creates a `gte` clause.
    pub fn gte(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Gte, value)
    }

    /// Creates an `lte` clause.
    pub fn lte(column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column_id, FilterOperator::Lte, value)
    }

    /// Creates a `between` clause over the inclusive range `[min, max]`.
    pub fn between(column_id: impl Into<String>, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::new(
            column_id,
            FilterOperator::Between,
            Value::List(vec![min.into(), max.into()]),
        )
    }

    /// Creates an `in` clause.
    pub fn is_in<V: Into<Value>>(column_id: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(
            column_id,
            FilterOperator::In,
            Value::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Creates a `notIn` clause.
    pub fn not_in<V: Into<Value>>(column_id: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(
            column_id,
            FilterOperator::NotIn,
            Value::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Evaluates the clause against one resolved cell value.
    pub fn test(&self, value: &Value) -> bool {
        Predicate::compile(self).test(value)
    }
}

/// Parses `column:operator:value`.
///
/// The value is read as JSON when it parses (`10`, `[1,5]`, `"x"`, `null`)
/// and as plain text otherwise, so `name:contains:alp` works unquoted.
impl FromStr for FilterClause {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(column), Some(operator), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseError::malformed("filter clause", s));
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(ParseError::malformed("filter clause", s));
        }
        let value = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json) => Value::from(json),
            Err(_) => Value::from(raw),
        };
        Ok(FilterClause::new(column, operator.parse()?, value))
    }
}

/// A clause prepared for repeated evaluation.
#[derive(Debug)]
enum Predicate<'f> {
    Text {
        operator: FilterOperator,
        needle: String,
        matches_null: bool,
    },
    Numeric {
        operator: FilterOperator,
        operand: Option<f64>,
    },
    Between(Option<(f64, f64)>),
    Membership {
        negate: bool,
        set: Option<&'f [Value]>,
    },
}

impl<'f> Predicate<'f> {
    fn compile(clause: &'f FilterClause) -> Self {
        match clause.operator {
            op @ (FilterOperator::Equals
            | FilterOperator::Contains
            | FilterOperator::StartsWith
            | FilterOperator::EndsWith) => {
                let needle = clause.value.to_string().to_lowercase();
                let matches_null = matches!(op, FilterOperator::Equals | FilterOperator::Contains)
                    && needle.trim().is_empty();
                Predicate::Text {
                    operator: op,
                    needle,
                    matches_null,
                }
            }
            op @ (FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Gte | FilterOperator::Lte) => {
                Predicate::Numeric {
                    operator: op,
                    operand: clause.value.as_f64().filter(|v| !v.is_nan()),
                }
            }
            FilterOperator::Between => {
                let range = match clause.value.as_list() {
                    Some([min, max]) => min.as_f64().zip(max.as_f64()),
                    _ => None,
                };
                Predicate::Between(range)
            }
            FilterOperator::In => Predicate::Membership {
                negate: false,
                set: clause.value.as_list(),
            },
            FilterOperator::NotIn => Predicate::Membership {
                negate: true,
                set: clause.value.as_list(),
            },
        }
    }

    fn test(&self, value: &Value) -> bool {
        if value.is_null() {
            return matches!(self, Predicate::Text { matches_null: true, .. });
        }

        match self {
            Predicate::Text { operator, needle, .. } => {
                let text = value.to_string().to_lowercase();
                match operator {
                    FilterOperator::Equals => text == *needle,
                    FilterOperator::Contains => text.contains(needle.as_str()),
                    FilterOperator::StartsWith => text.starts_with(needle.as_str()),
                    FilterOperator::EndsWith => text.ends_with(needle.as_str()),
                    _ => false,
                }
            }
            Predicate::Numeric { operator, operand } => {
                let (Some(operand), Some(v)) = (*operand, value.as_f64()) else {
                    return false;
                };
                match operator {
                    FilterOperator::Gt => v > operand,
                    FilterOperator::Lt => v < operand,
                    FilterOperator::Gte => v >= operand,
                    FilterOperator::Lte => v <= operand,
                    _ => false,
                }
            }
            Predicate::Between(range) => match (*range, value.as_f64()) {
                (Some((min, max)), Some(v)) => min <= v && v <= max,
                _ => false,
            },
            Predicate::Membership { negate, set } => match set {
                Some(set) => set.iter().any(|member| value.loose_eq(member)) != *negate,
                None => false,
            },
        }
    }
}

/// Compiled clauses plus an optional global search, ready to test rows.
///
/// Clauses naming unknown columns are dropped at construction. A search that
/// is blank after trimming is ignored.
pub struct FilterSet<'c, 'f, R> {
    clauses: Vec<(&'c ColumnDef<R>, Predicate<'f>)>,
    search: Option<String>,
    searchable: Vec<&'c ColumnDef<R>>,
}

impl<'c, 'f, R> FilterSet<'c, 'f, R> {
    /// Compiles clauses and search text against a column set.
    pub fn new(clauses: &'f [FilterClause], columns: &'c [ColumnDef<R>], search: Option<&str>) -> Self {
        let clauses = clauses
            .iter()
            .filter_map(|clause| match find_column(columns, &clause.column_id) {
                Some(column) => Some((column, Predicate::compile(clause))),
                None => {
                    log::debug!("filter clause skipped: unknown column {:?}", clause.column_id);
                    None
                }
            })
            .collect();

        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Self {
            clauses,
            search,
            searchable: columns.iter().filter(|c| c.filterable).collect(),
        }
    }

    /// Returns `true` if nothing would be filtered out.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.search.is_none()
    }

    /// Tests one row against every clause and the search text.
    pub fn matches(&self, row: &R) -> bool {
        let clauses_pass = self
            .clauses
            .iter()
            .all(|(column, predicate)| predicate.test(&column.accessor.resolve(row)));
        if !clauses_pass {
            return false;
        }

        match &self.search {
            Some(needle) => self.searchable.iter().any(|column| {
                column
                    .accessor
                    .resolve(row)
                    .to_string()
                    .to_lowercase()
                    .contains(needle.as_str())
            }),
            None => true,
        }
    }
}

/// Keeps the rows that satisfy every clause and the global search.
///
/// Clauses are combined with AND. The global search passes a row when any
/// filterable column's rendered value contains the search text, ignoring
/// case. Clauses on unknown columns have no effect and malformed operands
/// exclude every row; nothing here panics.
///
/// # Example
///
/// ```
/// use tabula_lib::engine::{filter, FilterClause};
/// use tabula_lib::model::{ColumnDef, ColumnType, Record};
///
/// let rows = vec![
///     Record::new().set("name", "Bravo").set("amount", 50i64),
///     Record::new().set("name", "Alpha").set("amount", 150i64),
///     Record::new().set("name", "Charlie").set("amount", 100i64),
/// ];
/// let columns = vec![
///     ColumnDef::new("name", ColumnType::Text),
///     ColumnDef::new("amount", ColumnType::Number),
/// ];
///
/// let kept = filter(&rows, &[FilterClause::gte("amount", 100i64)], &columns, None);
/// assert_eq!(kept.len(), 2);
///
/// let kept = filter(&rows, &[], &columns, Some("  ALP "));
/// assert_eq!(kept[0].get_str("name"), Some("Alpha"));
/// ```
pub fn filter<'a, R, I>(
    rows: I,
    clauses: &[FilterClause],
    columns: &[ColumnDef<R>],
    global_search: Option<&str>,
) -> Vec<&'a R>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
{
    let set = FilterSet::new(clauses, columns, global_search);
    if set.is_empty() {
        return rows.into_iter().collect();
    }
    rows.into_iter().filter(|row| set.matches(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;
    use crate::model::Record;

    fn rows() -> Vec<Record> {
        vec![
            Record::new().set("id", 1i64).set("name", "Bravo").set("amount", 50i64),
            Record::new().set("id", 2i64).set("name", "Alpha").set("amount", 150i64),
            Record::new().set("id", 3i64).set("name", "Charlie").set("amount", "100"),
            Record::new().set("id", 4i64).set("amount", "n/a"),
        ]
    }

    fn columns() -> Vec<ColumnDef<Record>> {
        vec![
            ColumnDef::new("id", ColumnType::Number).filterable(false),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("amount", ColumnType::Number),
        ]
    }

    fn ids(clauses: &[FilterClause], search: Option<&str>) -> Vec<i64> {
        let rows = rows();
        filter(&rows, clauses, &columns(), search)
            .iter()
            .map(|r| match r.get("id") {
                Some(Value::Int(id)) => *id,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn test_text_operators() {
        assert_eq!(ids(&[FilterClause::equals("name", "alpha")], None), vec![2]);
        assert_eq!(ids(&[FilterClause::contains("name", "AR")], None), vec![3]);
        assert_eq!(ids(&[FilterClause::starts_with("name", "b")], None), vec![1]);
        assert_eq!(ids(&[FilterClause::ends_with("name", "LIE")], None), vec![3]);
    }

    #[test]
    fn test_numeric_operators() {
        assert_eq!(ids(&[FilterClause::gt("amount", 50i64)], None), vec![2, 3]);
        assert_eq!(ids(&[FilterClause::gte("amount", 50i64)], None), vec![1, 2, 3]);
        assert_eq!(ids(&[FilterClause::lt("amount", "100")], None), vec![1]);
        assert_eq!(ids(&[FilterClause::lte("amount", 100.0)], None), vec![1, 3]);
        // non-numeric operand rejects everything
        assert!(ids(&[FilterClause::gt("amount", "lots")], None).is_empty());
    }

    #[test]
    fn test_between() {
        assert_eq!(ids(&[FilterClause::between("amount", 50i64, 100i64)], None), vec![1, 3]);
        let malformed = FilterClause::new("amount", FilterOperator::Between, Value::Int(5));
        assert!(ids(&[malformed], None).is_empty());
        let three = FilterClause::new("amount", FilterOperator::Between, vec![1i64, 2, 3]);
        assert!(ids(&[three], None).is_empty());
    }

    #[test]
    fn test_membership() {
        assert_eq!(ids(&[FilterClause::is_in("id", [1i64, 3])], None), vec![1, 3]);
        assert_eq!(ids(&[FilterClause::not_in("id", [1i64, 3])], None), vec![2, 4]);
        // raw comparison: "100" is a string, not the number 100
        assert!(ids(&[FilterClause::is_in("amount", [100i64])], None).is_empty());
        let malformed = FilterClause::new("id", FilterOperator::In, Value::Int(1));
        assert!(ids(&[malformed], None).is_empty());
    }

    #[test]
    fn test_null_values() {
        // row 4 has no name
        assert_eq!(ids(&[FilterClause::equals("name", Value::Null)], None), vec![4]);
        assert_eq!(ids(&[FilterClause::contains("name", "")], None), vec![1, 2, 3, 4]);
        assert_eq!(ids(&[FilterClause::not_in("name", ["Alpha"])], None), vec![1, 3]);
        assert!(!FilterClause::starts_with("name", "").test(&Value::Null));
    }

    #[test]
    fn test_conjunction_and_unknown_columns() {
        let clauses = [
            FilterClause::gte("amount", 50i64),
            FilterClause::contains("name", "a"),
            FilterClause::equals("missing", "x"),
        ];
        assert_eq!(ids(&clauses, None), vec![1, 2, 3]);
        let clauses = [FilterClause::gte("amount", 100i64), FilterClause::contains("name", "r")];
        assert_eq!(ids(&clauses, None), vec![3]);
    }

    #[test]
    fn test_global_search() {
        assert_eq!(ids(&[], Some("ha")), vec![2, 3]);
        assert_eq!(ids(&[], Some("   ")), vec![1, 2, 3, 4]);
        // id is not filterable, so searching for it finds nothing
        assert!(ids(&[], Some("4")).is_empty());
        assert_eq!(ids(&[FilterClause::gt("amount", 60i64)], Some("a")), vec![2, 3]);
    }

    #[test]
    fn test_parse_clause() {
        let clause: FilterClause = "amount:gte:100".parse().unwrap();
        assert_eq!(clause, FilterClause::gte("amount", 100i64));
        let clause: FilterClause = "amount:between:[1,5]".parse().unwrap();
        assert_eq!(clause, FilterClause::between("amount", 1i64, 5i64));
        let clause: FilterClause = "name:contains:alp".parse().unwrap();
        assert_eq!(clause.value, Value::from("alp"));
        assert!("name:contains".parse::<FilterClause>().is_err());
        assert!("name:like:x".parse::<FilterClause>().is_err());
    }

    #[test]
    fn test_deserialize_clause() {
        let clause: FilterClause =
            serde_json::from_str(r#"{"columnId":"id","operator":"notIn","value":[1,2]}"#).unwrap();
        assert_eq!(clause, FilterClause::not_in("id", [1i64, 2]));
    }
}
