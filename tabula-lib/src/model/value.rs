//! Value enum for dynamic cell values

use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A dynamic value read from a row.
///
/// Every accessor resolves to a `Value`. The engine never inspects rows
/// directly; comparison, filtering and aggregation all work on values.
///
/// # Type Mapping
///
/// | Column type | Typical variant |
/// |-------------|-----------------|
/// | text, custom | `String` |
/// | number, percentage | `Int`, `Float` |
/// | currency | `Decimal` |
/// | boolean | `Bool` |
/// | date | `Date` |
/// | datetime | `DateTime` |
///
/// Values are loosely typed on purpose: a numeric column holding `"42"` still
/// sorts and aggregates as a number, because coercion follows the column type
/// rather than the variant.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Value;
///
/// let name = Value::from("Contoso");
/// let amount = Value::from(150i64);
/// let active = Value::from(true);
/// let empty = Value::Null;
///
/// assert_eq!(amount.as_f64(), Some(150.0));
/// assert_eq!(name.to_string(), "Contoso");
/// assert!(empty.is_null());
/// assert!(active.as_bool().unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Arbitrary precision decimal, used for currency.
    Decimal(Decimal),
    /// GUID/UUID value.
    Guid(Uuid),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// A list of values (filter ranges and sets).
    List(Vec<Value>),
    /// Fallback for JSON values with no better mapping.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Json(serde_json::Value::Null))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Decimal(_) => "decimal",
            Value::Guid(_) => "guid",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Json(_) => "json",
        }
    }

    /// Returns the list items if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    // =========================================================================
    // Coercion
    // =========================================================================

    /// Coerces the value to a number.
    ///
    /// Integers, floats and decimals convert directly. Strings are trimmed and
    /// parsed; blank or non-numeric strings yield `None`. Booleans, dates and
    /// lists are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            Value::String(s) => parse_number(s),
            Value::Json(serde_json::Value::Number(n)) => n.as_f64(),
            Value::Json(serde_json::Value::String(s)) => parse_number(s),
            _ => None,
        }
    }

    /// Coerces the value to a finite number, discarding NaN and infinities.
    pub fn as_finite_f64(&self) -> Option<f64> {
        self.as_f64().filter(|v| v.is_finite())
    }

    /// Coerces the value to milliseconds since the Unix epoch.
    ///
    /// Dates are taken at midnight UTC. Integers are read as epoch
    /// milliseconds. Strings are parsed as RFC 3339 or a handful of common
    /// ISO-like layouts.
    pub fn as_timestamp_millis(&self) -> Option<i64> {
        match self {
            Value::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis()),
            Value::DateTime(dt) => Some(dt.timestamp_millis()),
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.is_finite() => Some(*v as i64),
            Value::String(s) => parse_timestamp(s).map(|dt| dt.timestamp_millis()),
            Value::Json(serde_json::Value::String(s)) => {
                parse_timestamp(s).map(|dt| dt.timestamp_millis())
            }
            Value::Json(serde_json::Value::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Coerces the value to a UTC date and time.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.as_timestamp_millis()?)
    }

    /// Coerces the value to a boolean.
    ///
    /// Numbers are `true` when non-zero; strings accept `true/false`,
    /// `yes/no` and `1/0` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Json(serde_json::Value::Bool(b)) => Some(*b),
            Value::Int(v) => Some(*v != 0),
            Value::Float(v) => Some(*v != 0.0),
            Value::String(s) => parse_bool(s),
            Value::Json(serde_json::Value::String(s)) => parse_bool(s),
            _ => None,
        }
    }

    /// Compares two values for set membership.
    ///
    /// Numbers are equal across `Int`, `Float` and `Decimal` when their
    /// numeric values match. Strings must match exactly. Nothing is rendered
    /// to text first, so `1` is not a member of `["1"]`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        if self.is_number() && other.is_number() {
            return match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
        }
        match (self, other) {
            (Value::Json(a), b) | (b, Value::Json(a)) => &Value::from(a.clone()) == b,
            (a, b) => a == b,
        }
    }

    fn is_number(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Float(_) | Value::Decimal(_)
        ) || matches!(self, Value::Json(serde_json::Value::Number(_)))
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a date or date-time string into UTC.
///
/// Strings without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Value {
    /// Renders the value as display text. Null renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Guid(v) => write!(f, "{}", v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Json(serde_json::Value::Null) => Ok(()),
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(other) => write!(f, "{}", other),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Maps JSON onto the closest variant.
///
/// Integral numbers become `Int`, other numbers `Float`, arrays `List`.
/// Objects are kept as `Json`.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            other @ serde_json::Value::Object(_) => Value::Json(other),
        }
    }
}
