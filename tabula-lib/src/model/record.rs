//! Dynamic row record and key lookup

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;

/// Key lookup on a row.
///
/// This is what [`Accessor::key`](super::Accessor::key) resolves through.
/// Rows that are only read through projections do not need it.
pub trait FieldSource {
    /// Returns the value stored under `key`, or `None` if the row has no
    /// such field.
    fn field(&self, key: &str) -> Option<Value>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, key: &str) -> Option<Value> {
        (**self).field(key)
    }
}

impl FieldSource for HashMap<String, Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl FieldSource for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Option<Value> {
        self.get(key).cloned().map(Value::from)
    }
}

impl FieldSource for serde_json::Value {
    fn field(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.field(key))
    }
}

/// A dynamic row.
///
/// Records hold field values as a `HashMap<String, Value>`. They are the
/// row type used by the command-line front-end and by tests; applications
/// with their own row structs can use projections instead.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{FieldSource, Record, Value};
///
/// let record = Record::new()
///     .set("id", 1i64)
///     .set("name", "Bravo")
///     .set("amount", 50i64);
///
/// assert_eq!(record.get_str("name"), Some("Bravo"));
/// assert_eq!(record.field("amount"), Some(Value::Int(50)));
/// assert_eq!(record.field("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    ///
    /// Returns `None` if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(map) => Some(Self {
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            }),
            _ => None,
        }
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as a string slice if it holds a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }
}

impl FieldSource for Record {
    fn field(&self, key: &str) -> Option<Value> {
        self.fields.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_object() {
        let record = Record::from_json(serde_json::json!({
            "id": 7,
            "name": "Alpha",
            "tags": ["a", "b"],
            "owner": null
        }))
        .unwrap();

        assert_eq!(record.field("id"), Some(Value::Int(7)));
        assert_eq!(record.get_str("name"), Some("Alpha"));
        assert_eq!(
            record.field("tags"),
            Some(Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(record.field("owner"), Some(Value::Null));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(Record::from_json(serde_json::json!([1, 2])).is_none());
    }

    #[test]
    fn test_json_field_source() {
        let row = serde_json::json!({ "amount": 12.5 });
        assert_eq!(row.field("amount"), Some(Value::Float(12.5)));
        assert_eq!(row.field("missing"), None);
    }
}
