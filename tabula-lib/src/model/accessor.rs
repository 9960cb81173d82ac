//! Field accessors

use std::fmt;
use std::sync::Arc;

use super::FieldSource;
use super::Value;

/// Reads one field from a row: either by key or through a projection.
///
/// Key accessors go through [`FieldSource`]; a missing key reads as
/// [`Value::Null`]. Projections are plain functions of the row and put no
/// bound on it, so typed row structs need no [`FieldSource`] impl. A
/// projection that panics is a programming error and the panic is not caught.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{Accessor, Record, Value};
///
/// let row = Record::new().set("first", "Ada").set("last", "Lovelace");
///
/// let first: Accessor<Record> = Accessor::key("first");
/// let full = Accessor::projection(|r: &Record| {
///     Value::from(format!("{} {}", r.get_str("first").unwrap_or(""), r.get_str("last").unwrap_or("")))
/// });
///
/// assert_eq!(first.resolve(&row), Value::from("Ada"));
/// assert_eq!(full.resolve(&row), Value::from("Ada Lovelace"));
/// assert_eq!(first.as_key(), Some("first"));
/// ```
pub struct Accessor<R> {
    key: Option<String>,
    read: Arc<dyn Fn(&R) -> Value + Send + Sync>,
}

impl<R: FieldSource> Accessor<R> {
    /// Creates a key accessor.
    pub fn key(key: impl Into<String>) -> Self {
        let key = key.into();
        let lookup = key.clone();
        Self {
            key: Some(key),
            read: Arc::new(move |row: &R| row.field(&lookup).unwrap_or(Value::Null)),
        }
    }
}

impl<R> Accessor<R> {
    /// Creates a projection accessor.
    pub fn projection<F>(f: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        Self {
            key: None,
            read: Arc::new(f),
        }
    }

    /// Returns the key if this is a key accessor.
    pub fn as_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Resolves the accessor against a row.
    pub fn resolve(&self, row: &R) -> Value {
        (self.read)(row)
    }
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            read: Arc::clone(&self.read),
        }
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => f.debug_tuple("Key").field(key).finish(),
            None => f.write_str("Projection(..)"),
        }
    }
}

impl<R: FieldSource> From<&str> for Accessor<R> {
    fn from(key: &str) -> Self {
        Accessor::key(key)
    }
}

impl<R: FieldSource> From<String> for Accessor<R> {
    fn from(key: String) -> Self {
        Accessor::key(key)
    }
}
