//! Reading rows and column definitions

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tabula_lib::error::ParseError;
use tabula_lib::model::{ColumnDef, ColumnType, Record, Value};

use crate::error::CliError;

/// A column given on the command line as `id[:type]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub id: String,
    pub kind: ColumnType,
}

impl FromStr for ColumnSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, kind) = match s.split_once(':') {
            Some((id, kind)) => (id.trim(), kind.parse()?),
            None => (s.trim(), ColumnType::Text),
        };
        if id.is_empty() {
            return Err(ParseError::malformed("column", s));
        }
        Ok(Self {
            id: id.to_string(),
            kind,
        })
    }
}

/// Reads a JSON array of objects. Elements that are not objects are skipped.
pub fn load_rows(path: &Path) -> Result<Vec<Record>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json: serde_json::Value = serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let serde_json::Value::Array(items) = json else {
        return Err(CliError::NotRows(path.to_path_buf()));
    };

    let total = items.len();
    let rows: Vec<Record> = items.into_iter().filter_map(Record::from_json).collect();
    if rows.len() < total {
        log::warn!("skipped {} non-object rows in {}", total - rows.len(), path.display());
    }
    log::debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Builds column definitions from the specs, or infers them from the rows.
pub fn columns(specs: &[ColumnSpec], rows: &[Record]) -> Vec<ColumnDef<Record>> {
    if specs.is_empty() {
        return infer_columns(rows);
    }
    specs
        .iter()
        .map(|spec| ColumnDef::new(spec.id.clone(), spec.kind))
        .collect()
}

/// One text, number or boolean column per field, in field name order.
///
/// A field is a number or boolean column only if every non-null value in it
/// is of that kind.
fn infer_columns(rows: &[Record]) -> Vec<ColumnDef<Record>> {
    let mut kinds: BTreeMap<&str, Option<ColumnType>> = BTreeMap::new();

    for row in rows {
        for (field, value) in row.fields() {
            let seen = kinds.entry(field.as_str()).or_insert(None);
            let kind = match value {
                Value::Null => continue,
                Value::Int(_) | Value::Float(_) | Value::Decimal(_) => ColumnType::Number,
                Value::Bool(_) => ColumnType::Boolean,
                _ => ColumnType::Text,
            };
            *seen = match *seen {
                None => Some(kind),
                Some(prev) if prev == kind => Some(prev),
                Some(_) => Some(ColumnType::Text),
            };
        }
    }

    kinds
        .into_iter()
        .map(|(id, kind)| ColumnDef::new(id, kind.unwrap_or_default()))
        .collect()
}
