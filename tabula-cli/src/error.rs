//! CLI error type

use std::path::PathBuf;

use tabula_lib::error::ParseError;
use tabula_lib::error::StoreError;
use thiserror::Error;

/// Errors that end a `tabula` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a JSON array of objects in {0}")]
    NotRows(PathBuf),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("layout store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no data directory available; pass --db")]
    NoDataDir,
    #[error("no cache directory available")]
    NoCacheDir,
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}
