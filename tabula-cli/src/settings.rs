//! Grid configuration file

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tabula_lib::GridConfig;

use crate::error::CliError;
use crate::paths;

/// Loads the grid config.
///
/// An explicit path must exist. Without one, `config.json` in the platform
/// config directory is used if present, and the defaults otherwise.
pub fn load(explicit: Option<&Path>) -> Result<GridConfig, CliError> {
    if let Some(path) = explicit {
        return read(path);
    }
    let Some(path) = paths::config_file() else {
        return Ok(GridConfig::default());
    };
    match read(&path) {
        Err(CliError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(GridConfig::default())
        }
        other => other,
    }
}

fn read(path: &Path) -> Result<GridConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
