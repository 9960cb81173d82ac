//! Where tabula keeps its files
//!
//! | File | Directory |
//! |------|-----------|
//! | `layouts.db` | data |
//! | `config.json` | config |
//! | `latest.log` and archived `tabula-*.log` | cache |
//!
//! Directories come from [`directories::ProjectDirs`], so they follow each
//! platform's conventions.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";
const ARCHIVE_PREFIX: &str = "tabula-";

/// Archived logs kept after rotation.
const KEEP_ARCHIVES: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "tabula", "tabula")
}

pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// SQLite database shared by every `tabula layout` key.
pub fn layouts_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("layouts.db"))
}

/// Grid settings read when `--config` is not given.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Log written by the current run, inside the log directory `dir`.
pub fn latest_log(dir: &Path) -> PathBuf {
    dir.join(LATEST_LOG)
}

/// Archives the previous run's log in `dir` and prunes old archives.
///
/// Must run before the logger opens [`latest_log`].
pub fn rotate_logs(dir: &Path) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        let _ = fs::rename(&latest, dir.join(format!("{}{}.log", ARCHIVE_PREFIX, stamp)));
    }
    prune_archives(dir);
}

fn prune_archives(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archives: Vec<(Option<std::time::SystemTime>, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".log")
        })
        .map(|entry| (entry.metadata().and_then(|m| m.modified()).ok(), entry.path()))
        .collect();
    if archives.len() <= KEEP_ARCHIVES {
        return;
    }

    // oldest first; names break mtime ties
    archives.sort();
    let excess = archives.len() - KEEP_ARCHIVES;
    for (_, path) in archives.into_iter().take(excess) {
        let _ = fs::remove_file(path);
    }
}
