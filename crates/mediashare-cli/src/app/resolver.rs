//! Path resolution for config and database files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_db_path, MediashareConfig};
use crate::constants::env;

/// Resolve the config file path, checking MEDIASHARE_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the database path: `--db` / MEDIASHARE_DB, then config, then the XDG default.
pub fn resolve_db_path(cli: &Cli, config: &MediashareConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Some(path) = config.store.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_db_path()
}

/// Error message when the database file is missing.
pub fn missing_db_message(path: &Path) -> String {
    format!(
        "No share database found at {}\n\nRun:\n  mediashare init\n\nOr specify a database path:\n  MEDIASHARE_DB=/path/to/shares.db mediashare init",
        path.display()
    )
}
