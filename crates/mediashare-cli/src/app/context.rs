//! Application context for the Mediashare CLI.
//!
//! Provides a unified context that combines CLI arguments with
//! lazily-loaded configuration.

use once_cell::unsync::OnceCell;
use std::path::PathBuf;

use mediashare_core::storage::SqlitePersistence;
use mediashare_core::{EntryStore, SystemClock};

use crate::cli::Cli;
use crate::config::{read_config, MediashareConfig};
use crate::errors::{share_error, CliError};

use super::resolver::{missing_db_message, resolve_config_path, resolve_db_path};

/// The store every command works against.
pub type CliStore = EntryStore<SqlitePersistence, SystemClock>;

/// Application context that bundles CLI args with configuration.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<MediashareConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    ///
    /// A missing config file is not an error; every setting has a default.
    pub fn config(&self) -> anyhow::Result<&MediashareConfig> {
        self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                read_config(&path)
            } else {
                Ok(MediashareConfig::default())
            }
        })
    }

    /// Path of the share database for this invocation.
    pub fn db_path(&self) -> anyhow::Result<PathBuf> {
        resolve_db_path(self.cli, self.config()?)
    }

    /// Open the existing share database and wrap it in an entry store.
    pub fn open_store(&self) -> anyhow::Result<CliStore> {
        let path = self.db_path()?;
        if !path.exists() {
            return Err(CliError::Unavailable {
                message: missing_db_message(&path),
                hint: None,
            }
            .into());
        }

        let persistence = SqlitePersistence::open(&path)?;
        let store_config = self.config()?.store_config();
        EntryStore::new(persistence, SystemClock, store_config).map_err(share_error)
    }
}
