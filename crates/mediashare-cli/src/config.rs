use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mediashare_core::crypto::KdfParams;
use mediashare_core::store::{
    DEFAULT_IO_RETRIES, DEFAULT_MAX_CONTENT_BYTES, DEFAULT_MAX_LIFETIME_HOURS,
};
use mediashare_core::{LifetimePolicy, StoreConfig};

/// Sweep expired shares hourly unless configured otherwise.
pub const DEFAULT_REAPER_INTERVAL_SECONDS: u64 = 3600;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MediashareConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub crypto: CryptoSection,
    #[serde(default)]
    pub reaper: ReaperSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_lifetime_hours: u32,
    pub default_lifetime_hours: u32,
    pub max_content_bytes: usize,
    pub lifetime_policy: LifetimePolicy,
    pub io_retries: u32,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_lifetime_hours: DEFAULT_MAX_LIFETIME_HOURS,
            default_lifetime_hours: DEFAULT_MAX_LIFETIME_HOURS,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            lifetime_policy: LifetimePolicy::default(),
            io_retries: DEFAULT_IO_RETRIES,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoSection {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for CryptoSection {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_kib: params.memory_kib,
            iterations: params.iterations,
            parallelism: params.parallelism,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperSection {
    pub interval_seconds: u64,
}

impl Default for ReaperSection {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_REAPER_INTERVAL_SECONDS,
        }
    }
}

impl MediashareConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            store: StoreSection {
                path: Some(db_path.to_string_lossy().to_string()),
            },
            ..Self::default()
        }
    }

    /// Entry store settings derived from the `[limits]` and `[crypto]` sections.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_lifetime_hours: self.limits.max_lifetime_hours,
            max_content_bytes: self.limits.max_content_bytes,
            lifetime_policy: self.limits.lifetime_policy,
            io_retries: self.limits.io_retries,
            kdf: KdfParams::new(
                self.crypto.memory_kib,
                self.crypto.iterations,
                self.crypto.parallelism,
            ),
            ..StoreConfig::default()
        }
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper.interval_seconds.max(1))
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("mediashare.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<MediashareConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &MediashareConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("mediashare"));
        }
    }
    Ok(home_dir()?.join(".config").join("mediashare"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("mediashare"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("mediashare"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
