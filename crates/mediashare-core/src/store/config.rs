//! Entry store limits and policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::error::{Result, ShareError};

/// Default maximum entry lifetime, in hours.
pub const DEFAULT_MAX_LIFETIME_HOURS: u32 = 24;

/// Largest `max_lifetime_hours` a store accepts (one leap year).
pub const LIFETIME_HOURS_CEILING: u32 = 24 * 366;

/// Default content ceiling (1 MiB).
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 1024 * 1024;

/// Default number of retries for transient backend errors.
pub const DEFAULT_IO_RETRIES: u32 = 3;

/// What `create` does with a lifetime above the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifetimePolicy {
    /// Shorten the lifetime to the maximum
    #[default]
    Clamp,

    /// Fail with a validation error
    Reject,
}

impl std::fmt::Display for LifetimePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifetimePolicy::Clamp => write!(f, "clamp"),
            LifetimePolicy::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for LifetimePolicy {
    type Err = ShareError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(LifetimePolicy::Clamp),
            "reject" => Ok(LifetimePolicy::Reject),
            other => Err(ShareError::Validation(format!(
                "Unknown lifetime policy '{}' (expected clamp or reject)",
                other
            ))),
        }
    }
}

/// Configuration for an [`EntryStore`](super::EntryStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub max_lifetime_hours: u32,
    pub max_content_bytes: usize,
    pub lifetime_policy: LifetimePolicy,

    /// Extra attempts after the first failed backend call
    pub io_retries: u32,

    /// Base delay between attempts; attempt `n` waits `n * retry_backoff`
    pub retry_backoff: Duration,

    /// Argon2id costs for newly sealed entries
    pub kdf: KdfParams,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_lifetime_hours: DEFAULT_MAX_LIFETIME_HOURS,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
            lifetime_policy: LifetimePolicy::default(),
            io_retries: DEFAULT_IO_RETRIES,
            retry_backoff: Duration::from_millis(25),
            kdf: KdfParams::default(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_lifetime_hours == 0 {
            return Err(ShareError::Validation(
                "max_lifetime_hours must be at least 1".to_string(),
            ));
        }
        if self.max_lifetime_hours > LIFETIME_HOURS_CEILING {
            return Err(ShareError::Validation(format!(
                "max_lifetime_hours must be at most {}",
                LIFETIME_HOURS_CEILING
            )));
        }
        if self.max_content_bytes == 0 {
            return Err(ShareError::Validation(
                "max_content_bytes must be at least 1".to_string(),
            ));
        }
        self.kdf
            .validate()
            .map_err(|e| ShareError::Validation(format!("Invalid KDF parameters: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_limits() {
        let config = StoreConfig::default();
        assert_eq!(config.max_lifetime_hours, 24);
        assert_eq!(config.max_content_bytes, 1_048_576);
        assert_eq!(config.lifetime_policy, LifetimePolicy::Clamp);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = StoreConfig {
            max_lifetime_hours: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ShareError::Validation(_))));
    }

    #[test]
    fn test_max_lifetime_is_bounded() {
        let at_ceiling = StoreConfig {
            max_lifetime_hours: LIFETIME_HOURS_CEILING,
            ..StoreConfig::default()
        };
        assert!(at_ceiling.validate().is_ok());

        for max_lifetime_hours in [LIFETIME_HOURS_CEILING + 1, 80_000_000, u32::MAX] {
            let config = StoreConfig {
                max_lifetime_hours,
                ..StoreConfig::default()
            };
            assert!(matches!(config.validate(), Err(ShareError::Validation(_))));
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("Reject".parse::<LifetimePolicy>().unwrap(), LifetimePolicy::Reject);
        assert_eq!(" clamp ".parse::<LifetimePolicy>().unwrap(), LifetimePolicy::Clamp);
        assert!("truncate".parse::<LifetimePolicy>().is_err());
        assert_eq!(LifetimePolicy::Reject.to_string(), "reject");
    }
}
