//! Error types for Mediashare core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.
//!
//! `NotFound`, `Expired`, `AuthRequired` and `AuthFailure` are expected
//! outcomes of a fetch rather than faults. Callers that want to avoid
//! confirming whether a link ever existed should collapse the first two
//! via [`ShareError::is_unavailable`].

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for Mediashare operations.
pub type Result<T> = std::result::Result<T, ShareError>;

/// Core error type for Mediashare operations.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Bad input, rejected before anything is persisted
    #[error("Validation error: {0}")]
    Validation(String),

    /// No entry with this id
    #[error("Entry not found: {0}")]
    NotFound(Uuid),

    /// Entry exists (or existed) but its expiry has passed
    #[error("Entry expired: {0}")]
    Expired(Uuid),

    /// Entry is password protected and no password was supplied
    #[error("Password required")]
    AuthRequired,

    /// Wrong password or corrupted payload
    #[error("Incorrect password or corrupted data")]
    AuthFailure,

    /// An entry with this id is already persisted
    #[error("Entry already exists: {0}")]
    Conflict(Uuid),

    /// Key derivation, encryption, or randomness failure while sealing
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic, not retried)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored record or database file that cannot be decoded
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ShareError {
    /// True for the outcomes a caller should render as "link unavailable".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ShareError::NotFound(_) | ShareError::Expired(_))
    }

    /// True for outcomes that ask the caller to (re-)prompt for a password.
    pub fn is_auth(&self) -> bool {
        matches!(self, ShareError::AuthRequired | ShareError::AuthFailure)
    }

    /// True for backend failures worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            ShareError::Io { .. } => true,
            ShareError::Sqlite { source } => matches!(
                source.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy)
                    | Some(rusqlite::ErrorCode::DatabaseLocked)
                    | Some(rusqlite::ErrorCode::SystemIoFailure)
            ),
            _ => false,
        }
    }
}
