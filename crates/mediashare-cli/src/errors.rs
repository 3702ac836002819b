//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use mediashare_core::ShareError;

use crate::constants::env;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Share or database missing. Shares that expired report the same way.
    Unavailable {
        message: String,
        hint: Option<String>,
    },

    /// Password required or wrong
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Database integrity check failed
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Unavailable { message, hint } | CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "Integrity check failed: {}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// The single message shown for both missing and expired shares, so a
    /// caller cannot tell whether a link ever existed.
    pub fn link_unavailable() -> Self {
        CliError::Unavailable {
            message: "Link unavailable: the share does not exist or has expired".to_string(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::Unavailable { .. } => exit_codes::UNAVAILABLE,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

/// Map a core error to the CLI's user-facing error.
///
/// Expected fetch outcomes and validation failures become a [`CliError`]
/// with its own exit code; anything else passes through unchanged.
pub fn share_error(err: ShareError) -> anyhow::Error {
    match err {
        ShareError::NotFound(_) | ShareError::Expired(_) => CliError::link_unavailable().into(),
        ShareError::AuthRequired => CliError::auth_failed_with_hint(
            "This share is password protected",
            format!(
                "Hint: Set {} or pass --password-prompt.",
                env::PASSWORD
            ),
        )
        .into(),
        ShareError::AuthFailure => CliError::auth_failed(ShareError::AuthFailure.to_string()).into(),
        ShareError::Validation(message) => CliError::invalid_input(message).into(),
        other => anyhow::Error::new(other),
    }
}
