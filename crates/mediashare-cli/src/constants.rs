//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Share (or database) does not exist or has expired.
    pub const UNAVAILABLE: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Password required or wrong.
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable names.
pub mod env {
    pub const PASSWORD: &str = "MEDIASHARE_PASSWORD";
    pub const CONFIG: &str = "MEDIASHARE_CONFIG";
}
