//! Share password validation.
//!
//! Strength hints (minimum lengths, character classes) belong to whatever
//! front end collects the password. The core only refuses passwords that
//! would make protection meaningless.

use crate::error::{Result, ShareError};

/// Maximum password length in bytes.
const MAX_PASSWORD_BYTES: usize = 1024;

/// Validate a password supplied at share creation.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At most 1024 bytes
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(ShareError::Validation(
            "Password cannot be empty".to_string(),
        ));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ShareError::Validation(format!(
            "Password too long (max {} bytes)",
            MAX_PASSWORD_BYTES
        )));
    }

    Ok(())
}
