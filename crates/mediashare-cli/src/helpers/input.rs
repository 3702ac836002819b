//! Input handling helpers for passwords and share content.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use dialoguer::Password;
use mediashare_core::crypto::validate_password;

use crate::constants::env;
use crate::errors::CliError;

/// Read the share password from MEDIASHARE_PASSWORD, if set and non-blank.
pub fn password_from_env() -> Option<String> {
    std::env::var(env::PASSWORD)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Prompt for a new share password with confirmation.
pub fn prompt_share_password() -> anyhow::Result<String> {
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "--password-prompt needs a terminal. Set {} instead.",
            env::PASSWORD
        ))
        .into());
    }
    loop {
        let password = Password::new()
            .with_prompt("Share password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        if let Err(err) = validate_password(&password) {
            eprintln!("Password does not meet requirements: {}", err);
            continue;
        }
        return Ok(password);
    }
}

/// Prompt once for the password of an existing share.
pub fn prompt_fetch_password() -> anyhow::Result<String> {
    if !io::stdin().is_terminal() {
        return Err(CliError::auth_failed_with_hint(
            "This share is password protected",
            format!("Hint: Set {} or run interactively.", env::PASSWORD),
        )
        .into());
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Read share content from --content, a file, or stdin.
pub fn read_share_content(content: Option<String>, file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    if let Some(value) = content {
        return Ok(value.into_bytes());
    }

    match file {
        Some(path) if path != Path::new("-") => std::fs::read(path).map_err(|e| {
            CliError::invalid_input(format!("Failed to read {}: {}", path.display(), e)).into()
        }),
        _ => {
            if io::stdin().is_terminal() {
                return Err(CliError::invalid_input(
                    "No content provided. Pass a file, --content, or pipe a report via stdin.",
                )
                .into());
            }
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            Ok(buffer)
        }
    }
}
