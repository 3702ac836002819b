//! Helper functions for the CLI.
//!
//! This module provides:
//! - Input handling (password prompts, share content reading)
//! - Parsing utilities (durations, lifetimes, share ids)

mod input;
mod parsing;

// Re-export public API
pub use input::{password_from_env, prompt_fetch_password, prompt_share_password, read_share_content};
pub use parsing::{parse_duration, parse_lifetime_hours, parse_share_id};
