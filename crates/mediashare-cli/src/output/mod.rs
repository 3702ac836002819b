//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying shares
//! in various formats (JSON, plain text).

mod json;
mod text;

// Re-export public API
pub use json::{content_json, created_json, report_json, summary_json};
pub use text::{format_remaining, print_report, print_summary};
