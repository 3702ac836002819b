//! Parsing helpers for durations, lifetimes, and share ids.

use chrono::Duration;
use uuid::Uuid;

use crate::errors::CliError;

/// Parse a duration string (e.g., "1d", "24h", "10m").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    let value = value.trim();
    if value.len() < 2 {
        return Err(CliError::invalid_input(format!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        ))
        .into());
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| CliError::invalid_input(format!("Invalid duration number: {}", value)))?;
    if amount <= 0 {
        return Err(CliError::invalid_input(format!("Duration must be positive: {}", value)).into());
    }

    match unit {
        "d" => Ok(Duration::days(amount)),
        "h" => Ok(Duration::hours(amount)),
        "m" => Ok(Duration::minutes(amount)),
        "s" => Ok(Duration::seconds(amount)),
        _ => Err(CliError::invalid_input(format!(
            "Invalid duration unit: {} (use d/h/m/s)",
            unit
        ))
        .into()),
    }
}

/// Parse a share lifetime into whole hours.
///
/// Accepts a bare number of hours ("12") or a duration ("12h", "1d").
/// Lifetimes are kept in hours, so sub-hour durations are rejected.
pub fn parse_lifetime_hours(value: &str) -> anyhow::Result<u32> {
    let value = value.trim();
    if let Ok(hours) = value.parse::<u32>() {
        return Ok(hours);
    }

    let duration = parse_duration(value)?;
    if duration.num_seconds() % 3600 != 0 {
        return Err(CliError::invalid_input(format!(
            "Lifetime must be a whole number of hours: {}",
            value
        ))
        .into());
    }
    u32::try_from(duration.num_hours())
        .map_err(|_| CliError::invalid_input(format!("Lifetime too long: {}", value)).into())
}

/// Parse a share id (the link token).
///
/// Accepts the bare UUID or a full link whose last path segment is the id.
pub fn parse_share_id(value: &str) -> anyhow::Result<Uuid> {
    let token = value
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    Uuid::parse_str(token).map_err(|_| CliError::invalid_input(format!("Invalid share id: {}", value)).into())
}
