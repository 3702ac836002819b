//! JSON output formatting for shares.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use mediashare_core::report::MediaReport;
use mediashare_core::storage::EntrySummary;
use uuid::Uuid;

/// Convert share metadata to JSON for output.
pub fn summary_json(summary: &EntrySummary, now: DateTime<Utc>) -> serde_json::Value {
    let remaining = (summary.expires_at - now).num_seconds().max(0);
    serde_json::json!({
        "id": summary.id,
        "created_at": summary.created_at,
        "expires_at": summary.expires_at,
        "protected": summary.protected,
        "remaining_seconds": remaining,
    })
}

/// JSON for a freshly created share.
pub fn created_json(summary: &EntrySummary) -> serde_json::Value {
    serde_json::json!({
        "id": summary.id,
        "expires_at": summary.expires_at,
        "protected": summary.protected,
    })
}

/// Share content as JSON. Content that is not UTF-8 is base64 encoded.
pub fn content_json(id: &Uuid, content: &[u8]) -> serde_json::Value {
    match std::str::from_utf8(content) {
        Ok(text) => serde_json::json!({ "id": id, "content": text }),
        Err(_) => serde_json::json!({ "id": id, "content_base64": STANDARD.encode(content) }),
    }
}

pub fn report_json(id: &Uuid, report: &MediaReport) -> serde_json::Value {
    serde_json::json!({ "id": id, "report": report })
}
