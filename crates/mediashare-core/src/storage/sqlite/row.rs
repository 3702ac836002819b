//! Entry row type for database queries.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::crypto::{KdfParams, SealedPayload};
use crate::error::{Result, ShareError};
use crate::storage::types::{Entry, Payload};

/// Columns selected for every entry read, in `EntryRow` field order.
pub const ENTRY_COLUMNS: &str = "id, created_at, expires_at, protected, payload, salt, nonce, kdf";

/// Fixed-width RFC 3339 so that text order equals time order.
pub fn timestamp_to_sql(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn timestamp_from_sql(column: &str, value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| ShareError::Corrupt(format!("Invalid {} timestamp: {}", column, e)))?
        .with_timezone(&Utc))
}

/// Raw row data from the entries table, before parsing into domain types.
#[derive(Debug)]
pub struct EntryRow {
    pub id: String,
    pub created_at: String,
    pub expires_at: String,
    pub protected: bool,
    pub payload: Vec<u8>,
    pub salt: Option<Vec<u8>>,
    pub nonce: Option<Vec<u8>>,
    pub kdf: Option<String>,
}

impl EntryRow {
    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            created_at: row.get(1)?,
            expires_at: row.get(2)?,
            protected: row.get(3)?,
            payload: row.get(4)?,
            salt: row.get(5)?,
            nonce: row.get(6)?,
            kdf: row.get(7)?,
        })
    }

    pub fn from_entry(entry: &Entry) -> Self {
        let (payload, salt, nonce, kdf) = match &entry.payload {
            Payload::Plain(bytes) => (bytes.clone(), None, None, None),
            Payload::Sealed(sealed) => (
                sealed.ciphertext.clone(),
                Some(sealed.salt.clone()),
                Some(sealed.nonce.clone()),
                Some(sealed.kdf.to_string()),
            ),
        };

        Self {
            id: entry.id.to_string(),
            created_at: timestamp_to_sql(&entry.created_at),
            expires_at: timestamp_to_sql(&entry.expires_at),
            protected: entry.is_protected(),
            payload,
            salt,
            nonce,
            kdf,
        }
    }
}

impl TryFrom<EntryRow> for Entry {
    type Error = ShareError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| ShareError::Corrupt(format!("Invalid entry UUID: {}", e)))?;
        let created_at = timestamp_from_sql("created_at", &row.created_at)?;
        let expires_at = timestamp_from_sql("expires_at", &row.expires_at)?;

        let payload = if row.protected {
            let (salt, nonce, kdf) = match (row.salt, row.nonce, row.kdf) {
                (Some(salt), Some(nonce), Some(kdf)) => (salt, nonce, kdf),
                _ => {
                    return Err(ShareError::Corrupt(format!(
                        "Protected entry {} is missing salt, nonce, or KDF parameters",
                        id
                    )))
                }
            };
            let kdf: KdfParams = kdf.parse().map_err(|e| {
                ShareError::Corrupt(format!("Invalid KDF parameters for {}: {}", id, e))
            })?;
            Payload::Sealed(SealedPayload {
                ciphertext: row.payload,
                salt,
                nonce,
                kdf,
            })
        } else {
            Payload::Plain(row.payload)
        };

        Ok(Entry {
            id,
            created_at,
            expires_at,
            payload,
        })
    }
}
