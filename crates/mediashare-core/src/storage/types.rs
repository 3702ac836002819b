//! Core data types for the storage layer.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::SealedPayload;

/// Stored form of an entry's content.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    /// Content stored as-is (no password supplied)
    Plain(Vec<u8>),

    /// Content sealed under a password
    Sealed(SealedPayload),
}

impl Payload {
    pub fn is_protected(&self) -> bool {
        matches!(self, Payload::Sealed(_))
    }

    /// Size of the stored bytes (ciphertext for sealed payloads).
    pub fn stored_len(&self) -> usize {
        match self {
            Payload::Plain(bytes) => bytes.len(),
            Payload::Sealed(sealed) => sealed.ciphertext.len(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Plain(bytes) => write!(f, "Plain([{} bytes])", bytes.len()),
            Payload::Sealed(sealed) => f.debug_tuple("Sealed").field(sealed).finish(),
        }
    }
}

/// Lifecycle position of an entry at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// `now < expires_at`
    Active,

    /// `now >= expires_at`, record may still be persisted
    Expired,
}

/// A persisted share.
///
/// Entries are immutable once written; the only later change is deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Random identifier, doubles as the link token
    pub id: Uuid,

    /// When this entry was created
    pub created_at: DateTime<Utc>,

    /// First instant at which the entry is no longer readable
    pub expires_at: DateTime<Utc>,

    /// Content, plain or sealed
    pub payload: Payload,
}

impl Entry {
    pub fn is_protected(&self) -> bool {
        self.payload.is_protected()
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> EntryState {
        if now >= self.expires_at {
            EntryState::Expired
        } else {
            EntryState::Active
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == EntryState::Expired
    }

    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            created_at: self.created_at,
            expires_at: self.expires_at,
            protected: self.is_protected(),
        }
    }
}

/// Entry metadata without content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub protected: bool,
}
