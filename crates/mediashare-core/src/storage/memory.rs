//! In-memory persistence backend.
//!
//! Suitable for tests and single-process deployments where losing
//! entries on restart is acceptable.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use uuid::Uuid;

use super::traits::Persistence;
use super::types::Entry;
use crate::error::{Result, ShareError};

/// Concurrent in-memory entry storage keyed by id.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: DashMap<Uuid, Entry>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of physically stored records (expired ones included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.entries.contains_key(id)
    }
}

impl Persistence for MemoryPersistence {
    fn put(&self, entry: &Entry) -> Result<()> {
        match self.entries.entry(entry.id) {
            MapEntry::Occupied(_) => Err(ShareError::Conflict(entry.id)),
            MapEntry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(())
            }
        }
    }

    fn get(&self, id: &Uuid) -> Result<Option<Entry>> {
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.value().expires_at <= before)
            .map(|entry| *entry.key())
            .collect())
    }
}
