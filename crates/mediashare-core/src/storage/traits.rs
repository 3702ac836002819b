//! Persistence trait definition.
//!
//! The `Persistence` trait is the only thing the entry store knows about
//! durable storage. Backends (SQLite, in-memory) implement it; the store
//! receives one at construction instead of reaching for global state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::Entry;
use crate::error::Result;

/// Durable storage for entries.
///
/// All implementations must ensure:
/// - `put` never overwrites an existing record (entries are immutable)
/// - `delete` of a missing id is a successful no-op
/// - Per-id operations are atomic
/// - Concurrent calls from multiple threads are safe
pub trait Persistence: Send + Sync {
    /// Persist a new entry.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Conflict` if an entry with the same id exists,
    /// or a storage error if the write fails.
    fn put(&self, entry: &Entry) -> Result<()>;

    /// Get an entry by ID.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(entry))` if found, `Ok(None)` if not found. Expiry
    /// is not checked here.
    fn get(&self, id: &Uuid) -> Result<Option<Entry>>;

    /// Delete an entry.
    ///
    /// # Returns
    ///
    /// Returns `true` if a record was removed, `false` if none existed.
    fn delete(&self, id: &Uuid) -> Result<bool>;

    /// IDs of all entries whose `expires_at` is at or before `before`.
    fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>>;
}

impl<P: Persistence + ?Sized> Persistence for std::sync::Arc<P> {
    fn put(&self, entry: &Entry) -> Result<()> {
        (**self).put(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Entry>> {
        (**self).get(id)
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        (**self).delete(id)
    }

    fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>> {
        (**self).list_expired_before(before)
    }
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn put(&self, entry: &Entry) -> Result<()> {
        (**self).put(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Entry>> {
        (**self).get(id)
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        (**self).delete(id)
    }

    fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>> {
        (**self).list_expired_before(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_dyn(_backend: Box<dyn Persistence>) {}
        fn _accepts_generic<T: Persistence>(_backend: T) {}
    }
}
