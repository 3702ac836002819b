//! The entry store: creation, gated reads, and expiry.
//!
//! [`EntryStore`] owns no entry state of its own. Every record lives in the
//! [`Persistence`] backend handed to it at construction, and every expiry
//! decision is made against the injected [`Clock`], so the same store logic
//! runs against SQLite in production and an in-memory map under a manual
//! clock in tests.
//!
//! Expiry is logical first: a read at or after `expires_at` is refused even
//! if the record has not been purged yet. Physical removal happens through
//! [`EntryStore::reap`], driven by whatever scheduler the caller prefers.

mod config;
mod retry;

use chrono::{DateTime, Datelike, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::crypto::{seal, unseal, validate_password};
use crate::error::{Result, ShareError};
use crate::storage::{Entry, EntrySummary, Payload, Persistence};

pub use config::{
    LifetimePolicy, StoreConfig, DEFAULT_IO_RETRIES, DEFAULT_MAX_CONTENT_BYTES,
    DEFAULT_MAX_LIFETIME_HOURS, LIFETIME_HOURS_CEILING,
};
use retry::with_retries;

/// A request to create a share.
#[derive(Debug)]
pub struct NewShare {
    pub content: Vec<u8>,
    pub password: Option<SecretString>,
    pub lifetime_hours: u32,
}

impl NewShare {
    /// An unprotected share.
    pub fn new(content: impl Into<Vec<u8>>, lifetime_hours: u32) -> Self {
        Self {
            content: content.into(),
            password: None,
            lifetime_hours,
        }
    }

    /// Protect the share with `password`.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }
}

/// Lifecycle manager for entries on top of a [`Persistence`] backend.
#[derive(Debug)]
pub struct EntryStore<P, C = SystemClock> {
    persistence: P,
    clock: C,
    config: StoreConfig,
}

impl<P: Persistence> EntryStore<P, SystemClock> {
    /// Store on the wall clock with default limits.
    ///
    /// # Errors
    ///
    /// Same as [`EntryStore::new`].
    pub fn with_defaults(persistence: P) -> Result<Self> {
        Self::new(persistence, SystemClock, StoreConfig::default())
    }
}

impl<P: Persistence, C: Clock> EntryStore<P, C> {
    /// Build a store over `persistence`, reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Validation` if `config` is unusable.
    pub fn new(persistence: P, clock: C, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            persistence,
            clock,
            config,
        })
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create an entry and return its id (the link token).
    ///
    /// Content is sealed when a password is supplied, stored as-is otherwise.
    ///
    /// # Errors
    ///
    /// - `ShareError::Validation` for empty or oversized content, a zero
    ///   lifetime, an over-long lifetime under [`LifetimePolicy::Reject`], or
    ///   an empty password. Nothing is written in these cases.
    /// - `ShareError::Crypto` if sealing cannot obtain randomness.
    /// - A storage error once transient-failure retries are exhausted.
    pub fn create(&self, share: NewShare) -> Result<Uuid> {
        self.validate_content(&share.content)?;
        let lifetime_hours = self.effective_lifetime(share.lifetime_hours)?;
        if let Some(password) = &share.password {
            validate_password(password.expose_secret())?;
        }

        // Timestamps are stored as four-digit-year RFC 3339 strings.
        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(Duration::hours(i64::from(lifetime_hours)))
            .filter(|expires_at| expires_at.year() <= 9999)
            .ok_or_else(|| {
                ShareError::Validation("Lifetime runs past the supported date range".to_string())
            })?;

        let payload = match &share.password {
            Some(password) => Payload::Sealed(seal(
                &share.content,
                password.expose_secret(),
                &self.config.kdf,
            )?),
            None => Payload::Plain(share.content),
        };

        let entry = Entry {
            id: Uuid::new_v4(),
            created_at,
            expires_at,
            payload,
        };

        self.put_with_retries(&entry)?;

        tracing::debug!(
            id = %entry.id,
            protected = entry.is_protected(),
            expires_at = %entry.expires_at,
            stored_bytes = entry.payload.stored_len(),
            "created entry"
        );
        Ok(entry.id)
    }

    /// Read an entry's content.
    ///
    /// A password supplied for an unprotected entry is ignored.
    ///
    /// # Errors
    ///
    /// - `ShareError::NotFound` if no record exists.
    /// - `ShareError::Expired` if `now >= expires_at`, whatever the password.
    ///   The record is deleted on the way out when possible.
    /// - `ShareError::AuthRequired` for a protected entry without a password.
    /// - `ShareError::AuthFailure` for a wrong password or damaged payload.
    pub fn fetch(&self, id: &Uuid, password: Option<&str>) -> Result<Vec<u8>> {
        let entry = self.load_active(id)?;

        let outcome = match entry.payload {
            Payload::Plain(content) => Ok(content),
            Payload::Sealed(sealed) => match password {
                None => Err(ShareError::AuthRequired),
                Some(password) => unseal(&sealed, password),
            },
        };

        match &outcome {
            Ok(content) => tracing::debug!(%id, bytes = content.len(), "fetched entry"),
            Err(e) => tracing::debug!(%id, error = %e, "fetch refused"),
        }
        outcome
    }

    /// Metadata for an active entry, without touching its payload.
    ///
    /// # Errors
    ///
    /// Same `NotFound` / `Expired` behaviour as [`EntryStore::fetch`].
    pub fn describe(&self, id: &Uuid) -> Result<EntrySummary> {
        Ok(self.load_active(id)?.summary())
    }

    /// Remove an entry regardless of its state.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed, `false` if none existed.
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let removed = self.persistence.delete(id)?;
        tracing::debug!(%id, removed, "deleted entry");
        Ok(removed)
    }

    /// Purge every entry with `expires_at <= now`.
    ///
    /// Individual delete failures are logged and skipped; those entries
    /// stay in the expired set and are picked up by the next sweep.
    ///
    /// # Returns
    ///
    /// The number of records removed by this call.
    ///
    /// # Errors
    ///
    /// Fails only if the expired set itself cannot be listed.
    pub fn reap(&self, now: DateTime<Utc>) -> Result<usize> {
        let expired = self.persistence.list_expired_before(now)?;
        let candidates = expired.len();

        let mut removed = 0;
        for id in expired {
            match self.persistence.delete(&id) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(%id, error = %e, "failed to purge expired entry"),
            }
        }

        if candidates > 0 {
            tracing::info!(removed, candidates, "reaped expired entries");
        } else {
            tracing::debug!("no expired entries to reap");
        }
        Ok(removed)
    }

    /// [`EntryStore::reap`] at the store clock's current time.
    pub fn reap_now(&self) -> Result<usize> {
        self.reap(self.clock.now())
    }

    fn validate_content(&self, content: &[u8]) -> Result<()> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err(ShareError::Validation(
                "Content cannot be empty".to_string(),
            ));
        }
        if content.len() > self.config.max_content_bytes {
            return Err(ShareError::Validation(format!(
                "Content too large ({} bytes, max {})",
                content.len(),
                self.config.max_content_bytes
            )));
        }
        Ok(())
    }

    fn effective_lifetime(&self, requested: u32) -> Result<u32> {
        let max = self.config.max_lifetime_hours;
        if requested == 0 {
            return Err(ShareError::Validation(
                "Lifetime must be at least 1 hour".to_string(),
            ));
        }
        if requested <= max {
            return Ok(requested);
        }
        match self.config.lifetime_policy {
            LifetimePolicy::Clamp => {
                tracing::debug!(requested, max, "clamping lifetime to maximum");
                Ok(max)
            }
            LifetimePolicy::Reject => Err(ShareError::Validation(format!(
                "Lifetime of {} hours exceeds the maximum of {}",
                requested, max
            ))),
        }
    }

    fn put_with_retries(&self, entry: &Entry) -> Result<()> {
        let config = &self.config;
        with_retries("put", config.io_retries, config.retry_backoff, |attempt| {
            match self.persistence.put(entry) {
                // A retried put that conflicts on our own fresh id means the
                // earlier attempt landed before its error was reported.
                Err(ShareError::Conflict(id)) if attempt > 0 && id == entry.id => Ok(()),
                other => other,
            }
        })
    }

    /// Load a record that is still readable at the current clock time.
    fn load_active(&self, id: &Uuid) -> Result<Entry> {
        let config = &self.config;
        let entry = with_retries("get", config.io_retries, config.retry_backoff, |_| {
            self.persistence.get(id)
        })?
        .ok_or(ShareError::NotFound(*id))?;

        if entry.is_expired_at(self.clock.now()) {
            self.purge_expired(id);
            return Err(ShareError::Expired(*id));
        }

        Ok(entry)
    }

    fn purge_expired(&self, id: &Uuid) {
        match self.persistence.delete(id) {
            Ok(_) => tracing::debug!(%id, "purged expired entry on read"),
            Err(e) => tracing::warn!(%id, error = %e, "failed to purge expired entry on read"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::crypto::KdfParams;
    use crate::storage::MemoryPersistence;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_config() -> StoreConfig {
        StoreConfig {
            kdf: KdfParams::new(1024, 1, 1),
            retry_backoff: std::time::Duration::ZERO,
            ..StoreConfig::default()
        }
    }

    fn store() -> EntryStore<MemoryPersistence, Arc<ManualClock>> {
        EntryStore::new(
            MemoryPersistence::new(),
            Arc::new(ManualClock::default()),
            fast_config(),
        )
        .unwrap()
    }

    /// Backend that fails the first `failures` calls of every kind.
    struct Flaky {
        inner: MemoryPersistence,
        failures: AtomicU32,
        land_writes: bool,
    }

    impl Flaky {
        fn new(failures: u32, land_writes: bool) -> Self {
            Self {
                inner: MemoryPersistence::new(),
                failures: AtomicU32::new(failures),
                land_writes,
            }
        }

        fn trip(&self) -> Result<()> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(std::io::Error::other("simulated outage").into());
            }
            Ok(())
        }
    }

    impl Persistence for Flaky {
        fn put(&self, entry: &Entry) -> Result<()> {
            if self.land_writes && self.failures.load(Ordering::SeqCst) > 0 {
                let _ = self.inner.put(entry);
            }
            self.trip()?;
            self.inner.put(entry)
        }

        fn get(&self, id: &Uuid) -> Result<Option<Entry>> {
            self.trip()?;
            self.inner.get(id)
        }

        fn delete(&self, id: &Uuid) -> Result<bool> {
            self.inner.delete(id)
        }

        fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>> {
            self.inner.list_expired_before(before)
        }
    }

    #[test]
    fn test_create_rejects_blank_content_before_writing() {
        let store = store();
        for content in [&b""[..], b"   \n\t"] {
            let err = store.create(NewShare::new(content, 1)).unwrap_err();
            assert!(matches!(err, ShareError::Validation(_)));
        }
        assert!(store.persistence().is_empty());
    }

    #[test]
    fn test_create_rejects_oversized_content() {
        let store = store();
        let content = vec![b'a'; DEFAULT_MAX_CONTENT_BYTES + 1];
        let err = store.create(NewShare::new(content, 1)).unwrap_err();
        assert!(err.to_string().contains("too large"));

        let at_limit = vec![b'a'; DEFAULT_MAX_CONTENT_BYTES];
        assert!(store.create(NewShare::new(at_limit, 1)).is_ok());
    }

    #[test]
    fn test_create_rejects_zero_lifetime_and_blank_password() {
        let store = store();
        assert!(matches!(
            store.create(NewShare::new("report", 0)),
            Err(ShareError::Validation(_))
        ));
        assert!(matches!(
            store.create(NewShare::new("report", 1).with_password("  ")),
            Err(ShareError::Validation(_))
        ));
        assert!(store.persistence().is_empty());
    }

    #[test]
    fn test_lifetime_clamped_by_default() {
        let store = store();
        let id = store.create(NewShare::new("report", 72)).unwrap();

        let summary = store.describe(&id).unwrap();
        assert_eq!(summary.expires_at - summary.created_at, Duration::hours(24));
    }

    #[test]
    fn test_lifetime_rejected_under_reject_policy() {
        let config = StoreConfig {
            lifetime_policy: LifetimePolicy::Reject,
            ..fast_config()
        };
        let store =
            EntryStore::new(MemoryPersistence::new(), ManualClock::default(), config).unwrap();

        assert!(matches!(
            store.create(NewShare::new("report", 25)),
            Err(ShareError::Validation(_))
        ));
        assert!(store.create(NewShare::new("report", 24)).is_ok());
    }

    #[test]
    fn test_with_defaults_uses_validated_default_config() {
        let store = EntryStore::with_defaults(MemoryPersistence::new()).unwrap();
        assert_eq!(store.config(), &StoreConfig::default());
    }

    #[test]
    fn test_unbounded_max_lifetime_is_refused() {
        let config = StoreConfig {
            max_lifetime_hours: u32::MAX,
            ..fast_config()
        };
        let result = EntryStore::new(MemoryPersistence::new(), ManualClock::default(), config);
        assert!(matches!(result, Err(ShareError::Validation(_))));
    }

    #[test]
    fn test_expiry_past_year_9999_is_validation_error() {
        use chrono::TimeZone;

        let store = store();
        store
            .clock()
            .set(Utc.with_ymd_and_hms(9999, 12, 31, 12, 0, 0).unwrap());

        assert!(matches!(
            store.create(NewShare::new("report", 24)),
            Err(ShareError::Validation(_))
        ));
        assert!(store.persistence().is_empty());
        assert!(store.create(NewShare::new("report", 1)).is_ok());
    }

    #[test]
    fn test_password_ignored_for_unprotected_entry() {
        let store = store();
        let id = store.create(NewShare::new("plain report", 1)).unwrap();
        assert_eq!(store.fetch(&id, Some("anything")).unwrap(), b"plain report");
    }

    #[test]
    fn test_describe_reports_protection() {
        let store = store();
        let id = store
            .create(NewShare::new("secret report", 2).with_password("abc123"))
            .unwrap();

        let summary = store.describe(&id).unwrap();
        assert!(summary.protected);
        assert_eq!(summary.id, id);
    }

    #[test]
    fn test_fetch_after_expiry_purges_record() {
        let store = store();
        let id = store.create(NewShare::new("report", 1)).unwrap();

        store.clock().advance(Duration::hours(1));
        assert!(matches!(store.fetch(&id, None), Err(ShareError::Expired(e)) if e == id));
        assert!(!store.persistence().contains(&id));
        assert!(matches!(store.fetch(&id, None), Err(ShareError::NotFound(_))));
    }

    #[test]
    fn test_describe_after_expiry_is_expired() {
        let store = store();
        let id = store.create(NewShare::new("report", 1)).unwrap();
        store.clock().advance(Duration::minutes(61));

        assert!(matches!(store.describe(&id), Err(ShareError::Expired(_))));
    }

    #[test]
    fn test_delete_is_tolerant_of_missing_ids() {
        let store = store();
        let id = store.create(NewShare::new("report", 1)).unwrap();

        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(matches!(store.fetch(&id, None), Err(ShareError::NotFound(_))));
    }

    #[test]
    fn test_reap_now_uses_store_clock() {
        let store = store();
        store.create(NewShare::new("short", 1)).unwrap();
        store.create(NewShare::new("long", 5)).unwrap();

        assert_eq!(store.reap_now().unwrap(), 0);
        store.clock().advance(Duration::hours(2));
        assert_eq!(store.reap_now().unwrap(), 1);
        assert_eq!(store.persistence().len(), 1);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let store = EntryStore::new(Flaky::new(2, false), ManualClock::default(), fast_config())
            .unwrap();
        let id = store.create(NewShare::new("report", 1)).unwrap();

        store.persistence().failures.store(3, Ordering::SeqCst);
        assert_eq!(store.fetch(&id, None).unwrap(), b"report");
    }

    #[test]
    fn test_retry_exhaustion_surfaces_storage_error() {
        let store = EntryStore::new(Flaky::new(10, false), ManualClock::default(), fast_config())
            .unwrap();
        let err = store.create(NewShare::new("report", 1)).unwrap_err();
        assert!(matches!(err, ShareError::Io { .. }));
        assert!(store.persistence().inner.is_empty());
    }

    #[test]
    fn test_retried_put_that_landed_is_not_a_conflict() {
        let store = EntryStore::new(Flaky::new(1, true), ManualClock::default(), fast_config())
            .unwrap();
        let id = store.create(NewShare::new("report", 1)).unwrap();
        assert_eq!(store.persistence().inner.len(), 1);
        assert_eq!(store.fetch(&id, None).unwrap(), b"report");
    }
}
