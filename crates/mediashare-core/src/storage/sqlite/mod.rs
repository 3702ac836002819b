//! SQLite storage backend.
//!
//! Entries live in a single on-disk database file. Access from this process
//! is serialised through a mutex; other processes are kept out by SQLite's
//! own file locking, with a busy timeout so short contention does not surface
//! as an error.

mod row;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use uuid::Uuid;

use crate::error::{Result, ShareError};
use crate::storage::traits::Persistence;
use crate::storage::types::Entry;

use row::{timestamp_to_sql, EntryRow, ENTRY_COLUMNS};

/// On-disk format version written to the `meta` table.
pub const FORMAT_VERSION: &str = "1";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL,
        protected INTEGER NOT NULL,
        payload BLOB NOT NULL,
        salt BLOB,
        nonce BLOB,
        kdf TEXT
    );

    -- Reaper scans by expiry
    CREATE INDEX IF NOT EXISTS entries_expires_at ON entries (expires_at);
"#;

/// Database-level information from the `meta` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMetadata {
    pub format_version: String,
    pub created_at: DateTime<Utc>,
    pub entry_count: u64,
}

/// SQLite-backed entry persistence.
pub struct SqlitePersistence {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqlitePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePersistence")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqlitePersistence {
    /// Open the database at `path`, creating the file and schema if needed.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// initialised, or if the file was written by an incompatible version.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self::from_connection(conn, Some(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "opened entry database");
        Ok(storage)
    }

    /// Open a private in-memory database. Contents vanish on drop.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;

        let created_at = timestamp_to_sql(&Utc::now());
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES (?, ?)",
            ["created_at", &created_at],
        )?;

        let format_version: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )?;
        if format_version != FORMAT_VERSION {
            return Err(ShareError::Storage(format!(
                "Unsupported database format version {} (expected {})",
                format_version, FORMAT_VERSION
            )));
        }

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ShareError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;

        let format_version: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )?;

        let created_at_str: String = conn.query_row(
            "SELECT value FROM meta WHERE key = 'created_at'",
            [],
            |row| row.get(0),
        )?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| ShareError::Corrupt(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        let entry_count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;

        Ok(StoreMetadata {
            format_version,
            created_at,
            entry_count: entry_count.max(0) as u64,
        })
    }

    /// Run consistency checks over the database.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Corrupt` describing the first problem found.
    pub fn check_integrity(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(ShareError::Corrupt(format!(
                "SQLite integrity check failed: {}",
                status
            )));
        }

        let metadata_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM meta WHERE key IN ('format_version', 'created_at')",
            [],
            |row| row.get(0),
        )?;
        if metadata_count < 2 {
            return Err(ShareError::Corrupt(
                "Metadata table missing required keys".to_string(),
            ));
        }

        let incomplete_sealed: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE protected = 1 AND (salt IS NULL OR nonce IS NULL OR kdf IS NULL)",
            [],
            |row| row.get(0),
        )?;
        if incomplete_sealed > 0 {
            return Err(ShareError::Corrupt(format!(
                "{} protected entries are missing sealing parameters",
                incomplete_sealed
            )));
        }

        let inverted: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE expires_at <= created_at",
            [],
            |row| row.get(0),
        )?;
        if inverted > 0 {
            return Err(ShareError::Corrupt(format!(
                "{} entries expire at or before their creation time",
                inverted
            )));
        }

        Ok(())
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation))
}

impl Persistence for SqlitePersistence {
    fn put(&self, entry: &Entry) -> Result<()> {
        let conn = self.lock_conn()?;
        let row = EntryRow::from_entry(entry);

        let result = conn.execute(
            r#"
            INSERT INTO entries (id, created_at, expires_at, protected, payload, salt, nonce, kdf)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            rusqlite::params![
                row.id,
                row.created_at,
                row.expires_at,
                row.protected,
                row.payload,
                row.salt,
                row.nonce,
                row.kdf,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(ShareError::Conflict(entry.id)),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, id: &Uuid) -> Result<Option<Entry>> {
        let conn = self.lock_conn()?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM entries WHERE id = ?", ENTRY_COLUMNS),
                [id.to_string()],
                EntryRow::from_sql,
            )
            .optional()?;

        row.map(Entry::try_from).transpose()
    }

    fn delete(&self, id: &Uuid) -> Result<bool> {
        let conn = self.lock_conn()?;
        let removed = conn.execute("DELETE FROM entries WHERE id = ?", [id.to_string()])?;
        Ok(removed > 0)
    }

    fn list_expired_before(&self, before: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare("SELECT id FROM entries WHERE expires_at <= ? ORDER BY expires_at")?;
        let rows = stmt.query_map([timestamp_to_sql(&before)], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            let raw = row?;
            let id = Uuid::parse_str(&raw)
                .map_err(|e| ShareError::Corrupt(format!("Invalid entry UUID {}: {}", raw, e)))?;
            ids.push(id);
        }

        Ok(ids)
    }
}
