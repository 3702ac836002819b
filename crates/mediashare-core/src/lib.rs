//! # Mediashare Core
//!
//! Core library for Mediashare - ephemeral, optionally password-protected
//! sharing of diagnostic tool output (typically MediaInfo reports).
//!
//! This crate provides the entry lifecycle, the password gate, and the
//! persistence abstraction independent of any web or CLI surface.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and AES-256-GCM sealing
//! - **storage**: Entry data model, `Persistence` trait, SQLite and memory backends
//! - **store**: `EntryStore` (create / fetch / describe / delete / reap)
//! - **clock**: Injectable time source
//! - **report**: MediaInfo text report parsing

pub mod clock;
pub mod crypto;
pub mod error;
pub mod report;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, ShareError};
pub use storage::Persistence;
pub use store::{EntryStore, LifetimePolicy, NewShare, StoreConfig};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
