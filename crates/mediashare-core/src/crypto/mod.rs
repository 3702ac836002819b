//! Cryptographic operations for Mediashare (the password gate).
//!
//! - **Argon2id**: memory-hard key derivation from the share password
//! - **AES-256-GCM**: authenticated encryption of the entry payload
//!
//! ## Security Model
//!
//! - The password and derived keys are never persisted
//! - Salt, nonce and KDF costs are stored in the clear next to the ciphertext
//! - Derived keys are zeroized from memory on drop
//! - Wrong password and corrupted data are indistinguishable to callers
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the entry database
//! - Offline brute-force attacks on share passwords
//!
//! We do NOT defend against:
//! - Compromised host / memory inspection while a share is being opened
//! - Weak passwords chosen by users

pub mod key;
pub mod password;
pub mod seal;

pub use key::{derive_key, DerivedKey, KdfParams};
pub use password::validate_password;
pub use seal::{seal, unseal, SealedPayload, NONCE_LENGTH, SALT_LENGTH};
