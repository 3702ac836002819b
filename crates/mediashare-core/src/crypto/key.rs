//! Key derivation using Argon2id.
//!
//! Keys are derived from a share password and a per-entry random salt.
//! The cost parameters are recorded next to every sealed payload so an
//! entry stays readable after the configured costs change.

use std::fmt;
use std::str::FromStr;

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, ShareError};

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Upper bounds on Argon2id costs (1 GiB of memory). Anything larger is
/// refused before Argon2 allocates or iterates.
const MAX_MEMORY_KIB: u32 = 1024 * 1024;
const MAX_ITERATIONS: u32 = 64;
const MAX_PARALLELISM: u32 = 64;

const PARAMS_PREFIX: &str = "argon2id$";

/// Argon2id cost parameters.
///
/// Defaults:
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(ShareError::Crypto(format!(
                "Argon2 memory cost too large (max {} KiB)",
                MAX_MEMORY_KIB
            )));
        }
        if self.iterations > MAX_ITERATIONS || self.parallelism > MAX_PARALLELISM {
            return Err(ShareError::Crypto(format!(
                "Argon2 time or lane cost too large (max t={}, p={})",
                MAX_ITERATIONS, MAX_PARALLELISM
            )));
        }
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| ShareError::Crypto(format!("Invalid Argon2 params: {}", e)))
    }

    /// Check the parameters are acceptable to Argon2 and within bounds.
    pub fn validate(&self) -> Result<()> {
        self.to_argon2().map(|_| ())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(64 * 1024, 3, 1)
    }
}

impl fmt::Display for KdfParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}m={},t={},p={}",
            PARAMS_PREFIX, self.memory_kib, self.iterations, self.parallelism
        )
    }
}

impl FromStr for KdfParams {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix(PARAMS_PREFIX)
            .ok_or_else(|| ShareError::Crypto(format!("Unsupported KDF: {}", s)))?;

        let mut memory_kib = None;
        let mut iterations = None;
        let mut parallelism = None;
        for part in body.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ShareError::Crypto(format!("Malformed KDF parameter: {}", part)))?;
            let value: u32 = value
                .parse()
                .map_err(|_| ShareError::Crypto(format!("Malformed KDF parameter: {}", part)))?;
            match key {
                "m" => memory_kib = Some(value),
                "t" => iterations = Some(value),
                "p" => parallelism = Some(value),
                other => {
                    return Err(ShareError::Crypto(format!(
                        "Unknown KDF parameter: {}",
                        other
                    )))
                }
            }
        }

        let params = match (memory_kib, iterations, parallelism) {
            (Some(m), Some(t), Some(p)) => KdfParams::new(m, t, p),
            _ => {
                return Err(ShareError::Crypto(format!(
                    "Incomplete KDF parameters: {}",
                    s
                )))
            }
        };
        params.validate()?;
        Ok(params)
    }
}

/// A cryptographic key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a password using Argon2id.
///
/// Same password + salt + params always produces the same key. The salt
/// must be unique per entry and stored alongside the ciphertext.
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    let mut key_bytes = [0u8; KEY_LENGTH];
    let derived = argon2
        .hash_password_into(password.as_bytes(), salt, &mut key_bytes)
        .map_err(|e| ShareError::Crypto(format!("Key derivation failed: {}", e)));
    let key = DerivedKey::from_bytes(key_bytes);
    key_bytes.zeroize();
    derived.map(|_| key)
}
