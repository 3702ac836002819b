//! Password sealing of entry payloads.
//!
//! `seal` derives a key from the password and a fresh salt, then encrypts
//! with AES-256-GCM under a fresh nonce. `unseal` reverses it. Every
//! unseal failure, whatever the cause, is reported as
//! [`ShareError::AuthFailure`].

use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};

use super::key::{derive_key, KdfParams};
use crate::error::{Result, ShareError};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// Ciphertext plus everything needed to re-derive the key and verify it.
///
/// None of these fields are secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    /// AES-GCM output (ciphertext || 16-byte tag)
    pub ciphertext: Vec<u8>,
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
    pub kdf: KdfParams,
}

impl fmt::Debug for SealedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedPayload")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("kdf", &self.kdf.to_string())
            .finish()
    }
}

fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| ShareError::Crypto(format!("Randomness source unavailable: {}", e)))?;
    Ok(buf)
}

/// Encrypt `plaintext` under a key derived from `password`.
///
/// # Errors
///
/// Returns `ShareError::Crypto` if the OS randomness source is unavailable
/// or the KDF parameters are invalid. Nothing else can fail.
pub fn seal(plaintext: &[u8], password: &str, params: &KdfParams) -> Result<SealedPayload> {
    let salt = random_bytes::<SALT_LENGTH>()?;
    let nonce = random_bytes::<NONCE_LENGTH>()?;

    let key = derive_key(password, &salt, params)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| ShareError::Crypto(format!("Invalid AES key: {}", e)))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| ShareError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(SealedPayload {
        ciphertext,
        salt: salt.to_vec(),
        nonce: nonce.to_vec(),
        kdf: *params,
    })
}

/// Decrypt a sealed payload with `password`.
///
/// The key is always derived before any shape check, so a malformed
/// payload costs the same KDF time as a wrong password.
///
/// # Errors
///
/// Returns `ShareError::AuthFailure` for a wrong password, tampered
/// ciphertext, or malformed salt/nonce/parameters.
pub fn unseal(sealed: &SealedPayload, password: &str) -> Result<Vec<u8>> {
    let params_ok = sealed.kdf.validate().is_ok();
    let well_formed =
        params_ok && sealed.salt.len() == SALT_LENGTH && sealed.nonce.len() == NONCE_LENGTH;
    let salt: &[u8] = if well_formed {
        &sealed.salt
    } else {
        &[0u8; SALT_LENGTH]
    };
    // Recorded costs out of bounds get a pass at the default costs instead.
    let params = if params_ok {
        sealed.kdf
    } else {
        KdfParams::default()
    };

    let key = derive_key(password, salt, &params).map_err(|_| ShareError::AuthFailure)?;
    if !well_formed {
        return Err(ShareError::AuthFailure);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| ShareError::AuthFailure)?;
    cipher
        .decrypt(Nonce::from_slice(&sealed.nonce), sealed.ciphertext.as_ref())
        .map_err(|_| ShareError::AuthFailure)
}
