//! Passphrase stretching and sealed secrets for `.key` files.
//!
//! A passphrase is stretched with Argon2id; the resulting key seals the
//! Ed25519 secret with ChaCha20-Poly1305. Key material lives in
//! [`Zeroizing`] buffers and is wiped when dropped.

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use crate::crypto::random::random_nonce_12;
use crate::error::{RecordError, Result};

pub const KEY_LEN: usize = 32;
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;

/// Argon2id memory cost in KiB (64 MiB).
const MEMORY_KIB: u32 = 64 * 1024;
const ITERATIONS: u32 = 3;
const LANES: u32 = 4;

fn argon2id() -> Result<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, Some(KEY_LEN))
        .map_err(|e| RecordError::DerivationFailed(format!("argon2 parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Stretch `passphrase` into a 32-byte key bound to `salt`.
pub fn stretch_passphrase(
    passphrase: &str,
    salt: &[u8; SALT_LEN],
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2id()?
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|e| RecordError::DerivationFailed(format!("argon2: {e}")))?;
    Ok(key)
}

/// A secret encrypted under a file key, with the nonce it was sealed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl SealedSecret {
    /// Encrypt `secret` under `key` with a fresh random nonce.
    pub fn seal(key: &[u8; KEY_LEN], secret: &[u8]) -> Result<Self> {
        let nonce = random_nonce_12();
        let ciphertext = ChaCha20Poly1305::new(Key::from_slice(key))
            .encrypt(Nonce::from_slice(&nonce), secret)
            .map_err(|e| RecordError::EncryptionFailed(e.to_string()))?;
        Ok(Self { nonce, ciphertext })
    }

    /// Reassemble from stored fields.
    pub fn from_parts(nonce: &[u8], ciphertext: Vec<u8>) -> Result<Self> {
        let nonce = nonce.try_into().map_err(|_| {
            RecordError::InvalidFileFormat(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            ))
        })?;
        Ok(Self { nonce, ciphertext })
    }

    /// Decrypt with `key`. A failed tag check means the passphrase was wrong
    /// or the file was altered; both surface as `InvalidPassphrase`.
    pub fn open(&self, key: &[u8; KEY_LEN]) -> Result<Zeroizing<Vec<u8>>> {
        ChaCha20Poly1305::new(Key::from_slice(key))
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_slice())
            .map(Zeroizing::new)
            .map_err(|_| RecordError::InvalidPassphrase)
    }
}
