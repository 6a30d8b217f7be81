//! Key derivation using HKDF-SHA256.
//!
//! Key files never encrypt directly under the passphrase-derived master
//! key; each use gets its own context-bound subkey.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{RecordError, Result};

/// HKDF context for the key that encrypts a key file's secret.
/// Must remain stable across versions.
pub const KEY_ENCRYPTION_CONTEXT: &str = "routing-state/key-encryption";

/// Derive a 32-byte subkey from input key material and a context string.
pub fn derive_key(ikm: &[u8; 32], context: &str) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| RecordError::DerivationFailed(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}
