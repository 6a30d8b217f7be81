//! Ed25519 signing and verification.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use crate::error::{RecordError, Result};

/// Sign a message with an Ed25519 signing key.
pub fn sign(signing_key: &SigningKey, message: &[u8]) -> Result<Signature> {
    signing_key
        .try_sign(message)
        .map_err(|e| RecordError::Signing(format!("ed25519: {e}")))
}

/// Verify an Ed25519 signature against a public key and message.
///
/// Uses strict verification, which rejects small-order keys and
/// malleated signatures.
pub fn verify(verifying_key: &VerifyingKey, message: &[u8], signature: &[u8]) -> Result<()> {
    let signature = Signature::from_slice(signature).map_err(|_| {
        RecordError::Authentication(format!(
            "signature must be 64 bytes, got {}",
            signature.len()
        ))
    })?;
    verifying_key
        .verify_strict(message, &signature)
        .map_err(|_| RecordError::Authentication("signature verification failed".into()))
}
