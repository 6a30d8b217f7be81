//! .key file format: encrypted signing key storage.
//!
//! A `.key` file stores an Ed25519 secret encrypted with ChaCha20-Poly1305
//! under a key derived from a user passphrase via Argon2id and HKDF,
//! alongside the peer id and public key in plaintext so the identity can
//! be inspected without decryption.
//!
//! File format (JSON):
//! ```json
//! {
//!     "version": 1,
//!     "format": "rsk-v1",
//!     "encryption": {
//!         "algorithm": "chacha20-poly1305",
//!         "kdf": "argon2id",
//!         "salt": "<base64-16-bytes>",
//!         "nonce": "<base64-12-bytes>"
//!     },
//!     "encrypted_secret": "<base64-ciphertext>",
//!     "peer_id": "12D3KooW...",
//!     "public_key": "<base64-protobuf-public-key>"
//! }
//! ```

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::derivation::{self, KEY_ENCRYPTION_CONTEXT};
use crate::crypto::encryption::{self, SealedSecret, KEY_LEN, SALT_LEN};
use crate::crypto::keys::{Keypair, PublicKey};
use crate::error::{RecordError, Result};
use crate::identity::PeerId;

const KEY_FILE_VERSION: u32 = 1;
const KEY_FILE_FORMAT: &str = "rsk-v1";
const KEY_FILE_ALGORITHM: &str = "chacha20-poly1305";
const KEY_FILE_KDF: &str = "argon2id";

/// Top-level structure written to disk as a `.key` file.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyFile {
    pub version: u32,
    pub format: String,
    pub encryption: EncryptionMetadata,
    /// Base64 ciphertext of the 32-byte Ed25519 secret.
    pub encrypted_secret: String,
    pub peer_id: PeerId,
    /// Base64 of the protobuf-encoded public key.
    pub public_key: String,
}

/// Encryption parameters stored alongside the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptionMetadata {
    pub algorithm: String,
    pub kdf: String,
    pub salt: String,
    pub nonce: String,
}

/// Save a key pair to a `.key` file, encrypting the secret with `passphrase`.
///
/// The file is written atomically, so a concurrent reader never sees a
/// partial write.
pub fn save_keypair(keypair: &Keypair, path: &Path, passphrase: &str) -> Result<()> {
    let salt = crate::crypto::random::random_salt_16();
    let file_key = file_key(passphrase, &salt)?;
    let secret = Zeroizing::new(keypair.secret_bytes());
    let sealed = SealedSecret::seal(&file_key, &secret[..])?;

    let key_file = KeyFile {
        version: KEY_FILE_VERSION,
        format: KEY_FILE_FORMAT.to_string(),
        encryption: EncryptionMetadata {
            algorithm: KEY_FILE_ALGORITHM.to_string(),
            kdf: KEY_FILE_KDF.to_string(),
            salt: STANDARD.encode(salt),
            nonce: STANDARD.encode(sealed.nonce),
        },
        encrypted_secret: STANDARD.encode(&sealed.ciphertext),
        peer_id: keypair.peer_id(),
        public_key: STANDARD.encode(keypair.public().encode_protobuf()),
    };

    let json = serde_json::to_string_pretty(&key_file)
        .map_err(|e| RecordError::SerializationError(e.to_string()))?;
    write_atomic(path, json.as_bytes())
}

/// Load a key pair from a `.key` file, decrypting with `passphrase`.
///
/// Returns `InvalidPassphrase` if decryption fails, and
/// `InvalidFileFormat` if the decrypted key does not match the stored
/// peer id.
pub fn load_keypair(path: &Path, passphrase: &str) -> Result<Keypair> {
    let key_file = read_key_file(path)?;

    let salt: [u8; SALT_LEN] = decode_field(&key_file.encryption.salt, "salt")?
        .try_into()
        .map_err(|_| RecordError::InvalidFileFormat(format!("salt must be {SALT_LEN} bytes")))?;
    let sealed = SealedSecret::from_parts(
        &decode_field(&key_file.encryption.nonce, "nonce")?,
        decode_field(&key_file.encrypted_secret, "encrypted_secret")?,
    )?;

    let plaintext = sealed.open(&*file_key(passphrase, &salt)?)?;
    let secret: Zeroizing<[u8; 32]> = Zeroizing::new(
        plaintext
            .as_slice()
            .try_into()
            .map_err(|_| RecordError::InvalidFileFormat("secret must be 32 bytes".into()))?,
    );
    let keypair = Keypair::from_secret_bytes(&secret);

    if keypair.peer_id() != key_file.peer_id {
        return Err(RecordError::InvalidFileFormat(format!(
            "decrypted key belongs to {}, file claims {}",
            keypair.peer_id(),
            key_file.peer_id
        )));
    }

    Ok(keypair)
}

/// Read the peer id from a `.key` file without the passphrase.
///
/// Checks that the stored public key and peer id agree.
pub fn read_peer_id(path: &Path) -> Result<PeerId> {
    let key_file = read_key_file(path)?;
    let public_key = PublicKey::decode_protobuf(&decode_field(&key_file.public_key, "public_key")?)?;
    if !key_file.peer_id.matches_public_key(&public_key) {
        return Err(RecordError::InvalidFileFormat(
            "stored peer id does not match stored public key".into(),
        ));
    }
    Ok(key_file.peer_id)
}

/// Write `data` to `path` atomically using a sibling temporary file.
///
/// Creates the parent directory if it does not exist.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_key_file(path: &Path) -> Result<KeyFile> {
    let bytes = std::fs::read(path)?;
    let key_file: KeyFile = serde_json::from_slice(&bytes)
        .map_err(|e| RecordError::InvalidFileFormat(format!("failed to parse .key file: {e}")))?;

    if key_file.version != KEY_FILE_VERSION || key_file.format != KEY_FILE_FORMAT {
        return Err(RecordError::InvalidFileFormat(format!(
            "unsupported .key file version={} format={}",
            key_file.version, key_file.format,
        )));
    }
    Ok(key_file)
}

/// passphrase → Argon2id(passphrase, salt) → HKDF-SHA256(master, context)
fn file_key(passphrase: &str, salt: &[u8; SALT_LEN]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let master_key = encryption::stretch_passphrase(passphrase, salt)?;
    derivation::derive_key(&master_key, KEY_ENCRYPTION_CONTEXT).map(Zeroizing::new)
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| RecordError::InvalidFileFormat(format!("invalid {field} base64: {e}")))
}
