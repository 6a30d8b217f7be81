//! Ed25519 key pairs and the protobuf public key encoding.
//!
//! The encoded public key is what peer ids are derived from, so its byte
//! layout must match every other implementation exactly:
//! `PublicKey { KeyType type = 1; bytes data = 2; }`.

use ed25519_dalek::{SigningKey, VerifyingKey};
use prost::Message;

use crate::crypto::signing;
use crate::error::{RecordError, Result};
use crate::identity::PeerId;

/// Key algorithms known to the public key encoding.
///
/// Only Ed25519 is supported for signing and verification; the other tags
/// are reserved so that foreign keys are rejected with a clear error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyType {
    Rsa = 0,
    Ed25519 = 1,
    Secp256k1 = 2,
    Ecdsa = 3,
}

/// Wire form of a public key.
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct PublicKeyProto {
    #[prost(enumeration = "KeyType", tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Reconstruct from raw 32-byte Ed25519 key material.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key_bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            RecordError::InvalidKey(format!(
                "ed25519 public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        let key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| RecordError::InvalidKey(format!("invalid verifying key: {e}")))?;
        Ok(Self(key))
    }

    /// Return the raw key bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Return the underlying verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// The algorithm of this key.
    pub fn key_type(&self) -> KeyType {
        KeyType::Ed25519
    }

    /// Encode as a protobuf `PublicKey` message.
    pub fn encode_protobuf(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    /// Decode a protobuf `PublicKey` message.
    pub fn decode_protobuf(bytes: &[u8]) -> Result<Self> {
        let proto = PublicKeyProto::decode(bytes)
            .map_err(|e| RecordError::InvalidKey(format!("public key decode: {e}")))?;
        Self::from_proto(proto)
    }

    /// Verify `signature` over `message` with this key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        signing::verify(&self.0, message, signature)
    }

    /// Derive the peer id this key certifies.
    pub fn to_peer_id(&self) -> PeerId {
        PeerId::from_public_key(self)
    }

    pub(crate) fn to_proto(&self) -> PublicKeyProto {
        PublicKeyProto {
            key_type: KeyType::Ed25519 as i32,
            data: self.to_bytes().to_vec(),
        }
    }

    pub(crate) fn from_proto(proto: PublicKeyProto) -> Result<Self> {
        match KeyType::try_from(proto.key_type) {
            Ok(KeyType::Ed25519) => Self::from_bytes(&proto.data),
            Ok(other) => Err(RecordError::InvalidKey(format!(
                "unsupported key type: {other:?}"
            ))),
            Err(_) => Err(RecordError::InvalidKey(format!(
                "unknown key type tag: {}",
                proto.key_type
            ))),
        }
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&hex::encode(self.to_bytes()))
            .finish()
    }
}

/// An Ed25519 key pair used to sign records.
///
/// `SigningKey` zeroizes its secret on drop.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    public: PublicKey,
}

impl Keypair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self::from_signing_key(signing_key)
    }

    /// Reconstruct a key pair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(bytes))
    }

    /// Wrap an existing signing key.
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let public = PublicKey(signing_key.verifying_key());
        Self {
            signing_key,
            public,
        }
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Return the public half.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Return the secret key bytes. Caller must zeroize after use.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Sign a message, returning the 64 signature bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signature = signing::sign(&self.signing_key, message)?;
        Ok(signature.to_bytes().to_vec())
    }

    /// The peer id of this key pair.
    pub fn peer_id(&self) -> PeerId {
        self.public.to_peer_id()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the secret half
        f.debug_struct("Keypair")
            .field("public", &self.public)
            .finish()
    }
}
