//! Peer ids as multihashes of protobuf-encoded public keys.
//!
//! Format: `uvarint(code) || uvarint(len) || digest`, where the code is
//! either the identity hash (key inlined, for encoded keys up to 42 bytes)
//! or SHA2-256. Text form is base58btc.

use std::str::FromStr;

use prost::encoding::encode_varint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::crypto::keys::PublicKey;
use crate::error::{RecordError, Result};
use crate::varint::decode_uvarint;

/// Encoded keys up to this size are inlined with the identity hash.
const MAX_INLINE_KEY_LENGTH: usize = 42;

const MULTIHASH_IDENTITY: u64 = 0x00;
const MULTIHASH_SHA2_256: u64 = 0x12;
const SHA2_256_LENGTH: usize = 32;

/// Unique identifier for a peer, derived deterministically from its public key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(Vec<u8>);

impl PeerId {
    /// Compute the peer id certified by a public key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        let encoded = key.encode_protobuf();
        if encoded.len() <= MAX_INLINE_KEY_LENGTH {
            Self(multihash(MULTIHASH_IDENTITY, &encoded))
        } else {
            Self(multihash(MULTIHASH_SHA2_256, &Sha256::digest(&encoded)))
        }
    }

    /// Structurally decode a peer id from its multihash bytes.
    ///
    /// This does not (and cannot) check that any key exists for the id;
    /// use [`PeerId::matches_public_key`] for that.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        let code = decode_uvarint(&mut buf)
            .map_err(|e| RecordError::InvalidPeerId(format!("hash code: {e}")))?;
        let len = decode_uvarint(&mut buf)
            .map_err(|e| RecordError::InvalidPeerId(format!("digest length: {e}")))?;
        let len = usize::try_from(len)
            .map_err(|_| RecordError::InvalidPeerId("digest length overflow".into()))?;

        if buf.len() != len {
            return Err(RecordError::InvalidPeerId(format!(
                "digest length {len} does not match remaining {} bytes",
                buf.len()
            )));
        }

        match code {
            MULTIHASH_IDENTITY if len <= MAX_INLINE_KEY_LENGTH => {}
            MULTIHASH_IDENTITY => {
                return Err(RecordError::InvalidPeerId(format!(
                    "inline key of {len} bytes exceeds {MAX_INLINE_KEY_LENGTH}"
                )))
            }
            MULTIHASH_SHA2_256 if len == SHA2_256_LENGTH => {}
            MULTIHASH_SHA2_256 => {
                return Err(RecordError::InvalidPeerId(format!(
                    "sha2-256 digest must be {SHA2_256_LENGTH} bytes, got {len}"
                )))
            }
            other => {
                return Err(RecordError::InvalidPeerId(format!(
                    "unsupported multihash code 0x{other:x}"
                )))
            }
        }

        Ok(Self(bytes.to_vec()))
    }

    /// Return the multihash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return an owned copy of the multihash bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Return the base58btc text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }

    /// Check whether `key` is the key this id was derived from.
    pub fn matches_public_key(&self, key: &PublicKey) -> bool {
        peer_id_matches_key(self, key)
    }
}

/// The identity-to-key binding check.
///
/// Recomputes the id from `key` and compares. Pure and side-effect free.
pub fn peer_id_matches_key(id: &PeerId, key: &PublicKey) -> bool {
    *id == PeerId::from_public_key(key)
}

fn multihash(code: u64, digest: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(digest.len() + 2);
    encode_varint(code, &mut out);
    encode_varint(digest.len() as u64, &mut out);
    out.extend_from_slice(digest);
    out
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl std::fmt::Debug for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PeerId").field(&self.to_base58()).finish()
    }
}

impl FromStr for PeerId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| RecordError::InvalidPeerId(format!("invalid base58: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for PeerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for PeerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
