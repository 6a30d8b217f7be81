//! Envelope sealing, opening and serialization.

use prost::encoding::encode_varint;
use prost::Message;

use crate::crypto::keys::{Keypair, PublicKey, PublicKeyProto};
use crate::error::{RecordError, Result};

#[derive(Clone, PartialEq, prost::Message)]
struct EnvelopeProto {
    #[prost(message, optional, tag = "1")]
    public_key: Option<PublicKeyProto>,
    #[prost(bytes = "vec", tag = "2")]
    payload_type: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    payload: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    signature: Vec<u8>,
}

/// An authenticated envelope.
///
/// Retains the exact bytes it was sealed into or opened from, so that
/// [`SignedEnvelope::marshal`] reproduces them unchanged.
#[derive(Clone)]
pub struct SignedEnvelope {
    public_key: PublicKey,
    payload_type: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
    raw: Vec<u8>,
}

impl SignedEnvelope {
    /// Sign `payload` under `domain` and `payload_type`.
    pub fn seal(
        keypair: &Keypair,
        domain: &str,
        payload_type: &[u8],
        payload: &[u8],
    ) -> Result<Self> {
        if domain.is_empty() {
            return Err(RecordError::Signing("envelope domain must not be empty".into()));
        }

        let to_sign = signing_buffer(domain, payload_type, payload);
        let signature = keypair.sign(&to_sign)?;
        let public_key = *keypair.public();

        let raw = EnvelopeProto {
            public_key: Some(public_key.to_proto()),
            payload_type: payload_type.to_vec(),
            payload: payload.to_vec(),
            signature: signature.clone(),
        }
        .encode_to_vec();

        Ok(Self {
            public_key,
            payload_type: payload_type.to_vec(),
            payload: payload.to_vec(),
            signature,
            raw,
        })
    }

    /// Decode `bytes` and verify the signature under `domain`.
    ///
    /// Every failure, structural or cryptographic, is an
    /// `Authentication` error: the bytes cannot be trusted either way.
    pub fn open(bytes: &[u8], domain: &str) -> Result<Self> {
        if domain.is_empty() {
            return Err(RecordError::Authentication(
                "envelope domain must not be empty".into(),
            ));
        }

        let proto = EnvelopeProto::decode(bytes)
            .map_err(|e| RecordError::Authentication(format!("malformed envelope: {e}")))?;

        let public_key = proto
            .public_key
            .ok_or_else(|| RecordError::Authentication("envelope has no public key".into()))
            .and_then(|key| {
                PublicKey::from_proto(key).map_err(|e| {
                    RecordError::Authentication(format!("envelope public key: {e}"))
                })
            })?;

        let to_verify = signing_buffer(domain, &proto.payload_type, &proto.payload);
        public_key.verify(&to_verify, &proto.signature)?;

        log::trace!(
            "opened envelope: domain={domain} payload_type={} payload_len={}",
            String::from_utf8_lossy(&proto.payload_type),
            proto.payload.len()
        );

        Ok(Self {
            public_key,
            payload_type: proto.payload_type,
            payload: proto.payload,
            signature: proto.signature,
            raw: bytes.to_vec(),
        })
    }

    /// The key that signed this envelope.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The payload-type tag.
    pub fn payload_type(&self) -> &[u8] {
        &self.payload_type
    }

    /// The signed payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Serialize for transmission. Byte-identical to the sealed or opened input.
    pub fn marshal(&self) -> Vec<u8> {
        self.raw.clone()
    }
}

impl PartialEq for SignedEnvelope {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
            && self.payload_type == other.payload_type
            && self.payload == other.payload
            && self.signature == other.signature
    }
}

impl Eq for SignedEnvelope {}

impl std::fmt::Debug for SignedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedEnvelope")
            .field("public_key", &self.public_key)
            .field(
                "payload_type",
                &String::from_utf8_lossy(&self.payload_type),
            )
            .field("payload_len", &self.payload.len())
            .field("signature", &hex::encode(&self.signature))
            .finish()
    }
}

/// The bytes an envelope signature covers:
/// `uvarint(len) || domain || uvarint(len) || payload_type || uvarint(len) || payload`.
pub fn signing_buffer(domain: &str, payload_type: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(domain.len() + payload_type.len() + payload.len() + 12);
    for field in [domain.as_bytes(), payload_type, payload] {
        encode_varint(field.len() as u64, &mut out);
        out.extend_from_slice(field);
    }
    out
}
