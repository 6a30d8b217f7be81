//! Strict unsigned varints for multiaddr and multihash framing.
//!
//! Protobuf tolerates padded varints; the multiformats do not. A value must
//! use its shortest encoding and fit in 9 bytes (63 bits), so every value
//! has exactly one byte representation.

use prost::encoding::{decode_varint, encoded_len_varint};

const MAX_UVARINT_LEN: usize = 9;

/// Why a varint was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VarintError {
    Malformed(String),
    TooLong,
    NotMinimal,
}

impl std::fmt::Display for VarintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "{e}"),
            Self::TooLong => write!(f, "varint longer than {MAX_UVARINT_LEN} bytes"),
            Self::NotMinimal => write!(f, "varint not minimally encoded"),
        }
    }
}

/// Decode one varint from the front of `buf`, advancing it.
pub(crate) fn decode_uvarint(buf: &mut &[u8]) -> Result<u64, VarintError> {
    let before = buf.len();
    let value = decode_varint(buf).map_err(|e| VarintError::Malformed(e.to_string()))?;
    let consumed = before - buf.len();

    if consumed > MAX_UVARINT_LEN {
        return Err(VarintError::TooLong);
    }
    if consumed != encoded_len_varint(value) {
        return Err(VarintError::NotMinimal);
    }
    Ok(value)
}
