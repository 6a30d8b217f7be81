//! Serializable record summaries for display and export.

use serde::{Deserialize, Serialize};

use crate::address::Multiaddr;
use crate::identity::PeerId;

use super::state::SignedRoutingState;

/// Sequence numbers at or above this look like nanosecond timestamps
/// (2001-09-09 onwards) and get a human-readable rendering.
const TIMESTAMP_SEQ_FLOOR: u64 = 1_000_000_000_000_000_000;

/// Public view of a routing state record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub peer_id: PeerId,
    pub seq: u64,
    /// `seq` as RFC 3339, when it was generated from the clock.
    pub issued_at: Option<String>,
    pub addresses: Vec<Multiaddr>,
    pub payload_type: String,
    /// Hex of the raw Ed25519 public key.
    pub public_key: String,
}

impl From<&SignedRoutingState> for RecordSummary {
    fn from(record: &SignedRoutingState) -> Self {
        let seq = record.seq();
        Self {
            peer_id: record.peer_id().clone(),
            seq,
            issued_at: (seq >= TIMESTAMP_SEQ_FLOOR).then(|| crate::time::nanos_to_rfc3339(seq)),
            addresses: record.addresses().to_vec(),
            payload_type: String::from_utf8_lossy(record.envelope().payload_type()).into_owned(),
            public_key: hex::encode(record.envelope().public_key().to_bytes()),
        }
    }
}
