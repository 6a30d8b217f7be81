//! Routing state records: signed, self-certifying statements of a peer's
//! identity, sequence number, and reachable addresses.
//!
//! A record is carried inside a signed envelope. Any participant can open
//! the envelope, check that the claimed peer id belongs to the key that
//! signed it, and compare sequence numbers against previously seen records
//! to discard stale ones.

pub mod address;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod record;
pub mod storage;
pub mod time;
mod varint;

// Re-export primary types
pub use address::Multiaddr;
pub use crypto::keys::{Keypair, PublicKey};
pub use envelope::SignedEnvelope;
pub use error::{RecordError, Result};
pub use identity::{peer_id_matches_key, PeerId};
pub use record::{
    latest, RecordSummary, RoutingStateBuilder, SignedRoutingState, STATE_ENVELOPE_DOMAIN,
    STATE_ENVELOPE_PAYLOAD_TYPE,
};
