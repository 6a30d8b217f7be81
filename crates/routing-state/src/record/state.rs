//! The signed routing state record: build, authenticate, serialize, compare.

use prost::Message;

use crate::address::Multiaddr;
use crate::crypto::keys::Keypair;
use crate::envelope::SignedEnvelope;
use crate::error::{RecordError, Result};
use crate::identity::{peer_id_matches_key, PeerId};

use super::pb;
use super::summary::RecordSummary;
use super::{STATE_ENVELOPE_DOMAIN, STATE_ENVELOPE_PAYLOAD_TYPE};

/// A routing state record together with the envelope that authenticates it.
///
/// Immutable once constructed. A record obtained from
/// [`SignedRoutingState::from_bytes`] or [`SignedRoutingState::from_envelope`]
/// has had its signature, payload type, and peer id binding checked.
#[derive(Debug, Clone)]
pub struct SignedRoutingState {
    /// The peer this record pertains to.
    peer_id: PeerId,
    /// Increase-only ordering key; higher is newer.
    seq: u64,
    /// Addresses that survived parsing, in signed order.
    addresses: Vec<Multiaddr>,
    envelope: SignedEnvelope,
}

impl SignedRoutingState {
    /// Build and sign a record for `keypair`'s peer id with a timestamp-based
    /// sequence number.
    pub fn make(keypair: &Keypair, addresses: Vec<Multiaddr>) -> Result<Self> {
        RoutingStateBuilder::new(addresses).sign(keypair)
    }

    /// Open serialized envelope bytes and authenticate the record inside.
    ///
    /// Fails with `Authentication` if the signature or domain is wrong,
    /// `SchemaMismatch` for a foreign payload type, `MalformedPayload` if
    /// the payload does not decode, and `IdentityBinding` if the claimed
    /// peer id was not derived from the signing key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let envelope = SignedEnvelope::open(bytes, STATE_ENVELOPE_DOMAIN)?;
        Self::from_envelope(envelope)
    }

    /// Interpret an already opened envelope as a routing state record.
    pub fn from_envelope(envelope: SignedEnvelope) -> Result<Self> {
        if envelope.payload_type() != STATE_ENVELOPE_PAYLOAD_TYPE {
            return Err(RecordError::SchemaMismatch {
                expected: String::from_utf8_lossy(STATE_ENVELOPE_PAYLOAD_TYPE).into_owned(),
                actual: String::from_utf8_lossy(envelope.payload_type()).into_owned(),
            });
        }

        let msg = pb::RoutingStateRecord::decode(envelope.payload())
            .map_err(|e| RecordError::MalformedPayload(e.to_string()))?;

        let peer_id = PeerId::from_bytes(&msg.peer_id)
            .map_err(|e| RecordError::MalformedPayload(format!("peer id: {e}")))?;

        if !peer_id_matches_key(&peer_id, envelope.public_key()) {
            log::debug!(
                "rejecting routing state record: claims {peer_id}, signed by {}",
                envelope.public_key().to_peer_id()
            );
            return Err(RecordError::IdentityBinding);
        }

        let addresses = pb::addrs_from_protobuf(&msg.addresses);
        if addresses.len() < msg.addresses.len() {
            log::debug!(
                "routing state record for {peer_id}: kept {} of {} addresses",
                addresses.len(),
                msg.addresses.len()
            );
        }

        Ok(Self {
            peer_id,
            seq: msg.seq,
            addresses,
            envelope,
        })
    }

    /// Serialize as envelope bytes, byte-identical to what was signed or received.
    pub fn marshal(&self) -> Vec<u8> {
        self.envelope.marshal()
    }

    /// The peer this record pertains to.
    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    /// Increase-only sequence counter used to order records in time.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The addresses of the peer this record pertains to.
    pub fn addresses(&self) -> &[Multiaddr] {
        &self.addresses
    }

    /// The envelope carrying this record.
    pub fn envelope(&self) -> &SignedEnvelope {
        &self.envelope
    }

    /// True if this record describes the same peer as `other` and is newer.
    pub fn supersedes(&self, other: &SignedRoutingState) -> bool {
        self.peer_id == other.peer_id && self.seq > other.seq
    }

    /// A serializable view for display and export.
    pub fn summary(&self) -> RecordSummary {
        RecordSummary::from(self)
    }
}

impl PartialEq for SignedRoutingState {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
            && self.peer_id == other.peer_id
            && self.addresses == other.addresses
            && self.envelope == other.envelope
    }
}

impl Eq for SignedRoutingState {}

/// Builder for signed routing state records.
pub struct RoutingStateBuilder {
    addresses: Vec<Multiaddr>,
    seq: Option<u64>,
}

impl RoutingStateBuilder {
    /// Start a record advertising `addresses`, in order.
    pub fn new(addresses: Vec<Multiaddr>) -> Self {
        Self {
            addresses,
            seq: None,
        }
    }

    /// Append one address.
    pub fn address(mut self, addr: Multiaddr) -> Self {
        self.addresses.push(addr);
        self
    }

    /// Use an explicit sequence number instead of the clock.
    ///
    /// For callers that persist their own counter across restarts.
    pub fn seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    /// Sign and finalize the record.
    pub fn sign(self, keypair: &Keypair) -> Result<SignedRoutingState> {
        let peer_id = keypair.peer_id();
        let seq = self.seq.unwrap_or_else(crate::time::now_nanos);

        let payload = pb::RoutingStateRecord {
            peer_id: peer_id.to_bytes(),
            seq,
            addresses: pb::addrs_to_protobuf(&self.addresses),
        }
        .encode_to_vec();

        let envelope = SignedEnvelope::seal(
            keypair,
            STATE_ENVELOPE_DOMAIN,
            STATE_ENVELOPE_PAYLOAD_TYPE,
            &payload,
        )?;

        Ok(SignedRoutingState {
            peer_id,
            seq,
            addresses: self.addresses,
            envelope,
        })
    }
}

/// The record with the highest sequence number. Ties keep the first seen.
///
/// Callers pass records for a single peer; sequence numbers of different
/// peers are not comparable.
pub fn latest<'a, I>(records: I) -> Option<&'a SignedRoutingState>
where
    I: IntoIterator<Item = &'a SignedRoutingState>,
{
    records.into_iter().fold(None, |best, record| match best {
        Some(current) if current.seq >= record.seq => Some(current),
        _ => Some(record),
    })
}
