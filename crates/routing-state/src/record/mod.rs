//! Routing state records.
//!
//! A record states "peer P is reachable at these addresses, as of sequence
//! number S", signed by P's own key inside a [`SignedEnvelope`]. Consumers
//! keep the record with the highest sequence number per peer.
//!
//! [`SignedEnvelope`]: crate::envelope::SignedEnvelope

pub mod pb;
pub mod state;
pub mod summary;

pub use state::{latest, RoutingStateBuilder, SignedRoutingState};
pub use summary::RecordSummary;

/// The signing domain of routing state records.
pub const STATE_ENVELOPE_DOMAIN: &str = "libp2p-routing-state";

/// The envelope payload type of routing state records.
// TODO: switch to the multicodec code once one is registered for this payload
pub const STATE_ENVELOPE_PAYLOAD_TYPE: &[u8] = b"/libp2p/routing-state-record";
