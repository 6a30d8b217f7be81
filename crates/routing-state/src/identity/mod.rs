//! Peer identity: self-certifying identifiers derived from public keys.
//!
//! A peer id is a multihash of the peer's encoded public key. Anyone
//! holding a key can recompute the id and compare; anyone holding an id
//! and a key can check that they belong together.

pub mod peer_id;

pub use peer_id::{peer_id_matches_key, PeerId};
