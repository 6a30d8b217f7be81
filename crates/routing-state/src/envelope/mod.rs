//! Signed envelopes: a payload bound to a payload-type tag and a signing
//! domain, signed by an embedded public key.
//!
//! The domain string is mixed into the signed bytes but never written to
//! the wire, so an envelope signed for one domain fails verification in
//! any other. A `SignedEnvelope` value can only be obtained by sealing or
//! by successfully opening bytes, so holding one means its signature has
//! been checked.
//!
//! Wire format (protobuf):
//! ```text
//! message Envelope {
//!     PublicKey public_key   = 1;
//!     bytes     payload_type = 2;
//!     bytes     payload      = 3;
//!     bytes     signature    = 5;
//! }
//! ```

pub mod signed;

pub use signed::{signing_buffer, SignedEnvelope};
