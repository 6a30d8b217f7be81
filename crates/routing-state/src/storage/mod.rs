//! Storage helpers for signing keys.
//!
//! Received records are not persisted here; callers decide how and where
//! to keep them. This module only covers the signer's own key material.
//!
//! # Modules
//!
//! - [`key_file`]: `.key` file save/load with passphrase encryption.

pub mod key_file;

pub use key_file::{load_keypair, read_peer_id, save_keypair, write_atomic, KeyFile};
