//! Cryptographic primitives.
//!
//! This module provides:
//! - Ed25519 key pairs and the canonical public key encoding
//! - Signing and strict signature verification
//! - HKDF-SHA256 and Argon2id key derivation for key files
//! - ChaCha20-Poly1305 authenticated encryption for key files

pub mod derivation;
pub mod encryption;
pub mod keys;
pub mod random;
pub mod signing;
