//! Network addresses carried in routing state records.
//!
//! Records treat addresses as opaque, self-delimiting byte strings. The
//! only structure the record layer relies on is whether an address is
//! well formed, which decides if it survives parsing.

pub mod multiaddr;

pub use multiaddr::{Multiaddr, Protocol};
