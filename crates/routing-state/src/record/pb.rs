//! Protobuf schema of the record payload.
//!
//! ```text
//! message RoutingStateRecord {
//!     bytes  peer_id = 1;
//!     uint64 seq     = 2;
//!     repeated AddressInfo addresses = 3;
//!
//!     message AddressInfo { bytes multiaddr = 1; }
//! }
//! ```

use crate::address::Multiaddr;

#[derive(Clone, PartialEq, prost::Message)]
pub struct RoutingStateRecord {
    #[prost(bytes = "vec", tag = "1")]
    pub peer_id: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub seq: u64,
    #[prost(message, repeated, tag = "3")]
    pub addresses: Vec<AddressInfo>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AddressInfo {
    #[prost(bytes = "vec", tag = "1")]
    pub multiaddr: Vec<u8>,
}

impl From<&Multiaddr> for AddressInfo {
    fn from(addr: &Multiaddr) -> Self {
        Self {
            multiaddr: addr.to_vec(),
        }
    }
}

/// Convert address entries, dropping any that are not well formed.
pub fn addrs_from_protobuf(entries: &[AddressInfo]) -> Vec<Multiaddr> {
    entries
        .iter()
        .filter_map(|entry| match Multiaddr::from_bytes(&entry.multiaddr) {
            Ok(addr) => Some(addr),
            Err(e) => {
                log::debug!("dropping malformed address in routing state record: {e}");
                None
            }
        })
        .collect()
}

/// Convert addresses to their protobuf entries, preserving order.
pub fn addrs_to_protobuf(addrs: &[Multiaddr]) -> Vec<AddressInfo> {
    addrs.iter().map(AddressInfo::from).collect()
}
