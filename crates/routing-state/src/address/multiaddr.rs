//! A validated subset of the multiaddr format.
//!
//! Binary form is a sequence of `uvarint(code) || value` components, where
//! the value is fixed-width or `uvarint(len) || bytes` depending on the
//! protocol. Text form is `/ip4/1.2.3.4/tcp/4001`.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use prost::encoding::encode_varint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RecordError, Result};
use crate::identity::PeerId;
use crate::varint::decode_uvarint;

const IP4: u64 = 4;
const TCP: u64 = 6;
const DCCP: u64 = 33;
const IP6: u64 = 41;
const DNS: u64 = 53;
const DNS4: u64 = 54;
const DNS6: u64 = 55;
const DNSADDR: u64 = 56;
const SCTP: u64 = 132;
const UDP: u64 = 273;
const P2P: u64 = 421;
const TLS: u64 = 448;
const QUIC: u64 = 460;
const QUIC_V1: u64 = 461;
const WS: u64 = 477;
const WSS: u64 = 478;
const HTTP: u64 = 480;

/// One component of a multiaddr.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ip4(Ipv4Addr),
    Ip6(Ipv6Addr),
    Tcp(u16),
    Udp(u16),
    Dccp(u16),
    Sctp(u16),
    Dns(String),
    Dns4(String),
    Dns6(String),
    Dnsaddr(String),
    P2p(PeerId),
    Tls,
    Quic,
    QuicV1,
    Ws,
    Wss,
    Http,
}

impl Protocol {
    /// The multicodec code of this protocol.
    pub fn code(&self) -> u64 {
        match self {
            Self::Ip4(_) => IP4,
            Self::Ip6(_) => IP6,
            Self::Tcp(_) => TCP,
            Self::Udp(_) => UDP,
            Self::Dccp(_) => DCCP,
            Self::Sctp(_) => SCTP,
            Self::Dns(_) => DNS,
            Self::Dns4(_) => DNS4,
            Self::Dns6(_) => DNS6,
            Self::Dnsaddr(_) => DNSADDR,
            Self::P2p(_) => P2P,
            Self::Tls => TLS,
            Self::Quic => QUIC,
            Self::QuicV1 => QUIC_V1,
            Self::Ws => WS,
            Self::Wss => WSS,
            Self::Http => HTTP,
        }
    }

    /// The text name of this protocol.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ip4(_) => "ip4",
            Self::Ip6(_) => "ip6",
            Self::Tcp(_) => "tcp",
            Self::Udp(_) => "udp",
            Self::Dccp(_) => "dccp",
            Self::Sctp(_) => "sctp",
            Self::Dns(_) => "dns",
            Self::Dns4(_) => "dns4",
            Self::Dns6(_) => "dns6",
            Self::Dnsaddr(_) => "dnsaddr",
            Self::P2p(_) => "p2p",
            Self::Tls => "tls",
            Self::Quic => "quic",
            Self::QuicV1 => "quic-v1",
            Self::Ws => "ws",
            Self::Wss => "wss",
            Self::Http => "http",
        }
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        encode_varint(self.code(), out);
        match self {
            Self::Ip4(ip) => out.extend_from_slice(&ip.octets()),
            Self::Ip6(ip) => out.extend_from_slice(&ip.octets()),
            Self::Tcp(port) | Self::Udp(port) | Self::Dccp(port) | Self::Sctp(port) => {
                out.extend_from_slice(&port.to_be_bytes())
            }
            Self::Dns(name) | Self::Dns4(name) | Self::Dns6(name) | Self::Dnsaddr(name) => {
                write_length_prefixed(name.as_bytes(), out)
            }
            Self::P2p(id) => write_length_prefixed(id.as_bytes(), out),
            Self::Tls | Self::Quic | Self::QuicV1 | Self::Ws | Self::Wss | Self::Http => {}
        }
    }

    fn read_bytes(buf: &mut &[u8]) -> Result<Self> {
        let code = decode_uvarint(buf)
            .map_err(|e| RecordError::InvalidAddress(format!("protocol code: {e}")))?;
        let protocol = match code {
            IP4 => {
                let octets: [u8; 4] = take_array(buf, "ip4")?;
                Self::Ip4(Ipv4Addr::from(octets))
            }
            IP6 => {
                let octets: [u8; 16] = take_array(buf, "ip6")?;
                Self::Ip6(Ipv6Addr::from(octets))
            }
            TCP => Self::Tcp(u16::from_be_bytes(take_array(buf, "tcp")?)),
            UDP => Self::Udp(u16::from_be_bytes(take_array(buf, "udp")?)),
            DCCP => Self::Dccp(u16::from_be_bytes(take_array(buf, "dccp")?)),
            SCTP => Self::Sctp(u16::from_be_bytes(take_array(buf, "sctp")?)),
            DNS => Self::Dns(take_name(buf)?),
            DNS4 => Self::Dns4(take_name(buf)?),
            DNS6 => Self::Dns6(take_name(buf)?),
            DNSADDR => Self::Dnsaddr(take_name(buf)?),
            P2P => Self::P2p(PeerId::from_bytes(take_length_prefixed(buf)?)?),
            TLS => Self::Tls,
            QUIC => Self::Quic,
            QUIC_V1 => Self::QuicV1,
            WS => Self::Ws,
            WSS => Self::Wss,
            HTTP => Self::Http,
            other => {
                return Err(RecordError::InvalidAddress(format!(
                    "unknown protocol code {other}"
                )))
            }
        };
        Ok(protocol)
    }

    fn parse_text<'a>(name: &str, parts: &mut impl Iterator<Item = &'a str>) -> Result<Self> {
        let mut value = || {
            parts
                .next()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RecordError::InvalidAddress(format!("/{name} requires a value")))
        };
        let protocol = match name {
            "ip4" => Self::Ip4(parse_value(value()?, name)?),
            "ip6" => Self::Ip6(parse_value(value()?, name)?),
            "tcp" => Self::Tcp(parse_value(value()?, name)?),
            "udp" => Self::Udp(parse_value(value()?, name)?),
            "dccp" => Self::Dccp(parse_value(value()?, name)?),
            "sctp" => Self::Sctp(parse_value(value()?, name)?),
            "dns" => Self::Dns(value()?.to_string()),
            "dns4" => Self::Dns4(value()?.to_string()),
            "dns6" => Self::Dns6(value()?.to_string()),
            "dnsaddr" => Self::Dnsaddr(value()?.to_string()),
            "p2p" => Self::P2p(value()?.parse()?),
            "tls" => Self::Tls,
            "quic" => Self::Quic,
            "quic-v1" => Self::QuicV1,
            "ws" => Self::Ws,
            "wss" => Self::Wss,
            "http" => Self::Http,
            other => {
                return Err(RecordError::InvalidAddress(format!(
                    "unknown protocol /{other}"
                )))
            }
        };
        Ok(protocol)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.name())?;
        match self {
            Self::Ip4(ip) => write!(f, "/{ip}"),
            Self::Ip6(ip) => write!(f, "/{ip}"),
            Self::Tcp(port) | Self::Udp(port) | Self::Dccp(port) | Self::Sctp(port) => {
                write!(f, "/{port}")
            }
            Self::Dns(name) | Self::Dns4(name) | Self::Dns6(name) | Self::Dnsaddr(name) => {
                write!(f, "/{name}")
            }
            Self::P2p(id) => write!(f, "/{id}"),
            Self::Tls | Self::Quic | Self::QuicV1 | Self::Ws | Self::Wss | Self::Http => Ok(()),
        }
    }
}

/// A well-formed network address.
///
/// Equality and hashing are byte equality over the binary form.
#[derive(Clone)]
pub struct Multiaddr {
    bytes: Vec<u8>,
    protocols: Vec<Protocol>,
}

impl Multiaddr {
    /// Decode and validate the binary form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(RecordError::InvalidAddress("empty address".into()));
        }
        let mut buf = bytes;
        let mut protocols = Vec::new();
        while !buf.is_empty() {
            protocols.push(Protocol::read_bytes(&mut buf)?);
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            protocols,
        })
    }

    /// Assemble an address from components.
    pub fn from_protocols(protocols: impl IntoIterator<Item = Protocol>) -> Result<Self> {
        let protocols: Vec<Protocol> = protocols.into_iter().collect();
        if protocols.is_empty() {
            return Err(RecordError::InvalidAddress("empty address".into()));
        }
        let mut bytes = Vec::new();
        for protocol in &protocols {
            protocol.write_bytes(&mut bytes);
        }
        Ok(Self { bytes, protocols })
    }

    /// Return the binary form.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return an owned copy of the binary form.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// The decoded components, in order.
    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }
}

impl PartialEq for Multiaddr {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Multiaddr {}

impl std::hash::Hash for Multiaddr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::fmt::Display for Multiaddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for protocol in &self.protocols {
            write!(f, "{protocol}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Multiaddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Multiaddr({self})")
    }
}

impl FromStr for Multiaddr {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| RecordError::InvalidAddress(format!("must start with '/': {s}")))?;
        let mut parts = rest.split('/');
        let mut protocols = Vec::new();
        while let Some(name) = parts.next() {
            if name.is_empty() {
                return Err(RecordError::InvalidAddress(format!("empty component in {s}")));
            }
            protocols.push(Protocol::parse_text(name, &mut parts)?);
        }
        Self::from_protocols(protocols)
    }
}

impl Serialize for Multiaddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Multiaddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Binary helpers ────────────────────────────────────────────────────────────

fn write_length_prefixed(value: &[u8], out: &mut Vec<u8>) {
    encode_varint(value.len() as u64, out);
    out.extend_from_slice(value);
}

fn take<'a>(buf: &mut &'a [u8], n: usize, what: &str) -> Result<&'a [u8]> {
    if buf.len() < n {
        return Err(RecordError::InvalidAddress(format!(
            "truncated /{what}: need {n} bytes, have {}",
            buf.len()
        )));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

fn take_array<const N: usize>(buf: &mut &[u8], what: &str) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(take(buf, N, what)?);
    Ok(out)
}

fn take_length_prefixed<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let len = decode_uvarint(buf)
        .map_err(|e| RecordError::InvalidAddress(format!("value length: {e}")))?;
    let len = usize::try_from(len)
        .map_err(|_| RecordError::InvalidAddress("value length overflow".into()))?;
    take(buf, len, "value")
}

fn take_name(buf: &mut &[u8]) -> Result<String> {
    let raw = take_length_prefixed(buf)?;
    if raw.is_empty() {
        return Err(RecordError::InvalidAddress("empty dns name".into()));
    }
    let name = String::from_utf8(raw.to_vec())
        .map_err(|_| RecordError::InvalidAddress("dns name is not UTF-8".into()))?;
    if name.contains('/') {
        return Err(RecordError::InvalidAddress(format!(
            "dns name contains '/': {name}"
        )));
    }
    Ok(name)
}

fn parse_value<T: FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| RecordError::InvalidAddress(format!("invalid /{name} value: {value}")))
}
