//! Core types and errors for IP Informer
//!
//! This crate provides the data model shared by the calculator and its callers:
//! - [`AddressFamily`] - IPv4 or IPv6
//! - [`UsableIp`] - A usable host address, or the `N/A` sentinel
//! - [`NetworkReport`] - The presentation view of a network
//! - [`InvalidAddressError`] - The error raised for any bad input
//!
//! ```
//! use informer_core::{NetworkReport, UsableIp};
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! let report = NetworkReport {
//!     network_address: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 0)),
//!     netmask: IpAddr::V4(Ipv4Addr::new(255, 255, 255, 0)),
//!     first_usable_ip: UsableIp::Address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))),
//!     last_usable_ip: UsableIp::Address(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 254))),
//!     num_usable_ips: 254,
//! };
//! assert_eq!(report.first_usable_ip.to_string(), "192.168.1.1");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Text shown in place of an address when a network has no usable hosts
pub const NOT_APPLICABLE: &str = "N/A";

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Family of an address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// Address width in bits, which is also the longest valid prefix
    pub fn max_prefix_len(self) -> u8 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// First or last usable host of a network
///
/// Serialized as a plain string: the address, or `"N/A"` when the
/// network has no usable hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsableIp {
    Address(IpAddr),
    NotApplicable,
}

impl UsableIp {
    /// The address, if there is one
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            UsableIp::Address(addr) => Some(*addr),
            UsableIp::NotApplicable => None,
        }
    }
}

impl From<Option<IpAddr>> for UsableIp {
    fn from(value: Option<IpAddr>) -> Self {
        value.map_or(UsableIp::NotApplicable, UsableIp::Address)
    }
}

impl fmt::Display for UsableIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsableIp::Address(addr) => write!(f, "{}", addr),
            UsableIp::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl FromStr for UsableIp {
    type Err = InvalidAddressError;

    fn from_str(s: &str) -> Result<Self> {
        if s == NOT_APPLICABLE {
            return Ok(UsableIp::NotApplicable);
        }
        s.parse()
            .map(UsableIp::Address)
            .map_err(|_| InvalidAddressError::Address(s.to_string()))
    }
}

impl Serialize for UsableIp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UsableIp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Descriptive view of a network, built fresh for each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkReport {
    /// Base address with host bits cleared
    pub network_address: IpAddr,
    /// Subnet mask in address notation
    pub netmask: IpAddr,
    /// Lowest usable host
    pub first_usable_ip: UsableIp,
    /// Highest usable host
    pub last_usable_ip: UsableIp,
    /// Number of usable hosts (an IPv6 /0 needs the full u128)
    pub num_usable_ips: u128,
}

/// The single error kind for rejected input
///
/// The variant records which part of the input was at fault; the
/// message is what callers show to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidAddressError {
    /// Not a valid IPv4 or IPv6 address
    #[error("Invalid IP address: {0}")]
    Address(String),

    /// Not a valid netmask, hostmask or prefix length
    #[error("Invalid subnet mask: {0}")]
    Mask(String),

    /// Prefix longer than the address family allows
    #[error("Invalid prefix length: {0}")]
    PrefixLength(String),

    /// Malformed `address/prefix` text
    #[error("Invalid CIDR notation: {0}")]
    Notation(String),
}

/// Result type alias for address operations
pub type Result<T> = std::result::Result<T, InvalidAddressError>;
