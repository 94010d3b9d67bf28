//! Subnet calculator
//!
//! Turns a raw address and mask into a canonical [`Network`] and derives the
//! presentation fields of a [`NetworkReport`]:
//! - Parse CIDR notation (e.g., "192.168.1.5/24") without rejecting host bits
//! - Combine a bare address with a netmask, hostmask or prefix length
//! - Compute first/last usable host and host count by address arithmetic
//!
//! # Examples
//!
//! ```
//! use informer_cidr::{describe, normalize};
//!
//! let network = normalize("10.0.0.1/8", "").unwrap();
//! let report = describe(&network);
//! assert_eq!(report.network_address.to_string(), "10.0.0.0");
//! assert_eq!(report.netmask.to_string(), "255.0.0.0");
//! assert_eq!(report.last_usable_ip.to_string(), "10.255.255.254");
//! assert_eq!(report.num_usable_ips, 16_777_214);
//! ```

use informer_core::{AddressFamily, InvalidAddressError, NetworkReport, Result, UsableIp};
use ipnet::{IpAdd, IpNet, IpSub};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::debug;

mod mask;

pub use mask::{parse_mask, parse_prefix_len};

/// Network block: base address plus prefix length
///
/// The base address never has host bits set. Serialized in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Network {
    net: IpNet,
}

impl Network {
    /// Create a network, clearing any host bits in `address`
    ///
    /// # Examples
    ///
    /// ```
    /// use informer_cidr::Network;
    ///
    /// let network = Network::new("192.168.1.5".parse().unwrap(), 24).unwrap();
    /// assert_eq!(network.to_string(), "192.168.1.0/24");
    /// ```
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self> {
        let net = IpNet::new(address, prefix_len)
            .map_err(|_| InvalidAddressError::PrefixLength(prefix_len.to_string()))?;

        Ok(Self { net: net.trunc() })
    }

    /// Parse `address/prefix` notation, clearing host bits
    ///
    /// IPv4 suffixes may also be a netmask or hostmask
    /// (`10.0.0.0/255.0.0.0`); IPv6 suffixes must be a prefix length.
    pub fn parse(text: &str) -> Result<Self> {
        let (addr_str, suffix) = text
            .split_once('/')
            .ok_or_else(|| InvalidAddressError::Notation(text.to_string()))?;

        if suffix.contains('/') {
            return Err(InvalidAddressError::Notation(text.to_string()));
        }

        let address = parse_address(addr_str)?;
        let prefix_len = match address {
            IpAddr::V4(_) => parse_mask(suffix)?,
            IpAddr::V6(_) => parse_prefix_len(suffix, AddressFamily::V6)?,
        };

        Self::new(address, prefix_len)
    }

    /// Base address
    pub fn address(&self) -> IpAddr {
        self.net.network()
    }

    /// Prefix length
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Address family
    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.net.addr())
    }

    /// Subnet mask (e.g. 255.255.255.0 for a /24)
    pub fn netmask(&self) -> IpAddr {
        self.net.netmask()
    }

    /// Hostmask, the inverse of the netmask (e.g. 0.0.0.255 for a /24)
    pub fn hostmask(&self) -> IpAddr {
        self.net.hostmask()
    }

    /// Highest address in the block (the broadcast address for IPv4)
    pub fn broadcast(&self) -> IpAddr {
        self.net.broadcast()
    }

    /// Total number of addresses in the block
    ///
    /// Saturates at `u128::MAX` for an IPv6 /0.
    pub fn size(&self) -> u128 {
        let host_len = u32::from(self.net.max_prefix_len() - self.net.prefix_len());
        1u128.checked_shl(host_len).unwrap_or(u128::MAX)
    }

    /// Check if an address lies in this block
    ///
    /// Addresses of the other family are never contained.
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.net.contains(&ip)
    }

    /// Inclusive range of usable host addresses, if any
    ///
    /// /31 and /32 (IPv6: /127 and /128) keep every address. Otherwise the
    /// base address is excluded, and for IPv4 the broadcast address too.
    pub fn usable_range(&self) -> Option<(IpAddr, IpAddr)> {
        let point_to_point = self.net.max_prefix_len() - self.net.prefix_len() <= 1;

        match self.net {
            IpNet::V4(net) => {
                let (base, top) = (net.network(), net.broadcast());
                let (first, last) = if point_to_point {
                    (base, top)
                } else {
                    (base.saturating_add(1u32), top.saturating_sub(1u32))
                };
                (first <= last).then(|| (IpAddr::V4(first), IpAddr::V4(last)))
            }
            IpNet::V6(net) => {
                let (base, top) = (net.network(), net.broadcast());
                let first = if point_to_point {
                    base
                } else {
                    base.saturating_add(1u128)
                };
                (first <= top).then(|| (IpAddr::V6(first), IpAddr::V6(top)))
            }
        }
    }

    /// Number of usable host addresses
    pub fn usable_count(&self) -> u128 {
        match self.usable_range() {
            Some((IpAddr::V4(first), IpAddr::V4(last))) => {
                u128::from(last.saturating_sub(first)) + 1
            }
            Some((IpAddr::V6(first), IpAddr::V6(last))) => last.saturating_sub(first) + 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl FromStr for Network {
    type Err = InvalidAddressError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Network {
    type Error = InvalidAddressError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        network.to_string()
    }
}

/// Normalize raw input into a network
///
/// If `ip` contains a `/` it is parsed as CIDR notation and
/// `mask_or_prefix` is ignored. Otherwise `ip` must be a bare address and
/// `mask_or_prefix` an IPv4 netmask, hostmask or prefix length (at most
/// 32, whatever the address family). Host bits are cleared in both cases.
///
/// # Examples
///
/// ```
/// use informer_cidr::normalize;
///
/// let a = normalize("192.168.1.5", "255.255.255.0").unwrap();
/// let b = normalize("192.168.1.0/24", "").unwrap();
/// assert_eq!(a, b);
/// assert!(normalize("192.168.1.5", "255.0.255.0").is_err());
/// ```
pub fn normalize(ip: &str, mask_or_prefix: &str) -> Result<Network> {
    let network = if ip.contains('/') {
        Network::parse(ip)?
    } else {
        let address = parse_address(ip)?;
        Network::new(address, parse_mask(mask_or_prefix)?)?
    };

    debug!(%network, "normalized input");
    Ok(network)
}

/// Derive the presentation fields of a network
///
/// First and last usable host are `N/A` when the usable range is empty.
pub fn describe(network: &Network) -> NetworkReport {
    let (first, last) = match network.usable_range() {
        Some((first, last)) => (Some(first), Some(last)),
        None => (None, None),
    };

    NetworkReport {
        network_address: network.address(),
        netmask: network.netmask(),
        first_usable_ip: UsableIp::from(first),
        last_usable_ip: UsableIp::from(last),
        num_usable_ips: network.usable_count(),
    }
}

/// Parse a bare IPv4 or IPv6 address
pub fn parse_address(text: &str) -> Result<IpAddr> {
    text.parse()
        .map_err(|_| InvalidAddressError::Address(text.to_string()))
}
