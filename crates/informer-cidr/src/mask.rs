//! Subnet mask and prefix length parsing
//!
//! A mask may be given as a bare prefix length (`24`), a dotted-decimal
//! netmask (`255.255.255.0`) or a dotted-decimal hostmask (`0.0.0.255`).

use informer_core::{AddressFamily, InvalidAddressError, Result};
use ipnet::ipv4_mask_to_prefix;
use std::net::Ipv4Addr;

/// Parse a mask or prefix length into a prefix length
///
/// The mask is IPv4 notation whatever address it is paired with, so a
/// bare prefix length is at most 32.
///
/// # Examples
///
/// ```
/// use informer_cidr::parse_mask;
///
/// assert_eq!(parse_mask("255.255.255.0").unwrap(), 24);
/// assert_eq!(parse_mask("0.0.0.255").unwrap(), 24);
/// assert_eq!(parse_mask("24").unwrap(), 24);
/// assert!(parse_mask("64").is_err());
/// assert!(parse_mask("255.0.255.0").is_err());
/// ```
pub fn parse_mask(text: &str) -> Result<u8> {
    if is_decimal(text) {
        return parse_prefix_len(text, AddressFamily::V4);
    }

    let mask: Ipv4Addr = text
        .parse()
        .map_err(|_| InvalidAddressError::Mask(text.to_string()))?;

    // Netmask reading wins, so 0.0.0.0 is /0 and 255.255.255.255 is /32
    ipv4_mask_to_prefix(mask)
        .or_else(|_| ipv4_mask_to_prefix(!mask))
        .map_err(|_| InvalidAddressError::Mask(text.to_string()))
}

/// Parse a bare decimal prefix length
pub fn parse_prefix_len(text: &str, family: AddressFamily) -> Result<u8> {
    if !is_decimal(text) {
        return Err(InvalidAddressError::PrefixLength(text.to_string()));
    }

    let prefix_len: u8 = text
        .parse()
        .map_err(|_| InvalidAddressError::PrefixLength(text.to_string()))?;

    if prefix_len > family.max_prefix_len() {
        return Err(InvalidAddressError::PrefixLength(text.to_string()));
    }

    Ok(prefix_len)
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
