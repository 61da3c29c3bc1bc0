//! Parsing addresses and prefixes from their textual notation.
//!
//! Addresses are dotted-quad for IPv4 and colon-hex for IPv6. A prefix is an address with an
//! optional `/bits` suffix; without it the prefix is a host route covering the full width.

use std::{
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use either::Either;
use ipnet::{Ipv4Net, Ipv6Net};

use crate::{
    error::{FormatError, Warning},
    Prefix,
};

/// An address family that can be read from text.
pub trait AddressFamily: Prefix + Clone + Display {
    /// Plain address type of the family.
    type Addr: FromStr;

    /// Human readable name, used in error messages.
    const NAME: &'static str;

    /// Integer representation of an address, most significant bit first.
    fn addr_repr(addr: Self::Addr) -> Self::R;
}

impl AddressFamily for Ipv4Net {
    type Addr = Ipv4Addr;
    const NAME: &'static str = "IPv4";

    fn addr_repr(addr: Ipv4Addr) -> u32 {
        addr.into()
    }
}

impl AddressFamily for Ipv6Net {
    type Addr = Ipv6Addr;
    const NAME: &'static str = "IPv6";

    fn addr_repr(addr: Ipv6Addr) -> u128 {
        addr.into()
    }
}

/// A successfully parsed prefix and the warning raised while canonicalizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<P> {
    /// The prefix with all host bits cleared.
    pub prefix: P,
    /// Set if the text had host bits set.
    pub warning: Option<Warning>,
}

/// Parse a plain address into a host route of full width.
///
/// ```
/// # use ip_summary::*;
/// # use ipnet::Ipv4Net;
/// let host: Ipv4Net = parse_address("10.1.2.3").unwrap();
/// assert_eq!(host, "10.1.2.3/32".parse().unwrap());
/// assert!(parse_address::<Ipv4Net>("10.1.2").is_err());
/// ```
pub fn parse_address<P: AddressFamily>(text: &str) -> Result<P, FormatError> {
    let addr = text.parse::<P::Addr>().map_err(|_| FormatError::Address {
        text: text.to_owned(),
        family: P::NAME,
    })?;
    Ok(P::from_repr_len(P::addr_repr(addr), P::width()))
}

/// Parse `address[/bits]`. Host bits beyond the prefix length are cleared and reported as a
/// [`Warning::HostBitsSet`].
///
/// ```
/// # use ip_summary::*;
/// # use ipnet::Ipv4Net;
/// let parsed = parse_prefix::<Ipv4Net>("192.168.1.5/24").unwrap();
/// assert_eq!(parsed.prefix, "192.168.1.0/24".parse().unwrap());
/// assert!(parsed.warning.is_some());
/// ```
pub fn parse_prefix<P: AddressFamily>(text: &str) -> Result<Parsed<P>, FormatError> {
    let (addr, len) = match text.split_once('/') {
        Some((addr, len)) => (addr, Some(len)),
        None => (text, None),
    };
    let host: P = parse_address(addr)?;
    let len = match len {
        Some(len) => parse_prefix_len(len, P::width())?,
        None => P::width(),
    };

    let prefix = P::from_repr_len(host.repr(), len);
    let network = prefix.mask();
    if network == prefix.repr() {
        return Ok(Parsed {
            prefix,
            warning: None,
        });
    }

    let prefix = P::from_repr_len(network, len);
    let warning = Warning::HostBitsSet {
        text: text.to_owned(),
        canonical: prefix.to_string(),
    };
    Ok(Parsed {
        prefix,
        warning: Some(warning),
    })
}

/// Strictly decimal, in `1..=max`.
fn parse_prefix_len(text: &str, max: u8) -> Result<u8, FormatError> {
    let err = || FormatError::PrefixLength {
        text: text.to_owned(),
        max,
    };
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    match text.parse::<u8>() {
        Ok(len) if (1..=max).contains(&len) => Ok(len),
        _ => Err(err()),
    }
}

/// Colon-hex notation selects the IPv6 family.
fn is_ipv6(text: &str) -> bool {
    text.contains(':')
}

/// Parse an address of either family.
pub fn parse_any_address(text: &str) -> Result<Either<Ipv4Net, Ipv6Net>, FormatError> {
    if is_ipv6(text) {
        parse_address(text).map(Either::Right)
    } else {
        parse_address(text).map(Either::Left)
    }
}

/// Parse a prefix of either family.
pub fn parse_any_prefix(
    text: &str,
) -> Result<Either<Parsed<Ipv4Net>, Parsed<Ipv6Net>>, FormatError> {
    if is_ipv6(text) {
        parse_prefix(text).map(Either::Right)
    } else {
        parse_prefix(text).map(Either::Left)
    }
}
