//! This crate attributes IP traffic volume to customers. Every customer owns a set of IPv4 or IPv6
//! subnets; every byte seen for an address is counted for the customer owning the most specific
//! subnet that contains the address, or for an *unknown* bucket if no subnet matches.
//!
//! The lookup structure is a [`RadixTrie`], a compressed binary trie that is generic over the
//! [`Prefix`] trait and instantiated once per address family (`u32` and `u128` addresses).
//!
//! ```
//! # use ip_summary::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut summary = TrafficSummary::new();
//! summary.load("A 10.0.0.0/8\nB 10.1.0.0/16\nC 192.168.0.0/24\n".as_bytes())?;
//! summary.replay("10.1.2.3 100\n10.2.2.3 100\n192.168.0.5 100\n8.8.8.8 100\n".as_bytes())?;
//! assert_eq!(summary.report().to_string(), "A\t100\nB\t100\nC\t100\nUnknown\t100\n");
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tree
//!
//! Each node covers a range `[begin, end)` of bit positions, counted from the most significant
//! bit. A chain of nodes with a single child each is collapsed into one node, so the depth of the
//! trie depends on the number of distinguishing bits rather than on the address width. Traversing
//! into the tree is done as follows: once the bits of a node are matched, we look at the bit at
//! position `end`. If it is not set, then we take the left branch, and otherwise, we take the right
//! one.
//!
//! Inserting a prefix either registers it on an existing node whose range ends exactly at the
//! prefix length, splices a new node in front of a node that the prefix contains, splits a node
//! at the first bit in which it diverges from the prefix, or adds a new leaf.
//!
//! The trie only grows: prefixes cannot be removed. Nodes live in an arena and refer to each
//! other by [`NodeId`].
//!
//! # Operations on the tree
//!
//! The following are the computational complexities of the functions, where `w` is the address
//! width in bits.
//!
//! | Operation                    | Complexity |
//! |------------------------------|------------|
//! | `insert`                     | `O(w)`     |
//! | `lookup`, `get_lpm`, `get`   | `O(w)`     |
//! | `validate`, `iter`           | `O(n)`     |
//! | `len` and `is_empty`         | `O(1)`     |

#![deny(missing_docs)]

pub mod counter;
pub mod error;
mod fmt;
pub mod input;
pub mod ledger;
pub mod parse;
mod prefix;
pub mod summary;
pub mod trie;

#[cfg(test)]
mod fuzzing;

pub use counter::ByteCounter;
pub use error::{Error, FormatError, InvariantViolation, Warning};
pub use ledger::{AccountId, Ledger};
pub use parse::{
    parse_address, parse_any_address, parse_any_prefix, parse_prefix, AddressFamily, Parsed,
};
pub use prefix::Prefix;
pub use summary::{LineStats, Report, TrafficSummary};
pub use trie::{Node, NodeId, RadixTrie};

/// Child slot selected by the bit of `prefix` at position `bit`.
#[inline(always)]
pub(crate) fn child_slot<P: Prefix>(prefix: &P, bit: u8) -> usize {
    prefix.is_bit_set(bit) as usize
}
