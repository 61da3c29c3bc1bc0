//! Errors and warnings reported at the library boundary.

use thiserror::Error;

use crate::trie::NodeId;

/// Malformed input text. Raised by the parsers, never by the trie.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The text is not a valid address of the expected family.
    #[error("invalid {family} address: {text:?}")]
    Address {
        /// Offending text.
        text: String,
        /// Name of the address family that was expected.
        family: &'static str,
    },
    /// The prefix length after `/` is not a number in `1..=max`.
    #[error("invalid prefix length {text:?}: expected a number between 1 and {max}")]
    PrefixLength {
        /// Offending text.
        text: String,
        /// Width of the address family.
        max: u8,
    },
    /// The byte count of a traffic record is not an unsigned 64-bit number.
    #[error("invalid byte count: {0:?}")]
    ByteCount(String),
    /// A record ended before all of its fields were read.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// A record has more fields than expected.
    #[error("unexpected trailing field: {0:?}")]
    TrailingField(String),
    /// The line is not valid UTF-8.
    #[error("invalid UTF-8 after byte {valid_up_to}")]
    Encoding {
        /// Length of the valid prefix of the line.
        valid_up_to: usize,
    },
    /// The customer id collides with the name of the unknown bucket.
    #[error("customer id {0:?} is reserved for unattributed traffic")]
    ReservedCustomer(String),
}

/// A structural problem inside a [`crate::RadixTrie`]. Observing one means the insertion
/// algorithm is broken; correct inputs never produce it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("trie invariant violated at node {node:?}: {reason}")]
pub struct InvariantViolation {
    /// Node at which the check failed.
    pub node: NodeId,
    /// The invariant that does not hold.
    pub reason: &'static str,
}

/// Errors of the registry / report driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading input or writing the report failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// At least one registry line was rejected. The loaded state must not be used.
    #[error("customer registry rejected: {failed} of {lines} lines are malformed")]
    Registry {
        /// Number of rejected lines.
        failed: usize,
        /// Number of non-empty lines read.
        lines: usize,
    },
    /// At least one traffic log line was rejected.
    #[error("traffic log rejected: {failed} of {lines} lines are malformed")]
    Log {
        /// Number of rejected lines.
        failed: usize,
        /// Number of non-empty lines read.
        lines: usize,
    },
    /// The bytes in the report do not add up to the bytes replayed.
    #[error("report total {reported} differs from replayed total {replayed}")]
    TotalsMismatch {
        /// Sum over all lines of the report.
        reported: u128,
        /// Sum of all byte counts fed into the summary.
        replayed: u128,
    },
    /// The trie self check failed.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// A non-fatal condition. The offending record is still used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// The address had bits set beyond the prefix length. They were cleared.
    #[error("host bits are set in {text}, using {canonical}")]
    HostBitsSet {
        /// Text as given.
        text: String,
        /// Canonical network the record was registered as.
        canonical: String,
    },
    /// The same prefix was registered for two different customers. The later one wins.
    #[error("{prefix} is registered to both {previous} and {current}, keeping {current}")]
    DuplicateRegistration {
        /// The prefix registered twice.
        prefix: String,
        /// Customer that owned the prefix before.
        previous: String,
        /// Customer that owns the prefix now.
        current: String,
    },
}
