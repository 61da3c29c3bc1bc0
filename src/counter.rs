//! Traffic accumulator.

use std::fmt;

/// Monotonic byte counter. Each increment is at most `u64::MAX`, and the 128-bit sum cannot
/// overflow before `2^64` increments of that size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteCounter(u128);

impl ByteCounter {
    /// A counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `bytes` to the counter.
    pub fn increment(&mut self, bytes: u64) {
        self.0 += u128::from(bytes);
    }

    /// Total number of bytes counted.
    pub fn get(&self) -> u128 {
        self.0
    }

    /// True if nothing was counted yet.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ByteCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
