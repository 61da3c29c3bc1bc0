//! The customer table: one byte counter per customer id, plus the unknown bucket.

use std::{collections::BTreeMap, ops::Index};

use crate::counter::ByteCounter;

/// Name of the bucket for traffic that matches no registered subnet.
pub const UNKNOWN: &str = "Unknown";

/// Handle of an account in a [`Ledger`]. This is the payload stored in the tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(usize);

impl AccountId {
    /// The unknown bucket. It exists in every ledger.
    pub const UNKNOWN: AccountId = AccountId(0);
}

/// Accounts are created on first use and never removed.
#[derive(Debug, Clone)]
pub struct Ledger {
    names: Vec<String>,
    counters: Vec<ByteCounter>,
    by_name: BTreeMap<String, AccountId>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            names: vec![UNKNOWN.to_owned()],
            counters: vec![ByteCounter::new()],
            by_name: BTreeMap::new(),
        }
    }
}

impl Ledger {
    /// Create a ledger holding only the unknown bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the account of `customer`, creating it if it does not exist yet.
    pub fn account(&mut self, customer: &str) -> AccountId {
        if let Some(id) = self.by_name.get(customer) {
            return *id;
        }
        let id = AccountId(self.names.len());
        self.names.push(customer.to_owned());
        self.counters.push(ByteCounter::new());
        self.by_name.insert(customer.to_owned(), id);
        id
    }

    /// Get the account of `customer` without creating it.
    pub fn get(&self, customer: &str) -> Option<AccountId> {
        self.by_name.get(customer).copied()
    }

    /// Customer id of an account.
    pub fn name(&self, id: AccountId) -> &str {
        &self.names[id.0]
    }

    /// Add `bytes` to an account.
    pub fn increment(&mut self, id: AccountId, bytes: u64) {
        self.counters[id.0].increment(bytes);
    }

    /// The unknown bucket.
    pub fn unknown(&self) -> &ByteCounter {
        &self[AccountId::UNKNOWN]
    }

    /// All customers, sorted by customer id.
    pub fn customers(&self) -> impl Iterator<Item = (&str, &ByteCounter)> + '_ {
        self.by_name
            .iter()
            .map(|(name, id)| (name.as_str(), &self.counters[id.0]))
    }

    /// Number of customers, not counting the unknown bucket.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True if no customer was registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Index<AccountId> for Ledger {
    type Output = ByteCounter;

    fn index(&self, index: AccountId) -> &ByteCounter {
        &self.counters[index.0]
    }
}
