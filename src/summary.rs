//! The registry / report driver.
//!
//! A [`TrafficSummary`] owns one trie per address family and the customer [`Ledger`]. The
//! payload of every trie node is the [`AccountId`] of the owning customer; both roots carry
//! [`AccountId::UNKNOWN`]. Loading the registry fills the tries, replaying a traffic log
//! increments the accounts, and [`TrafficSummary::report`] reads the ledger back.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use either::Either;
use ipnet::{Ipv4Net, Ipv6Net};
use log::{debug, error, info, warn};

use crate::{
    error::{Error, FormatError, Warning},
    input::{decode, LogEntry, RegistryEntry},
    ledger::{AccountId, Ledger, UNKNOWN},
    parse::{parse_any_address, parse_any_prefix, Parsed},
    RadixTrie,
};

/// Number of non-empty lines read and how many of them were rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Non-empty lines.
    pub lines: usize,
    /// Lines rejected with a [`FormatError`].
    pub failed: usize,
}

/// Traffic per customer.
#[derive(Debug, Clone)]
pub struct TrafficSummary {
    v4: RadixTrie<Ipv4Net, AccountId>,
    v6: RadixTrie<Ipv6Net, AccountId>,
    ledger: Ledger,
    replayed: u128,
}

impl Default for TrafficSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl TrafficSummary {
    /// Create a summary without customers.
    pub fn new() -> Self {
        Self {
            v4: RadixTrie::with_default(AccountId::UNKNOWN),
            v6: RadixTrie::with_default(AccountId::UNKNOWN),
            ledger: Ledger::new(),
            replayed: 0,
        }
    }

    /// The customer table.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Number of registered subnets in both families.
    pub fn subnets(&self) -> usize {
        // the roots hold the unknown bucket
        self.v4.len() + self.v6.len() - 2
    }

    /// Register `subnet` as owned by `customer`. Non-fatal conditions are returned as warnings.
    /// The name of the unknown bucket cannot be used as a customer id.
    ///
    /// ```
    /// # use ip_summary::*;
    /// let mut summary = TrafficSummary::new();
    /// assert!(summary.register("acme.com", "10.0.0.0/8").unwrap().is_empty());
    /// assert_eq!(summary.register("acme.com", "10.0.0.1/8").unwrap().len(), 1);
    /// assert!(summary.register("acme.com", "10.0.0.0/99").is_err());
    /// assert!(summary.register("Unknown", "11.0.0.0/8").is_err());
    /// ```
    pub fn register(&mut self, customer: &str, subnet: &str) -> Result<Vec<Warning>, FormatError> {
        if customer == UNKNOWN {
            return Err(FormatError::ReservedCustomer(customer.to_owned()));
        }
        let parsed = parse_any_prefix(subnet)?;
        let account = self.ledger.account(customer);
        let (prefix, warning, previous) = match parsed {
            Either::Left(Parsed { prefix, warning }) => {
                (prefix.to_string(), warning, self.v4.insert(prefix, account).1)
            }
            Either::Right(Parsed { prefix, warning }) => {
                (prefix.to_string(), warning, self.v6.insert(prefix, account).1)
            }
        };

        let mut warnings: Vec<Warning> = warning.into_iter().collect();
        match previous {
            Some(previous) if previous != account => {
                warnings.push(Warning::DuplicateRegistration {
                    prefix,
                    previous: self.ledger.name(previous).to_owned(),
                    current: customer.to_owned(),
                });
            }
            Some(_) => debug!("{prefix} is registered to {customer} more than once"),
            None => {}
        }
        Ok(warnings)
    }

    /// Load a customer registry, one `customer_id subnet` pair per line.
    ///
    /// Every line is attempted, including lines that are not valid UTF-8. If any line is
    /// malformed the whole load fails with [`Error::Registry`] after the last line was read.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<LineStats, Error> {
        let mut stats = LineStats::default();
        for (number, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let number = number + 1;
            let result = decode(&line)
                .and_then(RegistryEntry::parse)
                .and_then(|entry| {
                    entry
                        .map(|entry| self.register(entry.customer, entry.subnet))
                        .transpose()
                });
            match result {
                Ok(None) => continue,
                Ok(Some(warnings)) => {
                    for warning in warnings {
                        warn!("customer registry line {number}: {warning}");
                    }
                }
                Err(e) => {
                    error!("customer registry line {number}: {e}");
                    stats.failed += 1;
                }
            }
            stats.lines += 1;
        }

        info!(
            "loaded {} subnets of {} customers from {} lines",
            self.subnets(),
            self.ledger.len(),
            stats.lines
        );
        if stats.failed > 0 {
            return Err(Error::Registry {
                failed: stats.failed,
                lines: stats.lines,
            });
        }
        Ok(stats)
    }

    /// Find the account owning `address`, without counting anything.
    pub fn resolve(&self, address: &str) -> Result<AccountId, FormatError> {
        let node = match parse_any_address(address)? {
            Either::Left(host) => self.v4[self.v4.lookup(&host)].value(),
            Either::Right(host) => self.v6[self.v6.lookup(&host)].value(),
        };
        Ok(node.copied().unwrap_or(AccountId::UNKNOWN))
    }

    /// Customer id owning `address`, or [`UNKNOWN`].
    pub fn owner(&self, address: &str) -> Result<&str, FormatError> {
        self.resolve(address).map(|id| self.ledger.name(id))
    }

    /// Count `bytes` for the owner of `address`.
    pub fn record(&mut self, address: &str, bytes: u64) -> Result<AccountId, FormatError> {
        let account = self.resolve(address)?;
        self.ledger.increment(account, bytes);
        self.replayed += u128::from(bytes);
        Ok(account)
    }

    /// Replay a traffic log, one `address bytes` pair per line.
    ///
    /// Malformed lines are skipped and logged; if there was any, the replay fails with
    /// [`Error::Log`] after the last line was read.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<LineStats, Error> {
        let mut stats = LineStats::default();
        for (number, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            let number = number + 1;
            let result = decode(&line).and_then(LogEntry::parse).and_then(|entry| {
                entry
                    .map(|entry| self.record(entry.address, entry.bytes))
                    .transpose()
            });
            match result {
                Ok(None) => continue,
                Ok(Some(_)) => {}
                Err(e) => {
                    error!("traffic log line {number}: {e}");
                    stats.failed += 1;
                }
            }
            stats.lines += 1;
        }

        info!(
            "replayed {} bytes from {} lines",
            self.replayed, stats.lines
        );
        if stats.failed > 0 {
            return Err(Error::Log {
                failed: stats.failed,
                lines: stats.lines,
            });
        }
        Ok(stats)
    }

    /// Customers with nonzero traffic in lexicographic order, followed by the unknown bucket.
    pub fn report(&self) -> Report {
        Report {
            customers: self
                .ledger
                .customers()
                .filter(|(_, counter)| !counter.is_zero())
                .map(|(name, counter)| (name.to_owned(), counter.get()))
                .collect(),
            unknown: self.ledger.unknown().get(),
        }
    }

    /// Check the structure of both tries.
    pub fn self_test(&self) -> Result<(), Error> {
        self.v4.validate()?;
        self.v6.validate()?;
        Ok(())
    }

    /// Check that `report` accounts for every byte that was replayed.
    pub fn check_totals(&self, report: &Report) -> Result<(), Error> {
        let reported = report.total();
        if reported != self.replayed {
            return Err(Error::TotalsMismatch {
                reported,
                replayed: self.replayed,
            });
        }
        Ok(())
    }
}

/// The final traffic summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// `(customer id, bytes)` for every customer with traffic, sorted by customer id.
    pub customers: Vec<(String, u128)>,
    /// Bytes that matched no registered subnet.
    pub unknown: u128,
}

impl Report {
    /// Sum over all lines, the unknown bucket included.
    pub fn total(&self) -> u128 {
        self.customers.iter().map(|(_, bytes)| bytes).sum::<u128>() + self.unknown
    }

    /// Write the report as `customer_id<TAB>bytes` lines. The unknown bucket comes last and is
    /// omitted when empty.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        write!(w, "{self}")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, bytes) in &self.customers {
            writeln!(f, "{name}\t{bytes}")?;
        }
        if self.unknown != 0 {
            writeln!(f, "{UNKNOWN}\t{}", self.unknown)?;
        }
        Ok(())
    }
}
