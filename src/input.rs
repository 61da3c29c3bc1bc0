//! Line records of the customer registry and the traffic log.

use crate::error::FormatError;

/// `customer_id subnet`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry<'a> {
    /// Customer id.
    pub customer: &'a str,
    /// Subnet in `address/bits` notation, not parsed yet.
    pub subnet: &'a str,
}

impl<'a> RegistryEntry<'a> {
    /// Split a registry line. Returns `None` for a blank line.
    pub fn parse(line: &'a str) -> Result<Option<Self>, FormatError> {
        let Some([customer, subnet]) = fields(line, ["customer id", "subnet"])? else {
            return Ok(None);
        };
        Ok(Some(Self { customer, subnet }))
    }
}

/// `address bytes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry<'a> {
    /// Address, not parsed yet.
    pub address: &'a str,
    /// Number of bytes transferred.
    pub bytes: u64,
}

impl<'a> LogEntry<'a> {
    /// Split a traffic log line. Returns `None` for a blank line.
    pub fn parse(line: &'a str) -> Result<Option<Self>, FormatError> {
        let Some([address, bytes]) = fields(line, ["address", "byte count"])? else {
            return Ok(None);
        };
        let bytes = bytes
            .parse()
            .map_err(|_| FormatError::ByteCount(bytes.to_owned()))?;
        Ok(Some(Self { address, bytes }))
    }
}

/// Decode one raw input line, without its line terminator.
pub fn decode(line: &[u8]) -> Result<&str, FormatError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    std::str::from_utf8(line).map_err(|e| FormatError::Encoding {
        valid_up_to: e.valid_up_to(),
    })
}

/// Split `line` into exactly `N` whitespace separated fields.
fn fields<'a, const N: usize>(
    line: &'a str,
    names: [&'static str; N],
) -> Result<Option<[&'a str; N]>, FormatError> {
    let mut tokens = line.split_whitespace();
    let mut fields = [""; N];
    for (i, name) in names.into_iter().enumerate() {
        match tokens.next() {
            Some(token) => fields[i] = token,
            None if i == 0 => return Ok(None),
            None => return Err(FormatError::MissingField(name)),
        }
    }
    match tokens.next() {
        Some(extra) => Err(FormatError::TrailingField(extra.to_owned())),
        None => Ok(Some(fields)),
    }
}
