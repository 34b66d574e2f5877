//! Read-only chain access: addresses, ABI plumbing, the JSON-RPC connection
//! and typed contract readers.

pub mod abi;
pub mod contracts;
pub mod provider;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte account or contract address, stored lowercase with `0x` prefix.
///
/// Lowercasing happens at parse time; indexer IDs and price-API keys are
/// lowercase, so a single canonical form avoids case mismatches in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and canonicalize an address string
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix("0x").ok_or_else(|| missing_prefix(s))?;
        if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidAddress(s.to_string()));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// The zero address
    pub fn zero() -> Self {
        Self(format!("0x{}", "0".repeat(40)))
    }

    /// Whether this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }

    /// The canonical lowercase string, `0x` prefixed
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 40 hex characters without the `0x` prefix
    pub fn hex_body(&self) -> &str {
        &self.0[2..]
    }
}

fn missing_prefix(s: &str) -> Error {
    Error::InvalidAddress(format!("{} (missing 0x prefix)", s))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}
