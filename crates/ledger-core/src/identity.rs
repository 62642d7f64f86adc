// ledger-core/src/identity.rs

use crate::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identifier used by the vault, the reward ledger and the pool
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Create address from bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministic address with every byte set to `byte`, handy for fixtures
    pub fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> LedgerResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)
            .map_err(|e| LedgerError::InvalidAddress(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(LedgerError::InvalidAddress("Invalid address length".into()));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn zero() -> Self {
        Self([0u8; 20])
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_hex()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Authenticated identity of whoever submitted an operation.
///
/// The host environment is responsible for authenticating callers; the
/// ledger only compares the carried address against the accounts it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller(Address);

impl Caller {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Address {
        self.0
    }

    /// Whether this caller acts as `address`
    pub fn is(&self, address: &Address) -> bool {
        &self.0 == address
    }
}

impl From<Address> for Caller {
    fn from(address: Address) -> Self {
        Self(address)
    }
}
