//! Ethereum address newtype with normalized comparison semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The "no venue" sentinel returned by the venue factory for tokens
/// without a deployed trading venue.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// An Ethereum address - newtype for type safety.
///
/// The inner String is private and stored lowercase so that equality and
/// hashing are checksum-insensitive. All construction goes through the
/// defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new `Address` from a string, normalizing to lowercase.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into().to_lowercase())
    }

    /// The zero address, used as the "no venue" sentinel.
    #[must_use]
    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.into())
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the zero-address sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == ZERO_ADDRESS
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_to_lowercase() {
        let mixed = Address::new("0xA0b86991C6218b36c1d19D4a2e9Eb0cE3606eB48");
        let lower = Address::new("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert_eq!(mixed, lower);
        assert_eq!(mixed.as_str(), "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Address::zero().is_zero());
        assert!(!Address::new("0xddac4aed7c8f73032b388efe2c778fc194bc81ed").is_zero());
    }
}
