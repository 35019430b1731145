//! Raw instrument records as reported by the indexer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::Address;

/// A raw options instrument, one record per deployed contract.
///
/// Ratio and strike price have already been reconstructed from the
/// indexer's mantissa/exponent encoding; aggregate amounts are kept in the
/// token's base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub address: Address,
    pub strike: Address,
    pub underlying: Address,
    pub collateral: Address,
    pub oracle: Address,
    pub venue_registry: Address,
    /// Minimum collateralization ratio, e.g. `1.6`.
    pub min_collateral_ratio: Decimal,
    /// Display precision of the instrument token.
    pub decimals: u32,
    pub strike_price: Decimal,
    /// Expiry as unix seconds.
    pub expiry: u64,
    pub total_collateral: Decimal,
    pub total_exercised: Decimal,
    pub total_supply: Decimal,
}

/// Decode the indexer's fixed-point encoding `value × 10^exponent`.
///
/// Negative exponents map directly onto a decimal scale; positive ones
/// multiply out. Exponents beyond decimal range are clamped to the
/// representable scale.
#[must_use]
pub fn scaled_decimal(value: i64, exponent: i32) -> Decimal {
    if exponent >= 0 {
        let factor = 10i64.checked_pow(exponent as u32).unwrap_or(i64::MAX);
        Decimal::from(value) * Decimal::from(factor)
    } else {
        let scale = (-exponent).min(28) as u32;
        Decimal::new(value, scale)
    }
}
