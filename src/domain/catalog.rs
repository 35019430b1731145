//! Enriched listings and their classification into the dashboard catalog.

use serde::Serialize;
use tracing::warn;

use super::address::Address;
use super::asset::{Asset, ETH, USDC};
use super::instrument::Instrument;

/// An instrument enriched with resolved venue metadata and asset objects.
///
/// Every field is fully populated: instruments that cannot be enriched are
/// dropped before a `Listing` is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub instrument: Instrument,
    pub venue: Address,
    pub name: String,
    pub symbol: String,
    pub collateral: Asset,
    pub underlying: Asset,
    pub strike: Asset,
}

/// Put or call on ETH with a dollar-denominated strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Put,
    Call,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Put => write!(f, "put"),
            Self::Call => write!(f, "call"),
        }
    }
}

/// A put or call listing with its strike parsed out of the display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub kind: OptionKind,
    pub strike_price_usd: u32,
}

/// The assembled catalog: three disjoint sets in indexer order.
#[derive(Debug, Default, Serialize)]
pub struct Catalog {
    pub insurances: Vec<Listing>,
    pub puts: Vec<PricedListing>,
    pub calls: Vec<PricedListing>,
}

impl Catalog {
    /// Total number of listings across all three sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insurances.len() + self.puts.len() + self.calls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition enriched listings into insurances, puts, and calls.
///
/// A listing is a put when both collateral and strike are USDC and the
/// underlying is ETH; a call when both collateral and strike are ETH and
/// the underlying is USDC. Everything else is insurance. Listings with an
/// empty display name never classify.
#[must_use]
pub fn classify(listings: Vec<Listing>) -> Catalog {
    let mut catalog = Catalog::default();

    for listing in listings {
        if listing.name.is_empty() {
            continue;
        }

        if listing.collateral == USDC && listing.strike == USDC && listing.underlying == ETH {
            let strike_price_usd = dollar_strike(&listing.name);
            catalog.puts.push(PricedListing {
                listing,
                kind: OptionKind::Put,
                strike_price_usd,
            });
        } else if listing.collateral == ETH && listing.strike == ETH && listing.underlying == USDC
        {
            let strike_price_usd = dollar_strike(&listing.name);
            catalog.calls.push(PricedListing {
                listing,
                kind: OptionKind::Call,
                strike_price_usd,
            });
        } else {
            catalog.insurances.push(listing);
        }
    }

    catalog
}

/// Parse the `$`-prefixed strike token out of a display name such as
/// `"ETH $150 Put"`. Names without a parseable token yield zero.
fn dollar_strike(name: &str) -> u32 {
    let parsed = name
        .split_once('$')
        .map(|(_, rest)| rest.chars().take_while(char::is_ascii_digit).collect::<String>())
        .filter(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok());

    match parsed {
        Some(strike) => strike,
        None => {
            warn!(name, "display name has no parseable $ strike token");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::CDAI;
    use crate::domain::instrument::scaled_decimal;
    use rust_decimal::Decimal;

    fn make_instrument(collateral: &Asset, strike: &Asset, underlying: &Asset) -> Instrument {
        Instrument {
            address: Address::new("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            strike: strike.addr(),
            underlying: underlying.addr(),
            collateral: collateral.addr(),
            oracle: Address::new("0x7054e08461e3eCb7718B63540adDB3c3A1746415"),
            venue_registry: Address::new("0x5778f2824a114F6246AE8464F0B9132892637A2A"),
            min_collateral_ratio: scaled_decimal(16, -1),
            decimals: 7,
            strike_price: scaled_decimal(150, 0),
            expiry: 1_610_000_000,
            total_collateral: Decimal::ZERO,
            total_exercised: Decimal::ZERO,
            total_supply: Decimal::ZERO,
        }
    }

    fn make_listing(
        collateral: &Asset,
        strike: &Asset,
        underlying: &Asset,
        name: &str,
    ) -> Listing {
        Listing {
            instrument: make_instrument(collateral, strike, underlying),
            venue: Address::new("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            name: name.into(),
            symbol: "oTKN".into(),
            collateral: *collateral,
            underlying: *underlying,
            strike: *strike,
        }
    }

    #[test]
    fn test_usdc_collateral_eth_underlying_is_put() {
        let catalog = classify(vec![make_listing(&USDC, &USDC, &ETH, "ETH $150 Put")]);
        assert_eq!(catalog.puts.len(), 1);
        assert!(catalog.calls.is_empty());
        assert!(catalog.insurances.is_empty());
        assert_eq!(catalog.puts[0].kind, OptionKind::Put);
        assert_eq!(catalog.puts[0].strike_price_usd, 150);
    }

    #[test]
    fn test_eth_collateral_usdc_underlying_is_call() {
        let catalog = classify(vec![make_listing(&ETH, &ETH, &USDC, "ETH $300 Call")]);
        assert_eq!(catalog.calls.len(), 1);
        assert_eq!(catalog.calls[0].strike_price_usd, 300);
    }

    #[test]
    fn test_everything_else_is_insurance() {
        let catalog = classify(vec![make_listing(&USDC, &USDC, &CDAI, "Opyn cDai Insurance")]);
        assert_eq!(catalog.insurances.len(), 1);
        assert!(catalog.puts.is_empty());
        assert!(catalog.calls.is_empty());
    }

    #[test]
    fn test_empty_name_never_classifies() {
        let catalog = classify(vec![make_listing(&USDC, &USDC, &ETH, "")]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_strike_token_defaults_to_zero() {
        let catalog = classify(vec![make_listing(&USDC, &USDC, &ETH, "ETH Put")]);
        assert_eq!(catalog.puts[0].strike_price_usd, 0);
    }

    #[test]
    fn test_strike_token_stops_at_non_digit() {
        let catalog = classify(vec![make_listing(&USDC, &USDC, &ETH, "ETH $150.50 Put")]);
        assert_eq!(catalog.puts[0].strike_price_usd, 150);
    }
}
