//! Known asset tokens and the registry used to resolve instrument legs.

use serde::Serialize;

use super::address::Address;

/// A recognized asset token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub symbol: &'static str,
    pub address: &'static str,
    pub decimals: u32,
}

impl Asset {
    /// The asset's address as a normalized [`Address`].
    #[must_use]
    pub fn addr(&self) -> Address {
        Address::new(self.address)
    }
}

/// ETH as the protocol represents it: the zero address stands in for the
/// native asset in instrument collateral/strike/underlying slots.
pub const ETH: Asset = Asset {
    symbol: "ETH",
    address: "0x0000000000000000000000000000000000000000",
    decimals: 18,
};

pub const USDC: Asset = Asset {
    symbol: "USDC",
    address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
    decimals: 6,
};

pub const CDAI: Asset = Asset {
    symbol: "cDAI",
    address: "0x5d3a536e4d6dbd6114cc1ead35777bab948e3643",
    decimals: 8,
};

pub const CUSDC: Asset = Asset {
    symbol: "cUSDC",
    address: "0x39aa39c021dfbae8fac545936693ac917d5e7563",
    decimals: 8,
};

pub const CURVE_FI: Asset = Asset {
    symbol: "crvC",
    address: "0x845838df265dcd2c412a1dc9e959c7d08537f8a2",
    decimals: 18,
};

pub const WETH: Asset = Asset {
    symbol: "WETH",
    address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
    decimals: 18,
};

pub const DAI: Asset = Asset {
    symbol: "DAI",
    address: "0x6b175474e89094c44da98b954eedeac495271d0f",
    decimals: 18,
};

pub const YDAI: Asset = Asset {
    symbol: "yDAI",
    address: "0x16de59092dae5ccf4a1e6439d611fd0653f0bd01",
    decimals: 18,
};

/// Every asset an instrument leg may legally reference. Instruments whose
/// collateral, strike, or underlying falls outside this set are not listed.
pub const KNOWN_ASSETS: &[Asset] = &[ETH, USDC, CDAI, CUSDC, CURVE_FI, WETH, DAI, YDAI];

/// Resolve an address against the known-asset registry.
#[must_use]
pub fn find_asset(address: &Address) -> Option<&'static Asset> {
    KNOWN_ASSETS.iter().find(|asset| &asset.addr() == address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_asset_is_case_insensitive() {
        let addr = Address::new("0xA0b86991C6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(find_asset(&addr), Some(&USDC));
    }

    #[test]
    fn test_unknown_address_is_unresolved() {
        let addr = Address::new("0x1111111111111111111111111111111111111111");
        assert_eq!(find_asset(&addr), None);
    }

    #[test]
    fn test_eth_uses_zero_address() {
        assert!(ETH.addr().is_zero());
    }
}
