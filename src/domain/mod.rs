//! Provider-agnostic domain model for the option catalog.

mod address;
mod asset;
mod catalog;
mod instrument;
mod venue;

pub use address::{Address, ZERO_ADDRESS};
pub use asset::{find_asset, Asset, CDAI, CURVE_FI, CUSDC, DAI, ETH, KNOWN_ASSETS, USDC, WETH, YDAI};
pub use catalog::{classify, Catalog, Listing, OptionKind, PricedListing};
pub use instrument::{scaled_decimal, Instrument};
pub use venue::VenueMetadata;
