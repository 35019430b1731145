//! Resolved trading-venue metadata.

use serde::{Deserialize, Serialize};

use super::address::Address;

/// Venue metadata for one instrument, whatever the source (indexer batch,
/// local cache, or live chain lookup).
///
/// Serializable because freshly resolved entries round-trip through the
/// preference store as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueMetadata {
    /// The venue (pool) contract address.
    pub venue: Address,
    /// The instrument the venue trades.
    pub instrument: Address,
    /// Display name of the instrument token.
    pub name: String,
    /// Ticker symbol of the instrument token.
    pub symbol: String,
}
