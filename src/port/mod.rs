//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the integration points with external services: the
//! indexing service, the chain node provider, and the local preference
//! store. Adapters implement them; the catalog loader is generic over
//! them, which is also what makes it testable without a network.

use async_trait::async_trait;

use crate::domain::{Address, Instrument, VenueMetadata};
use crate::error::Result;

/// Pre-aggregated on-chain data, served without direct chain queries.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Fetch the full instrument list.
    async fn list_instruments(&self) -> Result<Vec<Instrument>>;

    /// Batch venue lookup for a set of instrument addresses.
    ///
    /// Instruments without an indexed venue may be omitted from the
    /// result; callers fall back to other sources for those.
    async fn venues(&self, instruments: &[Address]) -> Result<Vec<VenueMetadata>>;
}

/// Point-in-time on-chain queries against a node provider.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Look up the trading-venue address for an instrument.
    ///
    /// Returns the zero address when no venue has been deployed.
    async fn venue_address(&self, instrument: &Address) -> Result<Address>;

    /// The token's on-chain display name.
    async fn token_name(&self, token: &Address) -> Result<String>;

    /// The token's on-chain ticker symbol.
    async fn token_symbol(&self, token: &Address) -> Result<String>;
}

/// Opaque key-value string storage for user-local preferences.
pub trait PreferenceStore: Send + Sync {
    /// Read the raw serialized value under `key`, or `default` if absent.
    fn get(&self, key: &str, default: &str) -> String;

    /// Write the raw serialized value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
