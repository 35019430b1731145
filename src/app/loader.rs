//! Catalog assembly: the once-per-session routine that builds the
//! tradable option catalog.
//!
//! Instrument records come from the indexer. Venue metadata resolves
//! through a three-tier fallback: the indexer's batch result, then the
//! local preference cache, then a live chain query whose result is written
//! back to the cache once the whole batch has resolved.

use std::collections::HashMap;

use futures_util::future;
use tracing::{debug, info, warn};

use crate::domain::{classify, find_asset, Address, Catalog, Instrument, Listing, VenueMetadata};
use crate::error::Result;
use crate::port::{ChainProvider, Indexer, PreferenceStore};

/// Preference key holding venue metadata resolved by earlier loads.
pub const VENUE_CACHE_KEY: &str = "venue-metadata";

/// Instruments excluded from the catalog outright.
pub const BLACKLIST: &[&str] = &[
    // early deployment with a broken oracle feed
    "0x9d1555d8cb3c846bb4f7d5b1b1080872c3166676",
];

/// Legacy record that predates the instrument rename; its display name is
/// patched whatever source resolved it.
const LEGACY_CDAI_INSURANCE: &str = "0xddac4aed7c8f73032b388efe2c778fc194bc81ed";
const LEGACY_CDAI_INSURANCE_NAME: &str = "Opyn cDai Insurance (Old)";

/// Assembles the catalog from the indexer, the chain provider, and the
/// local preference cache.
pub struct CatalogLoader<I, C, S> {
    indexer: I,
    chain: C,
    store: S,
}

/// Outcome of resolving a single instrument: the enriched listing, plus
/// the venue metadata to cache when the live tier produced it.
struct Resolution {
    listing: Listing,
    freshly_resolved: Option<VenueMetadata>,
}

impl<I, C, S> CatalogLoader<I, C, S>
where
    I: Indexer,
    C: ChainProvider,
    S: PreferenceStore,
{
    pub fn new(indexer: I, chain: C, store: S) -> Self {
        Self {
            indexer,
            chain,
            store,
        }
    }

    /// Build the catalog.
    ///
    /// Any indexer or chain transport failure aborts the whole load; the
    /// caller retries by reloading. Instruments that cannot be resolved
    /// are dropped silently.
    pub async fn load(&self) -> Result<Catalog> {
        let cached = self.cached_venues();
        let cached_by_instrument: HashMap<&Address, &VenueMetadata> =
            cached.iter().map(|v| (&v.instrument, v)).collect();

        let instruments = self.indexer.list_instruments().await?;

        let addresses: Vec<Address> = instruments.iter().map(|i| i.address.clone()).collect();
        let indexed: HashMap<Address, VenueMetadata> = self
            .indexer
            .venues(&addresses)
            .await?
            .into_iter()
            .map(|v| (v.instrument.clone(), v))
            .collect();

        let resolutions = future::try_join_all(
            instruments
                .iter()
                .map(|instrument| self.resolve(instrument, &indexed, &cached_by_instrument)),
        )
        .await?;

        let mut listings = Vec::with_capacity(instruments.len());
        let mut freshly_resolved = Vec::new();
        for resolution in resolutions.into_iter().flatten() {
            listings.push(resolution.listing);
            if let Some(metadata) = resolution.freshly_resolved {
                freshly_resolved.push(metadata);
            }
        }

        self.persist_venues(cached, freshly_resolved)?;

        let catalog = classify(listings);
        info!(
            instruments = instruments.len(),
            insurances = catalog.insurances.len(),
            puts = catalog.puts.len(),
            calls = catalog.calls.len(),
            "Catalog assembled"
        );
        Ok(catalog)
    }

    async fn resolve(
        &self,
        instrument: &Instrument,
        indexed: &HashMap<Address, VenueMetadata>,
        cached: &HashMap<&Address, &VenueMetadata>,
    ) -> Result<Option<Resolution>> {
        let address = &instrument.address;

        if BLACKLIST.contains(&address.as_str()) {
            debug!(%address, "Dropping blacklisted instrument");
            return Ok(None);
        }

        let (Some(collateral), Some(strike), Some(underlying)) = (
            find_asset(&instrument.collateral),
            find_asset(&instrument.strike),
            find_asset(&instrument.underlying),
        ) else {
            debug!(%address, "Dropping instrument with unrecognized asset");
            return Ok(None);
        };

        let (metadata, freshly_resolved) = if let Some(metadata) = indexed.get(address) {
            (metadata.clone(), None)
        } else if let Some(metadata) = cached.get(address) {
            ((*metadata).clone(), None)
        } else {
            // Not yet indexed (typically a freshly created venue): ask the
            // chain directly and remember the answer.
            let venue = self.chain.venue_address(address).await?;
            if venue.is_zero() {
                debug!(%address, "Dropping instrument with no venue");
                return Ok(None);
            }
            let name = self.chain.token_name(address).await?;
            let symbol = self.chain.token_symbol(address).await?;
            let metadata = VenueMetadata {
                venue,
                instrument: address.clone(),
                name,
                symbol,
            };
            (metadata.clone(), Some(metadata))
        };

        let name = if address.as_str() == LEGACY_CDAI_INSURANCE {
            LEGACY_CDAI_INSURANCE_NAME.to_string()
        } else {
            metadata.name.clone()
        };

        if name.is_empty() {
            debug!(%address, "Dropping instrument with empty display name");
            return Ok(None);
        }

        Ok(Some(Resolution {
            listing: Listing {
                instrument: instrument.clone(),
                venue: metadata.venue,
                name,
                symbol: metadata.symbol,
                collateral: *collateral,
                underlying: *underlying,
                strike: *strike,
            },
            freshly_resolved,
        }))
    }

    fn cached_venues(&self) -> Vec<VenueMetadata> {
        let raw = self.store.get(VENUE_CACHE_KEY, "[]");
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "Malformed venue cache, starting empty");
                Vec::new()
            }
        }
    }

    /// One write per load: the pre-existing entries followed by anything
    /// the live tier resolved this time.
    fn persist_venues(
        &self,
        mut entries: Vec<VenueMetadata>,
        freshly_resolved: Vec<VenueMetadata>,
    ) -> Result<()> {
        let added = freshly_resolved.len();
        entries.extend(freshly_resolved);
        let raw = serde_json::to_string(&entries)?;
        self.store.set(VENUE_CACHE_KEY, &raw)?;
        debug!(total = entries.len(), added, "Persisted venue cache");
        Ok(())
    }
}
