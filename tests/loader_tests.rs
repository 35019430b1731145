//! Catalog loader behavior against mock collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use strikebook::app::{CatalogLoader, BLACKLIST, VENUE_CACHE_KEY};
use strikebook::domain::{
    scaled_decimal, Address, Asset, Instrument, VenueMetadata, CDAI, ETH, USDC,
};
use strikebook::error::{Error, Result};
use strikebook::port::{ChainProvider, Indexer, PreferenceStore};

const PUT_ADDR: &str = "0xaa00000000000000000000000000000000000001";
const CALL_ADDR: &str = "0xaa00000000000000000000000000000000000002";
const INSURANCE_ADDR: &str = "0xaa00000000000000000000000000000000000003";
const FRESH_ADDR: &str = "0xaa00000000000000000000000000000000000004";
const LEGACY_ADDR: &str = "0xddac4aed7c8f73032b388efe2c778fc194bc81ed";
const VENUE_ADDR: &str = "0xbb00000000000000000000000000000000000001";

fn instrument_raw(addr: &str, collateral: &str, strike: &str, underlying: &str) -> Instrument {
    Instrument {
        address: Address::new(addr),
        strike: Address::new(strike),
        underlying: Address::new(underlying),
        collateral: Address::new(collateral),
        oracle: Address::new("0x7054e08461e3ecb7718b63540addb3c3a1746415"),
        venue_registry: Address::new("0x5778f2824a114f6246ae8464f0b9132892637a2a"),
        min_collateral_ratio: scaled_decimal(16, -1),
        decimals: 7,
        strike_price: scaled_decimal(150, 0),
        expiry: 1_700_000_000,
        total_collateral: Decimal::ZERO,
        total_exercised: Decimal::ZERO,
        total_supply: Decimal::ZERO,
    }
}

fn instrument(addr: &str, collateral: &Asset, strike: &Asset, underlying: &Asset) -> Instrument {
    instrument_raw(addr, collateral.address, strike.address, underlying.address)
}

fn venue_meta(instrument: &str, name: &str, symbol: &str) -> VenueMetadata {
    VenueMetadata {
        venue: Address::new(VENUE_ADDR),
        instrument: Address::new(instrument),
        name: name.into(),
        symbol: symbol.into(),
    }
}

struct MockIndexer {
    instruments: Vec<Instrument>,
    venues: Vec<VenueMetadata>,
    fail: bool,
}

impl MockIndexer {
    fn new(instruments: Vec<Instrument>, venues: Vec<VenueMetadata>) -> Self {
        Self {
            instruments,
            venues,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            instruments: Vec::new(),
            venues: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        if self.fail {
            return Err(Error::Indexer("indexer offline".into()));
        }
        Ok(self.instruments.clone())
    }

    async fn venues(&self, _instruments: &[Address]) -> Result<Vec<VenueMetadata>> {
        if self.fail {
            return Err(Error::Indexer("indexer offline".into()));
        }
        Ok(self.venues.clone())
    }
}

#[derive(Default)]
struct MockChain {
    venue_addresses: HashMap<Address, Address>,
    names: HashMap<Address, String>,
    symbols: HashMap<Address, String>,
    calls: Arc<AtomicU32>,
}

impl MockChain {
    fn with_venue(mut self, instrument: &str, venue: &str, name: &str, symbol: &str) -> Self {
        let addr = Address::new(instrument);
        self.venue_addresses.insert(addr.clone(), Address::new(venue));
        self.names.insert(addr.clone(), name.into());
        self.symbols.insert(addr, symbol.into());
        self
    }

    fn call_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn venue_address(&self, instrument: &Address) -> Result<Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .venue_addresses
            .get(instrument)
            .cloned()
            .unwrap_or_else(Address::zero))
    }

    async fn token_name(&self, token: &Address) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.names.get(token).cloned().unwrap_or_default())
    }

    async fn token_symbol(&self, token: &Address) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.symbols.get(token).cloned().unwrap_or_default())
    }
}

#[derive(Clone, Default)]
struct MockStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicU32>,
}

impl MockStore {
    fn seeded(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.into(), value.into());
        store
    }

    fn stored_venues(&self) -> Vec<VenueMetadata> {
        let raw = self
            .entries
            .lock()
            .unwrap()
            .get(VENUE_CACHE_KEY)
            .cloned()
            .unwrap_or_else(|| "[]".into());
        serde_json::from_str(&raw).unwrap()
    }
}

impl PreferenceStore for MockStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn classifies_puts_calls_and_insurances_disjointly() {
    let indexer = MockIndexer::new(
        vec![
            instrument(PUT_ADDR, &USDC, &USDC, &ETH),
            instrument(CALL_ADDR, &ETH, &ETH, &USDC),
            instrument(INSURANCE_ADDR, &USDC, &USDC, &CDAI),
        ],
        vec![
            venue_meta(PUT_ADDR, "ETH $150 Put", "oETH-150P"),
            venue_meta(CALL_ADDR, "ETH $300 Call", "oETH-300C"),
            venue_meta(INSURANCE_ADDR, "Opyn cDai Insurance", "ocDai"),
        ],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.puts.len(), 1);
    assert_eq!(catalog.calls.len(), 1);
    assert_eq!(catalog.insurances.len(), 1);
    assert_eq!(catalog.len(), 3);

    assert_eq!(catalog.puts[0].listing.instrument.address.as_str(), PUT_ADDR);
    assert_eq!(catalog.calls[0].listing.instrument.address.as_str(), CALL_ADDR);
    assert_eq!(catalog.insurances[0].instrument.address.as_str(), INSURANCE_ADDR);
}

#[tokio::test]
async fn put_scenario_parses_dollar_strike() {
    let indexer = MockIndexer::new(
        vec![instrument(PUT_ADDR, &USDC, &USDC, &ETH)],
        vec![venue_meta(PUT_ADDR, "ETH $150 Put", "oETH-150P")],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.puts.len(), 1);
    assert_eq!(catalog.puts[0].strike_price_usd, 150);
    assert_eq!(catalog.puts[0].listing.name, "ETH $150 Put");
}

#[tokio::test]
async fn unknown_asset_drops_instrument_before_venue_resolution() {
    let unknown = "0x1111111111111111111111111111111111111111";
    let indexer = MockIndexer::new(
        vec![instrument_raw(PUT_ADDR, unknown, USDC.address, ETH.address)],
        vec![venue_meta(PUT_ADDR, "ETH $150 Put", "oETH-150P")],
    );
    let chain = MockChain::default();
    let calls = chain.call_counter();
    let loader = CatalogLoader::new(indexer, chain, MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert!(catalog.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blacklisted_instrument_is_dropped() {
    let indexer = MockIndexer::new(
        vec![instrument(BLACKLIST[0], &USDC, &USDC, &CDAI)],
        vec![venue_meta(BLACKLIST[0], "Broken Insurance", "oBRK")],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert!(catalog.is_empty());
}

#[tokio::test]
async fn cached_venue_is_used_without_chain_calls() {
    let cached = serde_json::to_string(&vec![venue_meta(
        INSURANCE_ADDR,
        "Opyn cDai Insurance",
        "ocDai",
    )])
    .unwrap();
    let store = MockStore::seeded(VENUE_CACHE_KEY, &cached);
    let indexer = MockIndexer::new(
        vec![instrument(INSURANCE_ADDR, &USDC, &USDC, &CDAI)],
        Vec::new(),
    );
    let chain = MockChain::default();
    let calls = chain.call_counter();
    let loader = CatalogLoader::new(indexer, chain, store);

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.insurances.len(), 1);
    assert_eq!(catalog.insurances[0].name, "Opyn cDai Insurance");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn live_fallback_resolves_and_caches_new_venue() {
    let store = MockStore::default();
    let indexer = MockIndexer::new(
        vec![instrument(FRESH_ADDR, &USDC, &USDC, &CDAI)],
        Vec::new(),
    );
    let chain =
        MockChain::default().with_venue(FRESH_ADDR, VENUE_ADDR, "Opyn cUSDC Insurance", "ocUSDC");
    let loader = CatalogLoader::new(indexer, chain, store.clone());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.insurances.len(), 1);
    assert_eq!(catalog.insurances[0].venue.as_str(), VENUE_ADDR);

    let stored = store.stored_venues();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].instrument.as_str(), FRESH_ADDR);
    assert_eq!(stored[0].name, "Opyn cUSDC Insurance");
}

#[tokio::test]
async fn no_venue_sentinel_drops_instrument_without_caching() {
    let store = MockStore::default();
    let indexer = MockIndexer::new(
        vec![instrument(FRESH_ADDR, &USDC, &USDC, &CDAI)],
        Vec::new(),
    );
    // Default mock chain answers the zero address for every venue lookup.
    let loader = CatalogLoader::new(indexer, MockChain::default(), store.clone());

    let catalog = loader.load().await.unwrap();

    assert!(catalog.is_empty());
    assert!(store.stored_venues().is_empty());
}

#[tokio::test]
async fn cache_write_back_is_append_only_and_single() {
    let existing = venue_meta(PUT_ADDR, "ETH $150 Put", "oETH-150P");
    let store = MockStore::seeded(
        VENUE_CACHE_KEY,
        &serde_json::to_string(&vec![existing.clone()]).unwrap(),
    );
    let indexer = MockIndexer::new(
        vec![
            instrument(PUT_ADDR, &USDC, &USDC, &ETH),
            instrument(FRESH_ADDR, &USDC, &USDC, &CDAI),
        ],
        Vec::new(),
    );
    let chain =
        MockChain::default().with_venue(FRESH_ADDR, VENUE_ADDR, "Opyn cUSDC Insurance", "ocUSDC");
    let loader = CatalogLoader::new(indexer, chain, store.clone());

    loader.load().await.unwrap();

    let stored = store.stored_venues();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0], existing);
    assert_eq!(stored[1].instrument.as_str(), FRESH_ADDR);
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn legacy_instrument_name_is_overridden_whatever_the_source() {
    let indexer = MockIndexer::new(
        vec![instrument(LEGACY_ADDR, &USDC, &USDC, &CDAI)],
        vec![venue_meta(LEGACY_ADDR, "Opyn cDai Insurance", "ocDai")],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.insurances.len(), 1);
    assert_eq!(catalog.insurances[0].name, "Opyn cDai Insurance (Old)");
}

#[tokio::test]
async fn legacy_override_applies_on_live_fallback_too() {
    let indexer = MockIndexer::new(
        vec![instrument(LEGACY_ADDR, &USDC, &USDC, &CDAI)],
        Vec::new(),
    );
    let chain = MockChain::default().with_venue(LEGACY_ADDR, VENUE_ADDR, "ocDai v0", "ocDai");
    let loader = CatalogLoader::new(indexer, chain, MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.insurances[0].name, "Opyn cDai Insurance (Old)");
}

#[tokio::test]
async fn empty_display_name_drops_listing() {
    let indexer = MockIndexer::new(
        vec![instrument(INSURANCE_ADDR, &USDC, &USDC, &CDAI)],
        vec![venue_meta(INSURANCE_ADDR, "", "ocDai")],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), MockStore::default());

    let catalog = loader.load().await.unwrap();

    assert!(catalog.is_empty());
}

#[tokio::test]
async fn malformed_cache_degrades_to_empty() {
    let store = MockStore::seeded(VENUE_CACHE_KEY, "not json");
    let indexer = MockIndexer::new(
        vec![instrument(PUT_ADDR, &USDC, &USDC, &ETH)],
        vec![venue_meta(PUT_ADDR, "ETH $150 Put", "oETH-150P")],
    );
    let loader = CatalogLoader::new(indexer, MockChain::default(), store.clone());

    let catalog = loader.load().await.unwrap();

    assert_eq!(catalog.puts.len(), 1);
    assert!(store.stored_venues().is_empty());
}

#[tokio::test]
async fn indexer_failure_aborts_the_load() {
    let loader = CatalogLoader::new(
        MockIndexer::failing(),
        MockChain::default(),
        MockStore::default(),
    );

    let result = loader.load().await;

    assert!(matches!(result, Err(Error::Indexer(_))));
}
