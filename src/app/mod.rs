//! Application layer - wires adapters to the catalog loader.

mod loader;

pub use loader::{CatalogLoader, BLACKLIST, VENUE_CACHE_KEY};

use crate::adapter::{FilePreferenceStore, RpcChainProvider, SubgraphIndexer};
use crate::config::Config;
use crate::domain::{Catalog, USDC};
use crate::error::Result;
use crate::port::{ChainProvider, Indexer};

/// Composition root: builds the production adapters from configuration.
pub struct App {
    config: Config,
}

/// Outcome of the connectivity probe, one result per collaborator.
pub struct CheckReport {
    /// Instrument count reported by the indexer.
    pub indexer: Result<usize>,
    /// USDC symbol as read from the chain provider.
    pub chain: Result<String>,
}

impl CheckReport {
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.indexer.is_ok() && self.chain.is_ok()
    }
}

impl App {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the catalog loader once against the configured services.
    pub async fn load_catalog(&self) -> Result<Catalog> {
        let indexer = SubgraphIndexer::from_config(&self.config.indexer);
        let chain = RpcChainProvider::from_config(&self.config.chain);
        let store = FilePreferenceStore::open(self.config.store_path())?;

        CatalogLoader::new(indexer, chain, store).load().await
    }

    /// Probe each remote collaborator with one cheap call.
    pub async fn check(&self) -> CheckReport {
        let indexer = SubgraphIndexer::from_config(&self.config.indexer);
        let chain = RpcChainProvider::from_config(&self.config.chain);

        CheckReport {
            indexer: indexer.list_instruments().await.map(|list| list.len()),
            chain: chain.token_symbol(&USDC.addr()).await,
        }
    }
}
