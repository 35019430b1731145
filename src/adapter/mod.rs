//! Implementations of ports (hexagonal adapters).

mod chain;
mod indexer;
mod store;

pub use chain::RpcChainProvider;
pub use indexer::SubgraphIndexer;
pub use store::FilePreferenceStore;
