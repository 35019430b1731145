//! Strikebook - option catalog assembly for a decentralized options
//! dashboard.
//!
//! The crate builds the tradable option catalog once per session: raw
//! instrument records come from a GraphQL indexer, each instrument's
//! trading-venue metadata resolves through a three-tier fallback (indexer
//! batch, local preference cache, live chain query), and the surviving
//! records classify into insurances, puts, and calls.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Provider-agnostic types: addresses, assets, instruments,
//!   listings, the catalog itself
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions for the indexer, chain provider, and
//!   preference store
//! - [`adapter`] - Production implementations of the ports
//! - [`app`] - The catalog loader and the composition root
//! - [`cli`] - Command definitions and output rendering
//!
//! # Example
//!
//! ```no_run
//! use strikebook::app::App;
//! use strikebook::config::Config;
//!
//! # async fn run() -> strikebook::error::Result<()> {
//! let app = App::new(Config::default());
//! let catalog = app.load_catalog().await?;
//! println!("{} listings", catalog.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
