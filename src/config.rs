//! Configuration loading from TOML files.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "STRIKEBOOK_CONFIG";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indexer: IndexerConfig,
    pub chain: ChainConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Subgraph endpoints for pre-aggregated instrument and venue data.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Subgraph serving instrument records.
    pub instruments_url: String,
    /// Subgraph serving venue records.
    pub venues_url: String,
    pub timeout_ms: u64,
}

/// Node provider used for live venue/name/symbol fallback queries.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// The venue factory contract queried for instrument venues.
    pub venue_factory: String,
    pub timeout_ms: u64,
}

/// Local preference storage.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the preference file. Defaults to
    /// `<user config dir>/strikebook/preferences.json`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for the CLI: an explicit path must load, an
    /// absent default file falls back to built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = std::env::var(CONFIG_PATH_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("strikebook.toml"));
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        validate_url("indexer.instruments_url", &self.indexer.instruments_url)?;
        validate_url("indexer.venues_url", &self.indexer.venues_url)?;
        validate_url("chain.rpc_url", &self.chain.rpc_url)?;
        validate_address("chain.venue_factory", &self.chain.venue_factory)?;
        Ok(())
    }

    /// Path of the preference file, honoring the configured override.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("strikebook")
                .join("preferences.json")
        })
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_address(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    let hex = value.strip_prefix("0x").unwrap_or("");
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("not a 20-byte hex address: {value}"),
        }
        .into());
    }
    Ok(())
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indexer: IndexerConfig::default(),
            chain: ChainConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            instruments_url: "https://api.thegraph.com/subgraphs/name/opynfinance/opyn".into(),
            venues_url: "https://api.thegraph.com/subgraphs/name/graphprotocol/uniswap".into(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://cloudflare-eth.com".into(),
            // Uniswap V1 factory
            venue_factory: "0xc0a47dfe034b400b47bdad5fecda2621de6c4d95".into(),
            timeout_ms: 30_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
