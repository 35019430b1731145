//! GraphQL subgraph client for instrument and venue records.
//!
//! Two subgraphs back the indexer port: one serving the deployed options
//! contracts, one serving the venue registry. Both speak plain GraphQL
//! over HTTP POST. Numeric fields arrive as strings in the subgraph's
//! mantissa/exponent encoding and are decoded into domain values here.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::IndexerConfig;
use crate::domain::{scaled_decimal, Address, Instrument, VenueMetadata};
use crate::error::{Error, Result};
use crate::port::Indexer;

const INSTRUMENTS_QUERY: &str = "{ optionsContracts { \
     address strike underlying collateral oracleAddress optionsExchangeAddress \
     minCollateralizationRatioValue minCollateralizationRatioExp \
     strikePriceValue strikePriceExp oTokenExchangeRateExp expiry \
     totalCollateral totalExercised totalSupply } }";

/// HTTP client for the instrument and venue subgraphs.
pub struct SubgraphIndexer {
    http: HttpClient,
    instruments_url: String,
    venues_url: String,
}

impl SubgraphIndexer {
    #[must_use]
    pub fn from_config(config: &IndexerConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            instruments_url: config.instruments_url.clone(),
            venues_url: config.venues_url.clone(),
        }
    }

    async fn query<T>(&self, url: &str, query: String) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: GraphResponse<T> = response.json().await?;

        if let Some(errors) = envelope.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Indexer(message));
        }

        envelope
            .data
            .ok_or_else(|| Error::Indexer("response carried neither data nor errors".into()))
    }
}

#[async_trait]
impl Indexer for SubgraphIndexer {
    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        info!(url = %self.instruments_url, "Fetching instrument list");

        let data: InstrumentsData = self
            .query(&self.instruments_url, INSTRUMENTS_QUERY.to_string())
            .await?;

        let instruments = data
            .options_contracts
            .into_iter()
            .map(InstrumentRecord::into_domain)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = instruments.len(), "Fetched instruments");
        Ok(instruments)
    }

    async fn venues(&self, instruments: &[Address]) -> Result<Vec<VenueMetadata>> {
        let addresses = instruments
            .iter()
            .map(|a| format!("\"{a}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "{{ exchanges(where: {{ tokenAddress_in: [{addresses}] }}) \
             {{ id tokenAddress tokenName tokenSymbol }} }}"
        );

        info!(url = %self.venues_url, requested = instruments.len(), "Fetching venue batch");

        let data: VenuesData = self.query(&self.venues_url, query).await?;

        debug!(count = data.exchanges.len(), "Fetched venues");
        Ok(data.exchanges.into_iter().map(VenueRecord::into_domain).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct InstrumentsData {
    #[serde(rename = "optionsContracts")]
    options_contracts: Vec<InstrumentRecord>,
}

/// Raw subgraph record for one options contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentRecord {
    address: String,
    strike: String,
    underlying: String,
    collateral: String,
    oracle_address: String,
    options_exchange_address: String,
    min_collateralization_ratio_value: String,
    min_collateralization_ratio_exp: String,
    strike_price_value: String,
    strike_price_exp: String,
    o_token_exchange_rate_exp: String,
    expiry: String,
    total_collateral: String,
    total_exercised: String,
    total_supply: String,
}

impl InstrumentRecord {
    fn into_domain(self) -> Result<Instrument> {
        let ratio_value = parse_int::<i64>("minCollateralizationRatioValue", &self.min_collateralization_ratio_value)?;
        let ratio_exp = parse_int::<i32>("minCollateralizationRatioExp", &self.min_collateralization_ratio_exp)?;
        let price_value = parse_int::<i64>("strikePriceValue", &self.strike_price_value)?;
        let price_exp = parse_int::<i32>("strikePriceExp", &self.strike_price_exp)?;
        let rate_exp = parse_int::<i32>("oTokenExchangeRateExp", &self.o_token_exchange_rate_exp)?;

        Ok(Instrument {
            address: Address::new(self.address),
            strike: Address::new(self.strike),
            underlying: Address::new(self.underlying),
            collateral: Address::new(self.collateral),
            oracle: Address::new(self.oracle_address),
            venue_registry: Address::new(self.options_exchange_address),
            min_collateral_ratio: scaled_decimal(ratio_value, ratio_exp),
            decimals: (-rate_exp).max(0) as u32,
            strike_price: scaled_decimal(price_value, price_exp),
            expiry: parse_int("expiry", &self.expiry)?,
            total_collateral: parse_decimal("totalCollateral", &self.total_collateral)?,
            total_exercised: parse_decimal("totalExercised", &self.total_exercised)?,
            total_supply: parse_decimal("totalSupply", &self.total_supply)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VenuesData {
    exchanges: Vec<VenueRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VenueRecord {
    id: String,
    token_address: String,
    token_name: String,
    token_symbol: String,
}

impl VenueRecord {
    fn into_domain(self) -> VenueMetadata {
        VenueMetadata {
            venue: Address::new(self.id),
            instrument: Address::new(self.token_address),
            name: self.token_name,
            symbol: self.token_symbol,
        }
    }
}

fn parse_int<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Parse(format!("{field}: not an integer: {value}")))
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| Error::Parse(format!("{field}: {e}: {value}")))
}
