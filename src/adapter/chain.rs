//! JSON-RPC chain provider for live venue and token metadata lookups.
//!
//! Only three read-only calls are ever issued: the venue factory's
//! `getExchange(address)` and the ERC-20 `name()` / `symbol()` getters, so
//! the adapter carries its own four-byte selectors and a minimal ABI
//! decoder instead of a full contract stack.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ChainConfig;
use crate::domain::Address;
use crate::error::{Error, Result};
use crate::port::ChainProvider;

/// keccak("getExchange(address)")[..4]
const SELECTOR_GET_EXCHANGE: &str = "06f2bf62";
/// keccak("name()")[..4]
const SELECTOR_NAME: &str = "06fdde03";
/// keccak("symbol()")[..4]
const SELECTOR_SYMBOL: &str = "95d89b41";

/// `eth_call` client against a node provider.
pub struct RpcChainProvider {
    http: HttpClient,
    rpc_url: String,
    venue_factory: Address,
}

impl RpcChainProvider {
    #[must_use]
    pub fn from_config(config: &ChainConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            rpc_url: config.rpc_url.clone(),
            venue_factory: Address::new(config.venue_factory.clone()),
        }
    }

    async fn eth_call(&self, to: &Address, data: String) -> Result<String> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": to.as_str(), "data": data }, "latest"],
        });

        debug!(to = %to, "eth_call");

        let response: RpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        response
            .result
            .ok_or_else(|| Error::Rpc {
                code: 0,
                message: "response carried neither result nor error".into(),
            })
    }
}

#[async_trait]
impl ChainProvider for RpcChainProvider {
    async fn venue_address(&self, instrument: &Address) -> Result<Address> {
        let data = encode_address_call(SELECTOR_GET_EXCHANGE, instrument)?;
        let result = self.eth_call(&self.venue_factory, data).await?;
        decode_address(&result)
    }

    async fn token_name(&self, token: &Address) -> Result<String> {
        let result = self.eth_call(token, format!("0x{SELECTOR_NAME}")).await?;
        decode_string(&result)
    }

    async fn token_symbol(&self, token: &Address) -> Result<String> {
        let result = self.eth_call(token, format!("0x{SELECTOR_SYMBOL}")).await?;
        decode_string(&result)
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Encode `selector(address)` calldata: the selector followed by the
/// address left-padded to a 32-byte word.
fn encode_address_call(selector: &str, address: &Address) -> Result<String> {
    let hex = address
        .as_str()
        .strip_prefix("0x")
        .ok_or_else(|| Error::Abi(format!("address without 0x prefix: {address}")))?;
    Ok(format!("0x{selector}{hex:0>64}"))
}

fn result_words(result: &str) -> Result<&str> {
    let hex = result
        .strip_prefix("0x")
        .ok_or_else(|| Error::Abi(format!("call result without 0x prefix: {result}")))?;
    if hex.len() % 64 != 0 || hex.is_empty() {
        return Err(Error::Abi(format!(
            "call result is not whole 32-byte words: {} hex chars",
            hex.len()
        )));
    }
    Ok(hex)
}

/// Decode a single-word `address` return value.
fn decode_address(result: &str) -> Result<Address> {
    let hex = result_words(result)?;
    Ok(Address::new(format!("0x{}", &hex[24..64])))
}

fn word_as_usize(word: &str) -> Result<usize> {
    u64::from_str_radix(word, 16)
        .map(|v| v as usize)
        .map_err(|_| Error::Abi(format!("not a word-sized integer: {word}")))
}

/// Decode a dynamic `string` return value (offset word, length word, data).
fn decode_string(result: &str) -> Result<String> {
    let hex = result_words(result)?;

    let offset = word_as_usize(&hex[0..64])? * 2;
    let length_end = offset + 64;
    if hex.len() < length_end {
        return Err(Error::Abi("string offset past end of result".into()));
    }
    let length = word_as_usize(&hex[offset..length_end])? * 2;
    if hex.len() < length_end + length {
        return Err(Error::Abi("string length past end of result".into()));
    }

    let data = &hex[length_end..length_end + length];
    let bytes = (0..data.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&data[i..i + 2], 16))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|_| Error::Abi(format!("non-hex string data: {data}")))?;

    String::from_utf8(bytes).map_err(|e| Error::Abi(format!("string is not UTF-8: {e}")))
}
