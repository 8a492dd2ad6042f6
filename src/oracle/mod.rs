//! Price attestation payloads for manager calls that verify an oracle
//! signature on-chain.
//!
//! Two strategies exist. `attested` asks an oracle gateway for a signed data
//! package and forwards it untouched. `spot` quotes the public price API and
//! encodes the value locally as a single data point: a 32-byte feed id, a
//! 32-byte big-endian value scaled to [`PRICE_DECIMALS`], an 8-byte unix
//! millisecond timestamp, and a trailing data-point count of one.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::{OracleConfig, OracleStrategy};

pub const PRICE_DECIMALS: u32 = 8;

const FEED_BYTES: usize = 32;
const VALUE_BYTES: usize = 32;
const TIMESTAMP_BYTES: usize = 8;

/// Total length of a locally encoded spot payload.
pub const SPOT_PAYLOAD_LEN: usize = FEED_BYTES + VALUE_BYTES + TIMESTAMP_BYTES + 1;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Request(String),
    #[error("oracle returned an unusable response: {0}")]
    Malformed(String),
    #[error("oracle quote is unusable: {0}")]
    InvalidQuote(String),
}

impl From<reqwest::Error> for OracleError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            OracleError::Malformed(error.to_string())
        } else {
            OracleError::Request(error.to_string())
        }
    }
}

/// Opaque attestation bytes appended to a manager transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OraclePayload {
    bytes: Vec<u8>,
}

impl OraclePayload {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parses gateway output. Accepts an optional `0x` prefix and rejects
    /// empty payloads, which a manager contract would revert on anyway.
    pub fn from_hex(raw: &str) -> Result<Self, OracleError> {
        let stripped = raw.trim().trim_start_matches("0x");
        if stripped.is_empty() {
            return Err(OracleError::Malformed("empty payload".to_string()));
        }
        let bytes = hex::decode(stripped)
            .map_err(|error| OracleError::Malformed(format!("payload is not hex: {error}")))?;
        Ok(Self { bytes })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Produces oracle payloads according to the configured strategy.
pub struct OracleProvider {
    http: reqwest::Client,
    config: OracleConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayRequest<'a> {
    data_service_id: &'a str,
    feeds: [&'a str; 1],
}

#[derive(Deserialize)]
struct GatewayResponse {
    payload: String,
}

#[derive(Deserialize)]
struct SpotQuote {
    value: PriceValue,
    #[serde(default)]
    timestamp: Option<u64>,
}

/// The price API serves `value` as a JSON number or as a decimal string
/// depending on the provider behind it.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    fn as_f64(&self) -> Result<f64, OracleError> {
        match self {
            PriceValue::Number(value) => Ok(*value),
            PriceValue::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| OracleError::Malformed(format!("price value {raw:?} is not numeric"))),
        }
    }
}

impl OracleProvider {
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| OracleError::Request(error.to_string()))?;
        Ok(Self { http, config })
    }

    /// Fetches a fresh payload. Every failure path is reported as an error;
    /// callers must not submit a verifying transaction without a payload.
    pub async fn generate(&self) -> Result<OraclePayload, OracleError> {
        let outcome = match self.config.strategy {
            OracleStrategy::Attested => self.attested_payload().await,
            OracleStrategy::Spot => self.spot_payload().await,
        };
        if let Err(error) = &outcome {
            let endpoint = match self.config.strategy {
                OracleStrategy::Attested => self.config.gateway_url.as_str(),
                OracleStrategy::Spot => self.config.price_api_url.as_str(),
            };
            warn!(
                strategy = ?self.config.strategy,
                feed = %self.config.feed_id,
                %endpoint,
                %error,
                "oracle payload generation failed",
            );
        }
        outcome
    }

    async fn attested_payload(&self) -> Result<OraclePayload, OracleError> {
        let request = GatewayRequest {
            data_service_id: &self.config.data_service_id,
            feeds: [self.config.feed_id.as_str()],
        };
        let response = self
            .http
            .post(&self.config.gateway_url)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Request(format!(
                "gateway returned HTTP {status}"
            )));
        }
        let body: GatewayResponse = response.json().await?;
        OraclePayload::from_hex(&body.payload)
    }

    async fn spot_payload(&self) -> Result<OraclePayload, OracleError> {
        let response = self
            .http
            .get(&self.config.price_api_url)
            .query(&[
                ("symbol", self.config.feed_id.as_str()),
                ("provider", "redstone"),
                ("limit", "1"),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Request(format!(
                "price api returned HTTP {status}"
            )));
        }
        let quotes: Vec<SpotQuote> = response.json().await?;
        let quote = quotes
            .first()
            .ok_or_else(|| OracleError::Malformed("price api returned no quotes".to_string()))?;
        let timestamp_ms = quote.timestamp.unwrap_or_else(unix_millis);
        encode_spot_payload(&self.config.feed_id, quote.value.as_f64()?, timestamp_ms)
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Encodes one price point in the layout the manager's verifier expects.
pub fn encode_spot_payload(
    feed_id: &str,
    value: f64,
    timestamp_ms: u64,
) -> Result<OraclePayload, OracleError> {
    let feed = feed_id.as_bytes();
    if feed.is_empty() || feed.len() > FEED_BYTES {
        return Err(OracleError::InvalidQuote(format!(
            "feed id {feed_id:?} does not fit in {FEED_BYTES} bytes"
        )));
    }
    let scaled = scale_price(value)?;

    let mut bytes = Vec::with_capacity(SPOT_PAYLOAD_LEN);
    bytes.extend_from_slice(feed);
    bytes.resize(FEED_BYTES, 0);
    bytes.extend_from_slice(&[0u8; VALUE_BYTES - 16]);
    bytes.extend_from_slice(&scaled.to_be_bytes());
    bytes.extend_from_slice(&timestamp_ms.to_be_bytes());
    bytes.push(1);
    Ok(OraclePayload::from_bytes(bytes))
}

fn scale_price(value: f64) -> Result<u128, OracleError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(OracleError::InvalidQuote(format!("price {value}")));
    }
    let scaled = (value * 10f64.powi(PRICE_DECIMALS as i32)).round();
    if scaled > u128::MAX as f64 {
        return Err(OracleError::InvalidQuote(format!("price {value}")));
    }
    Ok(scaled as u128)
}
