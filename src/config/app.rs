use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::amount::parse_eth_amount;

pub const DEFAULT_BRIDGE_ENDPOINT: &str = "http://127.0.0.1:9545";
pub const DEFAULT_BRIDGE_TIMEOUT_SECS: u64 = 15;
pub const MIN_BRIDGE_TIMEOUT_SECS: u64 = 1;

pub const DEFAULT_REQUIRED_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_CHAIN_NAME: &str = "Sepolia";

pub const DEFAULT_ORACLE_GATEWAY_URL: &str =
    "https://oracle-gateway-1.a.redstone.finance/data-packages/payload";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.redstone.finance/prices";
pub const DEFAULT_DATA_SERVICE_ID: &str = "redstone-main-demo";
pub const DEFAULT_FEED_ID: &str = "ETH";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 10;
pub const MIN_ORACLE_TIMEOUT_SECS: u64 = 1;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const MIN_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_DEPOSIT_AMOUNT: &str = "0.1";

/// Top-level configuration for the mini app. Every section and field is
/// optional in the TOML file; absent values fall back to the defaults below.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    pub network: NetworkConfig,
    pub oracle: OracleConfig,
    pub gui: GuiConfig,
}

impl AppConfig {
    /// Parses a TOML document and normalizes out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<AppConfig>(raw).map(AppConfig::sanitized)
    }

    /// Clamps every tunable to its supported range so the rest of the app
    /// never has to re-validate configuration values.
    pub fn sanitized(mut self) -> Self {
        self.bridge.timeout_secs = self.bridge.timeout_secs.max(MIN_BRIDGE_TIMEOUT_SECS);
        self.oracle.timeout_secs = self.oracle.timeout_secs.max(MIN_ORACLE_TIMEOUT_SECS);
        self.gui.poll_interval_ms = self.gui.poll_interval_ms.max(MIN_POLL_INTERVAL_MS);
        if parse_eth_amount(&self.gui.default_deposit_amount).is_err() {
            self.gui.default_deposit_amount = DEFAULT_DEPOSIT_AMOUNT.to_string();
        }
        self
    }
}

/// Connection settings for the wallet bridge daemon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub endpoint: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BRIDGE_ENDPOINT.to_string(),
            auth_token: None,
            timeout_secs: DEFAULT_BRIDGE_TIMEOUT_SECS,
        }
    }
}

impl BridgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which chain the contracts are deployed on. Writes are blocked while the
/// wallet session reports a different chain id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub required_chain_id: u64,
    pub chain_name: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            required_chain_id: DEFAULT_REQUIRED_CHAIN_ID,
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
        }
    }
}

/// How price attestations are produced for manager calls that verify an
/// oracle payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub strategy: OracleStrategy,
    pub gateway_url: String,
    pub price_api_url: String,
    pub data_service_id: String,
    pub feed_id: String,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            strategy: OracleStrategy::Attested,
            gateway_url: DEFAULT_ORACLE_GATEWAY_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            data_service_id: DEFAULT_DATA_SERVICE_ID.to_string(),
            feed_id: DEFAULT_FEED_ID.to_string(),
            timeout_secs: DEFAULT_ORACLE_TIMEOUT_SECS,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleStrategy {
    /// Fetch a signed data package from the oracle gateway.
    #[default]
    Attested,
    /// Fetch a spot quote from the public price API and encode it locally.
    Spot,
}

/// Presentation tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub poll_interval_ms: u64,
    pub theme: AppTheme,
    pub default_deposit_amount: String,
    pub transaction_mode: TransactionMode,
    pub telemetry: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            theme: AppTheme::System,
            default_deposit_amount: DEFAULT_DEPOSIT_AMOUNT.to_string(),
            transaction_mode: TransactionMode::Live,
            telemetry: false,
        }
    }
}

impl GuiConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppTheme {
    #[default]
    System,
    Light,
    Dark,
}

/// Whether submissions go through the bridge or run against the in-memory
/// demo ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionMode {
    #[default]
    Live,
    Simulated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = AppConfig::default();
        assert_eq!(config.bridge.endpoint, DEFAULT_BRIDGE_ENDPOINT);
        assert_eq!(config.bridge.auth_token, None);
        assert_eq!(config.bridge.timeout_secs, DEFAULT_BRIDGE_TIMEOUT_SECS);
        assert_eq!(config.network.required_chain_id, DEFAULT_REQUIRED_CHAIN_ID);
        assert_eq!(config.network.chain_name, DEFAULT_CHAIN_NAME);
        assert_eq!(config.oracle.strategy, OracleStrategy::Attested);
        assert_eq!(config.oracle.feed_id, DEFAULT_FEED_ID);
        assert_eq!(config.gui.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.gui.default_deposit_amount, DEFAULT_DEPOSIT_AMOUNT);
        assert_eq!(config.gui.transaction_mode, TransactionMode::Live);
        assert!(!config.gui.telemetry);
    }

    #[test]
    fn empty_document_parses_to_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_sections_default() {
        let raw = r#"
            [network]
            required_chain_id = 31337
            chain_name = "Anvil"

            [gui]
            transaction_mode = "simulated"
            theme = "dark"
        "#;
        let config = AppConfig::from_toml_str(raw).expect("partial config");
        assert_eq!(config.network.required_chain_id, 31_337);
        assert_eq!(config.network.chain_name, "Anvil");
        assert_eq!(config.gui.transaction_mode, TransactionMode::Simulated);
        assert_eq!(config.gui.theme, AppTheme::Dark);
        assert_eq!(config.bridge, BridgeConfig::default());
        assert_eq!(config.oracle, OracleConfig::default());
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let raw = r#"
            [bridge]
            timeout_secs = 0

            [oracle]
            timeout_secs = 0

            [gui]
            poll_interval_ms = 10
            default_deposit_amount = "not-a-number"
        "#;
        let config = AppConfig::from_toml_str(raw).expect("clamped config");
        assert_eq!(config.bridge.timeout_secs, MIN_BRIDGE_TIMEOUT_SECS);
        assert_eq!(config.oracle.timeout_secs, MIN_ORACLE_TIMEOUT_SECS);
        assert_eq!(config.gui.poll_interval_ms, MIN_POLL_INTERVAL_MS);
        assert_eq!(config.gui.default_deposit_amount, DEFAULT_DEPOSIT_AMOUNT);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut config = AppConfig::default();
        config.bridge.auth_token = Some("secret".to_string());
        config.oracle.strategy = OracleStrategy::Spot;
        config.gui.transaction_mode = TransactionMode::Simulated;

        let raw = toml::to_string(&config).expect("serialize config");
        let parsed = AppConfig::from_toml_str(&raw).expect("reparse config");
        assert_eq!(parsed, config);
    }
}
