//! Application configuration loaded from an optional TOML file.

mod app;

pub use app::{
    AppConfig, AppTheme, BridgeConfig, GuiConfig, NetworkConfig, OracleConfig, OracleStrategy,
    TransactionMode, DEFAULT_BRIDGE_ENDPOINT, DEFAULT_BRIDGE_TIMEOUT_SECS, DEFAULT_CHAIN_NAME,
    DEFAULT_DATA_SERVICE_ID, DEFAULT_DEPOSIT_AMOUNT, DEFAULT_FEED_ID, DEFAULT_ORACLE_GATEWAY_URL,
    DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_PRICE_API_URL,
    DEFAULT_REQUIRED_CHAIN_ID, MIN_BRIDGE_TIMEOUT_SECS, MIN_ORACLE_TIMEOUT_SECS,
    MIN_POLL_INTERVAL_MS,
};
