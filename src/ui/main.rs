//! GUI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use chusd_app::config::TransactionMode;
use chusd_app::oracle::{OracleError, OracleProvider};
use chusd_app::rpc::{BridgeRpcClient, BridgeRpcClientError};
use chusd_app::ui::{self, AppFlags, Runtime, UiTelemetry};
use chusd_app::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "chusd-gui",
    about = "Desktop mini app for the ChUSD stablecoin testnet",
    version
)]
struct Options {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wallet bridge endpoint override.
    #[arg(long, env = "CHUSD_BRIDGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Bearer token for the bridge, if it requires one.
    #[arg(long, env = "CHUSD_BRIDGE_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Bridge request timeout override, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Session poll interval override, in milliseconds.
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Run against the in-memory demo ledger instead of the bridge.
    #[arg(long)]
    simulated: bool,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("could not read {path}: {source}")]
    ReadConfig {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseConfig {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Client(#[from] BridgeRpcClientError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = Options::parse();
    let flags = match build_flags(options) {
        Ok(flags) => flags,
        Err(error) => {
            error!(%error, "failed to start");
            return ExitCode::FAILURE;
        }
    };
    match ui::launch(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "gui terminated");
            ExitCode::FAILURE
        }
    }
}

fn build_flags(options: Options) -> Result<AppFlags, StartupError> {
    let mut config = match &options.config {
        Some(path) => {
            let shown = path.display().to_string();
            let raw = std::fs::read_to_string(path).map_err(|source| StartupError::ReadConfig {
                path: shown.clone(),
                source,
            })?;
            AppConfig::from_toml_str(&raw).map_err(|source| StartupError::ParseConfig {
                path: shown,
                source,
            })?
        }
        None => AppConfig::default(),
    };
    if let Some(endpoint) = options.endpoint {
        config.bridge.endpoint = endpoint;
    }
    if let Some(token) = options.auth_token {
        config.bridge.auth_token = Some(token);
    }
    if let Some(timeout_secs) = options.timeout_secs {
        config.bridge.timeout_secs = timeout_secs;
    }
    if let Some(poll_interval_ms) = options.poll_interval_ms {
        config.gui.poll_interval_ms = poll_interval_ms;
    }
    if options.simulated {
        config.gui.transaction_mode = TransactionMode::Simulated;
    }
    // overrides go through the same clamps as file values
    let config = config.sanitized();

    UiTelemetry::install(config.gui.telemetry);

    let runtime = match config.gui.transaction_mode {
        TransactionMode::Simulated => Runtime::Simulated,
        TransactionMode::Live => {
            let client = BridgeRpcClient::from_endpoint(
                &config.bridge.endpoint,
                config.bridge.auth_token.clone(),
                config.bridge.timeout(),
            )?;
            let oracle = OracleProvider::new(config.oracle.clone())?;
            info!(
                endpoint = %client.endpoint(),
                chain = %config.network.chain_name,
                "connecting to wallet bridge",
            );
            Runtime::Live {
                client: Arc::new(client),
                oracle: Arc::new(oracle),
            }
        }
    };
    Ok(AppFlags { config, runtime })
}
