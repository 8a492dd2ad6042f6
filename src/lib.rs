//! Client-side logic for the ChUSD collateralized stablecoin mini app.
//!
//! The crate wraps a wallet bridge daemon behind a typed JSON-RPC client,
//! derives interaction state and mintable previews from on-chain reads, and
//! drives the deposit/mint/burn transaction lifecycle surfaced by the GUI.

pub mod amount;
pub mod config;
pub mod oracle;
pub mod position;
pub mod rpc;

#[cfg(feature = "gui")]
pub mod ui;

pub use config::AppConfig;
pub use position::OnChainPosition;
