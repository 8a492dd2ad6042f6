//! Typed JSON-RPC client for the wallet bridge daemon.
//!
//! The bridge owns the browser wallet session; this crate only ever speaks
//! to it over localhost. Read methods mirror the public views of the ChUSD
//! and Manager contracts, write methods submit signed transactions and block
//! until they are mined.

mod client;
mod dto;
mod error;

pub use client::{BridgeRpcClient, BridgeRpcClientError};
pub use dto::{ManagerCall, SessionInfo, TxOutcome, WeiAmount};
pub use error::BridgeErrorCode;
