//! Async plumbing between the GUI update loop and the bridge client.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use iced::Command;

use crate::oracle::OracleError;
use crate::rpc::BridgeRpcClientError;

use super::telemetry::UiTelemetry;

/// Upper bound for a single bridge call, on top of the HTTP timeout the
/// client itself enforces.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug, PartialEq)]
pub enum RpcCallError {
    Timeout(Duration),
    Client(BridgeRpcClientError),
}

impl fmt::Display for RpcCallError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallError::Timeout(limit) => {
                write!(formatter, "bridge call timed out after {}s", limit.as_secs())
            }
            RpcCallError::Client(error) => error.fmt(formatter),
        }
    }
}

/// Failure of a submission flow, which may break before the bridge call when
/// the oracle payload cannot be produced.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitError {
    Oracle(OracleError),
    Call(RpcCallError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Oracle(error) => error.fmt(formatter),
            SubmitError::Call(error) => error.fmt(formatter),
        }
    }
}

impl From<OracleError> for SubmitError {
    fn from(error: OracleError) -> Self {
        SubmitError::Oracle(error)
    }
}

impl From<RpcCallError> for SubmitError {
    fn from(error: RpcCallError) -> Self {
        SubmitError::Call(error)
    }
}

/// Awaits a bridge call under `timeout` and records the outcome.
pub async fn call_with_timeout<T>(
    method: &'static str,
    timeout: Duration,
    future: impl Future<Output = Result<T, BridgeRpcClientError>>,
) -> Result<T, RpcCallError> {
    let started = Instant::now();
    match tokio::time::timeout(timeout, future).await {
        Ok(Ok(value)) => {
            UiTelemetry::global().record_rpc_success(method, started.elapsed());
            Ok(value)
        }
        Ok(Err(error)) => {
            UiTelemetry::global().record_rpc_failure(method);
            Err(RpcCallError::Client(error))
        }
        Err(_) => {
            UiTelemetry::global().record_rpc_timeout(method);
            Err(RpcCallError::Timeout(timeout))
        }
    }
}

/// Runs a bridge read as an iced command with the default timeout.
pub fn rpc<T, M>(
    method: &'static str,
    future: impl Future<Output = Result<T, BridgeRpcClientError>> + Send + 'static,
    on_complete: fn(Result<T, RpcCallError>) -> M,
) -> Command<M>
where
    T: Send + 'static,
    M: Send + 'static,
{
    Command::perform(
        call_with_timeout(method, DEFAULT_RPC_TIMEOUT, future),
        on_complete,
    )
}
