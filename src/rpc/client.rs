use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::position::OnChainPosition;

use super::dto::{
    AddressParams, ManagerCall, MintableParams, RpcRequest, RpcResponseEnvelope, SessionInfo,
    SwitchChainParams, TxOutcome, WeiAmount,
};
use super::error::BridgeErrorCode;

/// Failures surfaced by [`BridgeRpcClient`]. Variants carry rendered strings
/// instead of the underlying `reqwest` and `serde_json` errors so the type
/// stays `Clone` and can travel inside GUI messages.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BridgeRpcClientError {
    #[error("invalid bridge endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("bridge call failed with {code}: {message}")]
    Rpc {
        code: BridgeErrorCode,
        message: String,
        data: Option<Value>,
    },
    #[error("could not reach the wallet bridge: {0}")]
    Transport(String),
    #[error("could not decode bridge response: {0}")]
    Decode(String),
    #[error("bridge response carried neither result nor error")]
    MissingResult,
}

impl From<reqwest::Error> for BridgeRpcClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            BridgeRpcClientError::Decode(error.to_string())
        } else {
            BridgeRpcClientError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for BridgeRpcClientError {
    fn from(error: serde_json::Error) -> Self {
        BridgeRpcClientError::Decode(error.to_string())
    }
}

/// JSON-RPC client for the wallet bridge daemon that holds the browser
/// wallet session and signs on the user's behalf.
pub struct BridgeRpcClient {
    http: reqwest::Client,
    url: Url,
    auth_token: Option<String>,
    next_id: AtomicU64,
}

impl BridgeRpcClient {
    /// Builds a client from a string endpoint, normalising the `/rpc`
    /// suffix if needed.
    pub fn from_endpoint(
        endpoint: &str,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BridgeRpcClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: normalize_endpoint(endpoint)?,
            auth_token,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, BridgeRpcClientError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let mut builder = self.http.post(self.url.clone()).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BridgeRpcClientError::Transport(format!(
                "bridge returned HTTP {status}"
            )));
        }
        let envelope: RpcResponseEnvelope = response.json().await?;
        decode_envelope(envelope)
    }

    pub async fn session_info(&self) -> Result<SessionInfo, BridgeRpcClientError> {
        self.call("wallet_sessionInfo", Value::Null).await
    }

    /// Asks the bridge to switch the wallet to `chain_id` and returns the
    /// refreshed session.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<SessionInfo, BridgeRpcClientError> {
        let params = serde_json::to_value(SwitchChainParams { chain_id })?;
        self.call("wallet_switchChain", params).await
    }

    pub async fn eth_balance(&self, address: &str) -> Result<u128, BridgeRpcClientError> {
        self.wei_read("wallet_ethBalance", address).await
    }

    pub async fn token_balance(&self, address: &str) -> Result<u128, BridgeRpcClientError> {
        self.wei_read("chusd_balanceOf", address).await
    }

    pub async fn deposit_of(&self, address: &str) -> Result<u128, BridgeRpcClientError> {
        self.wei_read("manager_depositOf", address).await
    }

    pub async fn mint_of(&self, address: &str) -> Result<u128, BridgeRpcClientError> {
        self.wei_read("manager_mintOf", address).await
    }

    /// How much ChUSD the manager would allow `address` to mint after an
    /// additional deposit of `deposit_wei`.
    pub async fn mintable_for(
        &self,
        address: &str,
        deposit_wei: u128,
    ) -> Result<u128, BridgeRpcClientError> {
        let params = serde_json::to_value(MintableParams {
            address,
            deposit_wei,
        })?;
        let amount: WeiAmount = self
            .call("manager_calculateMintableTokensForUser", params)
            .await?;
        Ok(amount.wei)
    }

    /// Reads all four balances that make up a wallet's footprint.
    pub async fn read_position(
        &self,
        address: &str,
    ) -> Result<OnChainPosition, BridgeRpcClientError> {
        let eth_wei = self.eth_balance(address).await?;
        let token_wei = self.token_balance(address).await?;
        let deposited_wei = self.deposit_of(address).await?;
        let minted_wei = self.mint_of(address).await?;
        Ok(OnChainPosition {
            eth_wei,
            token_wei,
            deposited_wei,
            minted_wei,
        })
    }

    /// Submits a manager call and waits for the bridge to report the mined
    /// transaction. Rejections and reverts come back as typed RPC errors.
    pub async fn submit(&self, call: &ManagerCall) -> Result<TxOutcome, BridgeRpcClientError> {
        self.call(call.method(), call.params()).await
    }

    async fn wei_read(&self, method: &str, address: &str) -> Result<u128, BridgeRpcClientError> {
        let params = serde_json::to_value(AddressParams { address })?;
        let amount: WeiAmount = self.call(method, params).await?;
        Ok(amount.wei)
    }
}

fn decode_envelope<T: DeserializeOwned>(
    envelope: RpcResponseEnvelope,
) -> Result<T, BridgeRpcClientError> {
    if let Some(error) = envelope.error {
        let code = BridgeErrorCode::from_wire(error.code, &error.message, error.data.as_ref());
        return Err(BridgeRpcClientError::Rpc {
            code,
            message: error.message,
            data: error.data,
        });
    }
    let result = envelope.result.ok_or(BridgeRpcClientError::MissingResult)?;
    Ok(serde_json::from_value(result)?)
}

// bare host:port endpoints get an http scheme before parsing, and every
// endpoint is pinned to the bridge's /rpc route
fn normalize_endpoint(raw: &str) -> Result<Url, BridgeRpcClientError> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let mut url = Url::parse(&with_scheme)
        .map_err(|error| BridgeRpcClientError::InvalidEndpoint(error.to_string()))?;
    let mut path = url.path().trim_end_matches('/').to_string();
    if path.is_empty() {
        url.set_path("/rpc");
    } else if !path.ends_with("/rpc") {
        path.push_str("/rpc");
        url.set_path(&path);
    } else {
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoints_are_normalized() {
        let cases = [
            ("127.0.0.1:9545", "http://127.0.0.1:9545/rpc"),
            ("http://localhost:9545/", "http://localhost:9545/rpc"),
            ("  https://bridge.example/rpc/  ", "https://bridge.example/rpc"),
            ("https://bridge.example/base/", "https://bridge.example/base/rpc"),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_endpoint(raw).expect(raw).as_str(), expected);
        }
        assert!(matches!(
            normalize_endpoint("http://"),
            Err(BridgeRpcClientError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn client_keeps_normalized_endpoint() {
        let client =
            BridgeRpcClient::from_endpoint("localhost:9545/", None, Duration::from_secs(1))
                .expect("client");
        assert_eq!(client.endpoint().as_str(), "http://localhost:9545/rpc");
    }

    #[test]
    fn envelope_result_decodes_into_typed_value() {
        let envelope: RpcResponseEnvelope =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": { "wei": "42" } }))
                .expect("envelope");
        let amount: WeiAmount = decode_envelope(envelope).expect("decode");
        assert_eq!(amount.wei, 42);
    }

    #[test]
    fn envelope_error_maps_to_typed_code() {
        let envelope: RpcResponseEnvelope = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32002, "message": "user denied the request" },
        }))
        .expect("envelope");
        let outcome: Result<WeiAmount, _> = decode_envelope(envelope);
        match outcome {
            Err(BridgeRpcClientError::Rpc { code, message, .. }) => {
                assert_eq!(code, BridgeErrorCode::UserRejected);
                assert_eq!(message, "user denied the request");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_envelope_is_rejected() {
        let envelope: RpcResponseEnvelope =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 3 })).expect("envelope");
        let outcome: Result<WeiAmount, _> = decode_envelope(envelope);
        assert_eq!(outcome, Err(BridgeRpcClientError::MissingResult));
    }
}
