//! Wire types for the wallet bridge JSON-RPC protocol.
//!
//! Wei quantities travel as decimal strings because JSON numbers cannot hold
//! a full `uint256`; the [`wei_string`] helper converts at the serde
//! boundary so the rest of the crate works in `u128`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponseEnvelope {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Wallet session as reported by the bridge. Both fields are absent while
/// no wallet is connected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub chain_id: Option<u64>,
}

impl SessionInfo {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeiAmount {
    #[serde(with = "wei_string")]
    pub wei: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutcome {
    pub tx_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: u64,
}

#[derive(Debug, Serialize)]
pub struct AddressParams<'a> {
    pub address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintableParams<'a> {
    pub address: &'a str,
    #[serde(with = "wei_string")]
    pub deposit_wei: u128,
}

/// A state-changing manager call, ready to submit through the bridge.
/// Oracle payloads are already hex encoded by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManagerCall {
    Deposit { value_wei: u128 },
    Withdraw { amount_wei: u128 },
    Mint { amount_wei: u128, oracle_payload: String },
    Burn { amount_wei: u128 },
    BurnAndWithdraw { amount_wei: u128, oracle_payload: String },
    DepositAndMint { value_wei: u128, oracle_payload: String },
}

impl ManagerCall {
    pub fn method(&self) -> &'static str {
        match self {
            ManagerCall::Deposit { .. } => "manager_deposit",
            ManagerCall::Withdraw { .. } => "manager_withdraw",
            ManagerCall::Mint { .. } => "manager_mint",
            ManagerCall::Burn { .. } => "manager_burn",
            ManagerCall::BurnAndWithdraw { .. } => "manager_burnAndWithdraw",
            ManagerCall::DepositAndMint { .. } => "manager_depositAndMint",
        }
    }

    pub fn params(&self) -> Value {
        match self {
            ManagerCall::Deposit { value_wei } => json!({
                "valueWei": value_wei.to_string(),
            }),
            ManagerCall::Withdraw { amount_wei } | ManagerCall::Burn { amount_wei } => json!({
                "amountWei": amount_wei.to_string(),
            }),
            ManagerCall::Mint {
                amount_wei,
                oracle_payload,
            }
            | ManagerCall::BurnAndWithdraw {
                amount_wei,
                oracle_payload,
            } => json!({
                "amountWei": amount_wei.to_string(),
                "oraclePayload": oracle_payload,
            }),
            ManagerCall::DepositAndMint {
                value_wei,
                oracle_payload,
            } => json!({
                "valueWei": value_wei.to_string(),
                "oraclePayload": oracle_payload,
            }),
        }
    }
}

pub(crate) mod wei_string {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(wei: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(wei)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map_err(|_| DeError::custom(format!("invalid wei quantity: {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wei_amounts_travel_as_decimal_strings() {
        let amount = WeiAmount {
            wei: 250_000_000_000_000_000_000,
        };
        let raw = serde_json::to_string(&amount).expect("serialize wei");
        assert_eq!(raw, r#"{"wei":"250000000000000000000"}"#);

        let parsed: WeiAmount = serde_json::from_str(&raw).expect("parse wei");
        assert_eq!(parsed, amount);
    }

    #[test]
    fn malformed_wei_strings_are_rejected() {
        let outcome = serde_json::from_str::<WeiAmount>(r#"{"wei":"0x10"}"#);
        assert!(outcome.is_err());
    }

    #[test]
    fn session_info_defaults_to_disconnected() {
        let session: SessionInfo = serde_json::from_str("{}").expect("empty session");
        assert!(!session.is_connected());
        assert_eq!(session.chain_id, None);

        let session: SessionInfo =
            serde_json::from_str(r#"{"address":"0xabc","chainId":11155111}"#)
                .expect("connected session");
        assert!(session.is_connected());
        assert_eq!(session.chain_id, Some(11_155_111));
    }

    #[test]
    fn manager_calls_serialize_method_and_params() {
        let deposit = ManagerCall::Deposit {
            value_wei: 100_000_000_000_000_000,
        };
        assert_eq!(deposit.method(), "manager_deposit");
        assert_eq!(deposit.params(), json!({ "valueWei": "100000000000000000" }));

        let combined = ManagerCall::BurnAndWithdraw {
            amount_wei: 5,
            oracle_payload: "deadbeef".to_string(),
        };
        assert_eq!(combined.method(), "manager_burnAndWithdraw");
        assert_eq!(
            combined.params(),
            json!({ "amountWei": "5", "oraclePayload": "deadbeef" })
        );

        let dual = ManagerCall::DepositAndMint {
            value_wei: 7,
            oracle_payload: "beef".to_string(),
        };
        assert_eq!(dual.method(), "manager_depositAndMint");
        assert_eq!(
            dual.params(),
            json!({ "valueWei": "7", "oraclePayload": "beef" })
        );
    }
}
