use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// Error codes returned by the wallet bridge. The numeric values follow the
/// JSON-RPC convention: the `-32600..-32603` range for protocol errors and
/// the implementation-defined `-32000..-32099` range for domain errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeErrorCode {
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    WalletNotConnected,
    WrongChain,
    UserRejected,
    ExecutionReverted,
    InsufficientFunds,
    OraclePayloadInvalid,
    Custom(String),
}

impl BridgeErrorCode {
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            BridgeErrorCode::InvalidRequest => Cow::Borrowed("INVALID_REQUEST"),
            BridgeErrorCode::MethodNotFound => Cow::Borrowed("METHOD_NOT_FOUND"),
            BridgeErrorCode::InvalidParams => Cow::Borrowed("INVALID_PARAMS"),
            BridgeErrorCode::InternalError => Cow::Borrowed("INTERNAL_ERROR"),
            BridgeErrorCode::WalletNotConnected => Cow::Borrowed("WALLET_NOT_CONNECTED"),
            BridgeErrorCode::WrongChain => Cow::Borrowed("WRONG_CHAIN"),
            BridgeErrorCode::UserRejected => Cow::Borrowed("USER_REJECTED"),
            BridgeErrorCode::ExecutionReverted => Cow::Borrowed("EXECUTION_REVERTED"),
            BridgeErrorCode::InsufficientFunds => Cow::Borrowed("INSUFFICIENT_FUNDS"),
            BridgeErrorCode::OraclePayloadInvalid => Cow::Borrowed("ORACLE_PAYLOAD_INVALID"),
            BridgeErrorCode::Custom(tag) => Cow::Owned(tag.clone()),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            BridgeErrorCode::InvalidRequest => -32600,
            BridgeErrorCode::MethodNotFound => -32601,
            BridgeErrorCode::InvalidParams => -32602,
            BridgeErrorCode::InternalError => -32603,
            BridgeErrorCode::WalletNotConnected => -32000,
            BridgeErrorCode::WrongChain => -32001,
            BridgeErrorCode::UserRejected => -32002,
            BridgeErrorCode::ExecutionReverted => -32003,
            BridgeErrorCode::InsufficientFunds => -32004,
            BridgeErrorCode::OraclePayloadInvalid => -32005,
            BridgeErrorCode::Custom(_) => -32090,
        }
    }

    /// Maps a wire error object back to a typed code. A symbolic `code` tag
    /// in the error data outranks the numeric code, which only backs the
    /// mapping for untagged errors; unknown untagged numerics keep the
    /// message as the tag.
    pub fn from_wire(code: i64, message: &str, data: Option<&Value>) -> Self {
        if let Some(tag) = data.and_then(|data| data.get("code")).and_then(Value::as_str) {
            return BridgeErrorCode::from(tag);
        }
        match code {
            -32600 => BridgeErrorCode::InvalidRequest,
            -32601 => BridgeErrorCode::MethodNotFound,
            -32602 => BridgeErrorCode::InvalidParams,
            -32603 => BridgeErrorCode::InternalError,
            -32000 => BridgeErrorCode::WalletNotConnected,
            -32001 => BridgeErrorCode::WrongChain,
            -32002 => BridgeErrorCode::UserRejected,
            -32003 => BridgeErrorCode::ExecutionReverted,
            -32004 => BridgeErrorCode::InsufficientFunds,
            -32005 => BridgeErrorCode::OraclePayloadInvalid,
            _ => BridgeErrorCode::Custom(message.to_string()),
        }
    }
}

impl From<&str> for BridgeErrorCode {
    fn from(tag: &str) -> Self {
        match tag {
            "INVALID_REQUEST" => BridgeErrorCode::InvalidRequest,
            "METHOD_NOT_FOUND" => BridgeErrorCode::MethodNotFound,
            "INVALID_PARAMS" => BridgeErrorCode::InvalidParams,
            "INTERNAL_ERROR" => BridgeErrorCode::InternalError,
            "WALLET_NOT_CONNECTED" => BridgeErrorCode::WalletNotConnected,
            "WRONG_CHAIN" => BridgeErrorCode::WrongChain,
            "USER_REJECTED" => BridgeErrorCode::UserRejected,
            "EXECUTION_REVERTED" => BridgeErrorCode::ExecutionReverted,
            "INSUFFICIENT_FUNDS" => BridgeErrorCode::InsufficientFunds,
            "ORACLE_PAYLOAD_INVALID" => BridgeErrorCode::OraclePayloadInvalid,
            other => BridgeErrorCode::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for BridgeErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.as_str())
    }
}
