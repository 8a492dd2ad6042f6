//! Maps bridge and oracle failures to the short descriptions shown in
//! toasts and banners. Headlines stay non-technical; the raw cause is kept
//! alongside for the expandable detail line.

use serde_json::Value;

use crate::rpc::{BridgeErrorCode, BridgeRpcClientError};

use super::commands::{RpcCallError, SubmitError};

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorDescription {
    pub headline: String,
    pub technical: Option<String>,
}

pub fn describe_submit_error(error: &SubmitError) -> ErrorDescription {
    match error {
        SubmitError::Oracle(error) => ErrorDescription {
            headline: "Live price data is unavailable right now.".to_string(),
            technical: Some(error.to_string()),
        },
        SubmitError::Call(error) => describe_call_error(error),
    }
}

pub fn describe_call_error(error: &RpcCallError) -> ErrorDescription {
    match error {
        RpcCallError::Timeout(limit) => ErrorDescription {
            headline: "The wallet bridge did not respond in time.".to_string(),
            technical: Some(format!("no response within {}s", limit.as_secs())),
        },
        RpcCallError::Client(error) => describe_bridge_error(error),
    }
}

fn describe_bridge_error(error: &BridgeRpcClientError) -> ErrorDescription {
    match error {
        BridgeRpcClientError::Rpc {
            code,
            message,
            data,
        } => describe_rpc_error(code, message, data.as_ref()),
        BridgeRpcClientError::InvalidEndpoint(detail) => ErrorDescription {
            headline: "The configured bridge endpoint is invalid.".to_string(),
            technical: Some(detail.clone()),
        },
        BridgeRpcClientError::Transport(detail) => ErrorDescription {
            headline: "Could not reach the wallet bridge.".to_string(),
            technical: Some(detail.clone()),
        },
        BridgeRpcClientError::Decode(detail) => ErrorDescription {
            headline: "The wallet bridge sent an unexpected response.".to_string(),
            technical: Some(detail.clone()),
        },
        BridgeRpcClientError::MissingResult => ErrorDescription {
            headline: "The wallet bridge sent an unexpected response.".to_string(),
            technical: Some("response carried neither result nor error".to_string()),
        },
    }
}

pub fn describe_rpc_error(
    code: &BridgeErrorCode,
    message: &str,
    data: Option<&Value>,
) -> ErrorDescription {
    let headline = match code {
        BridgeErrorCode::UserRejected => "Transaction rejected in the wallet.",
        BridgeErrorCode::ExecutionReverted => "The transaction reverted on chain.",
        BridgeErrorCode::InsufficientFunds => "Insufficient funds to complete this transaction.",
        BridgeErrorCode::OraclePayloadInvalid => "The manager rejected the oracle payload.",
        BridgeErrorCode::WrongChain => "The wallet is connected to the wrong network.",
        BridgeErrorCode::WalletNotConnected => "No wallet is connected to the bridge.",
        BridgeErrorCode::InvalidRequest
        | BridgeErrorCode::MethodNotFound
        | BridgeErrorCode::InvalidParams => "The bridge rejected the request.",
        BridgeErrorCode::InternalError => "The wallet bridge hit an internal error.",
        BridgeErrorCode::Custom(_) => "The transaction could not be completed.",
    }
    .to_string();
    let technical = technical_details(&[
        Some(format!("{code}: {message}")),
        data.map(stringify_details),
    ]);
    ErrorDescription {
        headline,
        technical,
    }
}

fn stringify_details(details: &Value) -> String {
    match details {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn technical_details(parts: &[Option<String>]) -> Option<String> {
    let parts: Vec<&str> = parts
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" — "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn rpc_failure(code: BridgeErrorCode, message: &str) -> RpcCallError {
        RpcCallError::Client(BridgeRpcClientError::Rpc {
            code,
            message: message.to_string(),
            data: None,
        })
    }

    #[test]
    fn rejection_and_revert_get_distinct_headlines() {
        let rejected = describe_call_error(&rpc_failure(
            BridgeErrorCode::UserRejected,
            "user denied the request",
        ));
        assert_eq!(rejected.headline, "Transaction rejected in the wallet.");
        assert_eq!(
            rejected.technical.as_deref(),
            Some("USER_REJECTED: user denied the request")
        );

        let reverted = describe_call_error(&rpc_failure(
            BridgeErrorCode::ExecutionReverted,
            "Manager: unhealthy position",
        ));
        assert_eq!(reverted.headline, "The transaction reverted on chain.");
    }

    #[test]
    fn oracle_failures_map_to_the_price_headline() {
        let description = describe_submit_error(&SubmitError::Oracle(
            crate::oracle::OracleError::Request("gateway returned HTTP 503".to_string()),
        ));
        assert_eq!(description.headline, "Live price data is unavailable right now.");
        assert!(description
            .technical
            .as_deref()
            .is_some_and(|detail| detail.contains("503")));
    }

    #[test]
    fn timeouts_mention_the_limit() {
        let description =
            describe_call_error(&RpcCallError::Timeout(Duration::from_secs(15)));
        assert_eq!(description.headline, "The wallet bridge did not respond in time.");
        assert_eq!(description.technical.as_deref(), Some("no response within 15s"));
    }

    #[test]
    fn error_data_lands_in_the_technical_line() {
        let description = describe_rpc_error(
            &BridgeErrorCode::ExecutionReverted,
            "execution reverted",
            Some(&json!({ "txHash": "0xfeed" })),
        );
        let technical = description.technical.expect("technical detail");
        assert!(technical.contains("EXECUTION_REVERTED: execution reverted"));
        assert!(technical.contains("0xfeed"));
    }
}
