//! RPC error types.

use serde_json::Value;
use thiserror::Error;

/// Daemon error code for a wallet that needs `unlock` before it can sign.
pub const ERR_WALLET_LOCKED: i64 = -13;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error calling `{method}`: {source}")]
    Http {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url} calling `{method}`: {body}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("authentication failed for {url}")]
    AuthFailed { url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code} calling `{method}`: {message}")]
    Rpc {
        code: i64,
        message: String,
        method: String,
    },

    #[error("no result in response to `{0}`")]
    NoResult(String),

    #[error("wallet is locked")]
    WalletLocked,

    #[error("pubkey required for `{address}`")]
    PubkeyRequired { address: String },
}

/// Classify a JSON-RPC error object into an `RpcError`.
///
/// The wallet daemon reports a locked wallet with code -13 (or a message
/// naming the condition), and a missing pubkey with the address either in
/// the error data or spelled out in the message.
pub fn classify(code: i64, message: String, data: Option<Value>, method: &str) -> RpcError {
    if code == ERR_WALLET_LOCKED || message.to_lowercase().contains("wallet is locked") {
        return RpcError::WalletLocked;
    }

    if let Some(address) = data
        .as_ref()
        .and_then(|d| d.get("address"))
        .and_then(Value::as_str)
    {
        return RpcError::PubkeyRequired {
            address: address.to_string(),
        };
    }
    if let Some(rest) = message.strip_prefix("pubkey required for ") {
        return RpcError::PubkeyRequired {
            address: rest.trim().trim_matches('`').to_string(),
        };
    }

    RpcError::Rpc {
        code,
        message,
        method: method.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_locked_by_code() {
        let err = classify(ERR_WALLET_LOCKED, "Error: please unlock first".into(), None, "send");
        assert!(matches!(err, RpcError::WalletLocked));
    }

    #[test]
    fn test_classify_locked_by_message() {
        let err = classify(-32000, "The wallet is locked".into(), None, "send");
        assert!(matches!(err, RpcError::WalletLocked));
    }

    #[test]
    fn test_classify_pubkey_from_data() {
        let data = serde_json::json!({ "address": "1BoatSLRHtKNngkdXEeobR76b53LETtpyT" });
        let err = classify(-32001, "missing pubkey".into(), Some(data), "create_send");
        match err {
            RpcError::PubkeyRequired { address } => {
                assert_eq!(address, "1BoatSLRHtKNngkdXEeobR76b53LETtpyT");
            }
            other => panic!("expected PubkeyRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_pubkey_from_message() {
        let err = classify(
            -32001,
            "pubkey required for `1BoatSLRHtKNngkdXEeobR76b53LETtpyT`".into(),
            None,
            "create_send",
        );
        match err {
            RpcError::PubkeyRequired { address } => {
                assert_eq!(address, "1BoatSLRHtKNngkdXEeobR76b53LETtpyT");
            }
            other => panic!("expected PubkeyRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_other() {
        let err = classify(-32601, "method not found".into(), None, "bogus");
        match err {
            RpcError::Rpc { code, message, method } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
                assert_eq!(method, "bogus");
            }
            other => panic!("expected Rpc, got {:?}", other),
        }
    }
}
