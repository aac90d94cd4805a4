//! RPC gateway.
//!
//! Single call-forwarding entry point between UI code and the wallet daemon.
//! Coerces quantity params to integers, resolves locked-wallet and
//! missing-pubkey conditions interactively, surfaces every failure to the
//! user, and normalizes decimal results to fixed-point strings so callers
//! never see binary floating point for currency amounts.

use crate::error::ShellError;
use crate::prompt::{resolve_key, UserPrompt};
use partyshell_rpc::{DaemonRpc, RpcError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// Number of fractional digits in the daemon's native currency precision.
const CURRENCY_DECIMALS: usize = 8;

/// A forwarded RPC request: method name plus a params mapping or sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Daemon abstraction the gateway dispatches through.
///
/// The concrete impl is [`DaemonRpc`]; tests script failures through a mock.
pub trait Transport {
    fn call(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, RpcError>>;
}

impl Transport for DaemonRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        DaemonRpc::call(self, method, params).await
    }
}

/// Call-forwarding gateway to the wallet daemon.
pub struct Gateway<T: Transport> {
    transport: T,
    prompt: Box<dyn UserPrompt>,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, prompt: Box<dyn UserPrompt>) -> Self {
        Self { transport, prompt }
    }

    /// Forward a request and return its structured result.
    ///
    /// A locked wallet triggers one passphrase prompt, one `unlock`, and one
    /// retry of the original request; a failed unlock is fatal for the
    /// operation. All failures are alerted to the user before returning.
    pub async fn call(&self, request: &RpcRequest) -> Result<Value, ShellError> {
        let params = coerce_quantities(request.params.clone());

        let result = match self.dispatch(&request.method, &params).await {
            Ok(value) => value,
            Err(ShellError::Rpc(RpcError::WalletLocked)) => {
                self.unlock_and_retry(&request.method, &params).await?
            }
            Err(e) => {
                self.prompt.alert(&e.to_string());
                return Err(e);
            }
        };

        Ok(format_decimals(result))
    }

    /// Same computation as [`call`](Self::call), rendered as a JSON string
    /// for a UI scripting context.
    pub async fn call_script(&self, request: &RpcRequest) -> Result<String, ShellError> {
        let value = self.call(request).await?;
        serde_json::to_string(&value).map_err(|e| ShellError::Response(e.to_string()))
    }

    /// Dispatch one call, resolving a missing-pubkey condition interactively
    /// with a single retry.
    async fn dispatch(&self, method: &str, params: &Value) -> Result<Value, ShellError> {
        match self.transport.call(method, params.clone()).await {
            Err(RpcError::PubkeyRequired { address }) => {
                let key = resolve_key(self.prompt.as_ref(), &address)?;
                let mut retry_params = params.clone();
                if let Value::Object(map) = &mut retry_params {
                    map.insert("pubkey".to_string(), Value::String(key));
                }
                self.transport
                    .call(method, retry_params)
                    .await
                    .map_err(ShellError::from)
            }
            other => other.map_err(ShellError::from),
        }
    }

    /// One-shot locked-wallet recovery: passphrase prompt, `unlock`, retry
    /// the original request exactly once. Never loops.
    async fn unlock_and_retry(&self, method: &str, params: &Value) -> Result<Value, ShellError> {
        let passphrase = self.prompt.secret("Enter your wallet passphrase: ")?;

        if let Err(e) = self
            .transport
            .call("unlock", serde_json::json!({ "passphrase": passphrase }))
            .await
        {
            let message = e.to_string();
            self.prompt.alert(&message);
            return Err(ShellError::Gateway(message));
        }

        match self.dispatch(method, params).await {
            Ok(value) => Ok(value),
            Err(e) => {
                let message = e.to_string();
                self.prompt.alert(&message);
                Err(ShellError::Gateway(message))
            }
        }
    }
}

/// Coerce every top-level `quantity` param to a JSON integer, best effort.
///
/// The daemon rejects non-integer quantity fields, but UI scripting layers
/// hand them over as strings or floats. Values that cannot be read as an
/// integer are left unmodified; sequence params pass through untouched.
pub fn coerce_quantities(params: Value) -> Value {
    match params {
        Value::Object(mut map) => {
            for (key, value) in map.iter_mut() {
                if key == "quantity" {
                    if let Some(n) = as_integer(value) {
                        *value = Value::Number(n);
                    }
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

fn as_integer(value: &Value) -> Option<serde_json::Number> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<u64>() {
                return Some(n.into());
            }
            if let Ok(n) = s.parse::<i64>() {
                return Some(n.into());
            }
            // "12.0" style strings still name an integer quantity.
            s.parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
                .map(|f| serde_json::Number::from(f as i64))
        }
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0)
            .map(|f| serde_json::Number::from(f as i64)),
        _ => None,
    }
}

/// Recursively rewrite every non-integer number as a fixed-point string with
/// exactly 8 fractional digits. Integers are never rewritten.
pub fn format_decimals(value: Value) -> Value {
    match value {
        Value::Number(n) => {
            if n.is_f64() {
                let f = n.as_f64().unwrap_or(0.0);
                Value::String(format!("{:.*}", CURRENCY_DECIMALS, f))
            } else {
                Value::Number(n)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(format_decimals).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, format_decimals(v)))
                .collect(),
        ),
        other => other,
    }
}
