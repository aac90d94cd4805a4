//! Daemon RPC surface.
//!
//! Typed async wrappers for the methods the shell depends on directly
//! (`get_running_info`, `wallet_last_block`, `unlock`); everything else is
//! forwarded opaquely through `call()`.

use crate::client::{RpcClient, RpcConfig};
use crate::error::RpcError;
use serde::Deserialize;
use serde_json::Value;

/// Last block seen by the server, from `get_running_info`.
#[derive(Debug, Clone, Deserialize)]
pub struct LastBlock {
    pub block_index: u64,
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Catch-all for additional fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Daemon `get_running_info` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RunningInfo {
    pub last_block: LastBlock,
    #[serde(default)]
    pub db_caught_up: bool,
    #[serde(default)]
    pub version_major: Option<u64>,
    #[serde(default)]
    pub version_minor: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Typed client for the wallet daemon.
pub struct DaemonRpc {
    client: RpcClient,
}

impl DaemonRpc {
    /// Create a daemon client connected to the given URL.
    pub fn new(url: &str) -> Self {
        Self {
            client: RpcClient::new(url),
        }
    }

    /// Create with full configuration.
    pub fn with_config(config: RpcConfig) -> Self {
        Self {
            client: RpcClient::with_config(config),
        }
    }

    /// Get the underlying RPC client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Server liveness and chain-height snapshot.
    pub async fn get_running_info(&self) -> Result<RunningInfo, RpcError> {
        let val = self
            .client
            .call("get_running_info", serde_json::json!({}))
            .await?;
        Ok(serde_json::from_value(val)?)
    }

    /// Last block index the wallet has seen.
    pub async fn wallet_last_block(&self) -> Result<u64, RpcError> {
        let val = self
            .client
            .call("wallet_last_block", serde_json::json!({}))
            .await?;
        val.as_u64()
            .ok_or_else(|| RpcError::NoResult("wallet_last_block".to_string()))
    }

    /// Unlock the wallet with a passphrase.
    pub async fn unlock(&self, passphrase: &str) -> Result<(), RpcError> {
        self.client
            .call("unlock", serde_json::json!({ "passphrase": passphrase }))
            .await?;
        Ok(())
    }

    /// Forward an arbitrary method to the daemon.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.client.call(method, params).await
    }
}
