//! Status-polling loop.
//!
//! Polls server and wallet chain height on a fixed interval through the
//! gateway, logs a status summary, and notifies loaded plugins once per
//! observed server-height transition. Runs for the lifetime of the process.

use crate::error::ShellError;
use crate::gateway::{Gateway, RpcRequest, Transport};
use crate::plugin::{PluginRegistry, MSG_NEW_BLOCK};
use log::{debug, info};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Per-tick liveness snapshot. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    pub server_last_block: u64,
    pub wallet_last_block: u64,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Server Last Block: {} | Wallet Last Block: {}",
            self.server_last_block, self.wallet_last_block
        )
    }
}

/// Periodic poll of the daemon with block-transition fan-out to plugins.
pub struct StatusLoop<T: Transport> {
    gateway: Gateway<T>,
    registry: PluginRegistry,
    poll_interval: Duration,
    /// Server height seen on the previous tick. `None` until the first
    /// successful poll, so the first observation never emits an event.
    last_block: Option<u64>,
}

impl<T: Transport> StatusLoop<T> {
    pub fn new(gateway: Gateway<T>, registry: PluginRegistry, poll_interval: Duration) -> Self {
        Self {
            gateway,
            registry,
            poll_interval,
            last_block: None,
        }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Run one poll cycle.
    ///
    /// Only server-height changes trigger plugin notification; wallet lag
    /// does not. Errors before any plugin load are promoted to fatal startup
    /// failures; afterwards the caller is expected to swallow them (the
    /// gateway has already alerted the user).
    pub async fn tick(&mut self) -> Result<ServerStatus, ShellError> {
        let result = self.poll().await;
        match result {
            Ok(status) => Ok(status),
            Err(e) if !self.registry.is_loaded() => Err(ShellError::Startup(e.to_string())),
            Err(e) => Err(e),
        }
    }

    async fn poll(&mut self) -> Result<ServerStatus, ShellError> {
        let info = self
            .gateway
            .call(&RpcRequest::new("get_running_info", json!({})))
            .await?;
        let server_last_block = info
            .pointer("/last_block/block_index")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                ShellError::Response("get_running_info: missing last_block.block_index".into())
            })?;

        let wallet = self
            .gateway
            .call(&RpcRequest::new("wallet_last_block", json!({})))
            .await?;
        let wallet_last_block = wallet
            .as_u64()
            .ok_or_else(|| ShellError::Response("wallet_last_block: not an integer".into()))?;

        let status = ServerStatus {
            server_last_block,
            wallet_last_block,
        };
        info!("{}", status);

        if let Some(previous) = self.last_block {
            if previous != server_last_block {
                self.registry
                    .notify(MSG_NEW_BLOCK, &json!({ "block_index": server_last_block }));
            }
        }
        self.last_block = Some(server_last_block);

        Ok(status)
    }

    /// Run the loop until the process exits.
    ///
    /// The first poll is the startup gate: its failure ends the session so
    /// the configuration flow can reopen. On success the configured plugins
    /// are loaded, then the loop settles into its interval. Ticks execute
    /// sequentially and never overlap; later failures are swallowed and the
    /// next tick proceeds on schedule, with no backoff.
    pub async fn run(
        &mut self,
        plugin_names: &[String],
        factory: &dyn crate::plugin::PluginFactory,
    ) -> Result<(), ShellError> {
        self.tick().await?;
        self.registry.load(plugin_names, factory)?;

        // tokio panics on a zero period, and zero is reachable from config.
        let period = self.poll_interval.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick fires immediately; the startup poll
        // already covered it.
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = self.tick().await {
                debug!("status poll failed: {}", e);
            }
        }
    }
}
