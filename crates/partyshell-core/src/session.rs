//! Application session.
//!
//! One explicit structure owns everything the shell used to keep as ambient
//! state: the configuration, the gateway, and the status loop with its
//! plugin registry. Built once at startup, torn down at process exit;
//! reconfiguration builds a fresh session.

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::gateway::{Gateway, RpcRequest, Transport};
use crate::plugin::{PluginFactory, PluginRegistry};
use crate::prompt::UserPrompt;
use crate::status::{ServerStatus, StatusLoop};
use partyshell_rpc::DaemonRpc;
use serde_json::Value;

pub struct Session<T: Transport> {
    config: ShellConfig,
    status: StatusLoop<T>,
}

impl Session<DaemonRpc> {
    /// Open a session against the configured daemon.
    pub fn open(config: ShellConfig, prompt: Box<dyn UserPrompt>) -> Result<Self, ShellError> {
        if config.daemon.host.is_empty() {
            return Err(ShellError::Config("daemon host is not set".into()));
        }
        let daemon = DaemonRpc::with_config(config.rpc_config());
        Ok(Self::with_transport(config, daemon, prompt))
    }
}

impl<T: Transport> Session<T> {
    /// Build a session over an arbitrary transport.
    pub fn with_transport(config: ShellConfig, transport: T, prompt: Box<dyn UserPrompt>) -> Self {
        let gateway = Gateway::new(transport, prompt);
        let poll_interval = config.poll_interval();
        Self {
            config,
            status: StatusLoop::new(gateway, PluginRegistry::new(), poll_interval),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn status_loop(&self) -> &StatusLoop<T> {
        &self.status
    }

    pub fn status_loop_mut(&mut self) -> &mut StatusLoop<T> {
        &mut self.status
    }

    /// Run the status loop for the rest of the process lifetime.
    pub async fn run(&mut self, factory: &dyn PluginFactory) -> Result<(), ShellError> {
        let names = self.config.plugins.clone();
        self.status.run(&names, factory).await
    }

    /// One poll cycle, for the one-shot status command.
    pub async fn poll_once(&mut self) -> Result<ServerStatus, ShellError> {
        self.status.tick().await
    }

    /// Forward one request through the gateway.
    pub async fn call(&self, request: &RpcRequest) -> Result<Value, ShellError> {
        self.status.gateway().call(request).await
    }
}
