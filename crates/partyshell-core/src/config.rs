//! Shell configuration.
//!
//! Connection settings for the daemon and the wallet backend, the poll
//! interval, and the plugin list. Stored as TOML under the platform config
//! directory; a missing file is written with defaults on first run. The
//! on-disk format is an implementation detail, not a public contract.

use crate::error::ShellError;
use partyshell_rpc::RpcConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Daemon connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub ssl: bool,
    pub ssl_verify: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: partyshell_rpc::ports::DAEMON_MAINNET,
            user: "rpc".to_string(),
            password: String::new(),
            ssl: false,
            ssl_verify: false,
        }
    }
}

/// Wallet backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Wallet backend name (e.g. `core`).
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub ssl: bool,
    pub ssl_verify: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            name: "core".to_string(),
            host: "localhost".to_string(),
            port: 8332,
            user: "rpc".to_string(),
            password: String::new(),
            ssl: false,
            ssl_verify: false,
        }
    }
}

/// Full shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub daemon: DaemonConfig,
    pub wallet: WalletConfig,
    /// Poll interval, in milliseconds.
    pub poll_interval_ms: u64,
    /// RPC request timeout, in seconds.
    pub request_timeout_secs: u64,
    pub testnet: bool,
    /// UI plugins to load, in menu order.
    pub plugins: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            wallet: WalletConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: 30,
            testnet: false,
            plugins: vec!["send".to_string()],
        }
    }
}

impl ShellConfig {
    /// Default config file location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("partyshell")
            .join("client.toml")
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ShellError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ShellError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ShellError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| ShellError::Config(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load the file, or write defaults if it does not exist yet.
    /// Returns the config and whether the file had to be created.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool), ShellError> {
        if path.exists() {
            Ok((Self::load(path)?, false))
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok((config, true))
        }
    }

    /// Daemon base URL.
    pub fn daemon_url(&self) -> String {
        let scheme = if self.daemon.ssl { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.daemon.host, self.daemon.port)
    }

    /// Poll interval, floored to 1 ms so a zero in the file cannot produce
    /// a zero-period timer.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// RPC client configuration for the daemon connection.
    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.daemon_url(),
            username: if self.daemon.user.is_empty() {
                None
            } else {
                Some(self.daemon.user.clone())
            },
            password: if self.daemon.password.is_empty() {
                None
            } else {
                Some(self.daemon.password.clone())
            },
            timeout: Duration::from_secs(self.request_timeout_secs),
            accept_invalid_certs: self.daemon.ssl && !self.daemon.ssl_verify,
        }
    }
}
