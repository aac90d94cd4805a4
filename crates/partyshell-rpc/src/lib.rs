//! RPC client library for the partyshell wallet front-end.
//!
//! Provides an async HTTP client for the wallet daemon's JSON-RPC 2.0
//! interface, typed wrappers for the methods the shell itself depends on,
//! and opaque forwarding for everything else.
//!
//! # Example
//!
//! ```ignore
//! use partyshell_rpc::DaemonRpc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let daemon = DaemonRpc::new("http://localhost:4120");
//!     let info = daemon.get_running_info().await.unwrap();
//!     println!("Server height: {}", info.last_block.block_index);
//! }
//! ```

pub mod error;
pub mod client;
pub mod daemon;

pub use client::{RpcClient, RpcConfig};
pub use daemon::DaemonRpc;
pub use error::RpcError;

/// Default RPC ports.
pub mod ports {
    pub const DAEMON_MAINNET: u16 = 4120;
    pub const DAEMON_TESTNET: u16 = 14120;
}
