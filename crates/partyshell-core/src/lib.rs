//! Core of the partyshell wallet front-end.
//!
//! All domain logic lives in the external wallet daemon; this crate is the
//! glue around it: an RPC gateway that forwards UI calls and resolves
//! interactive conditions (locked wallet, missing pubkey), a status loop
//! that polls chain height and notifies plugins of new blocks, the plugin
//! registry, and the session/config plumbing that holds it together.

pub mod config;
pub mod error;
pub mod gateway;
pub mod plugin;
pub mod prompt;
pub mod session;
pub mod status;

pub use config::ShellConfig;
pub use error::ShellError;
pub use gateway::{Gateway, RpcRequest, Transport};
pub use plugin::{Menu, MenuItem, MessageHandler, Plugin, PluginFactory, PluginRegistry};
pub use prompt::{PromptError, UserPrompt};
pub use session::Session;
pub use status::{ServerStatus, StatusLoop};
