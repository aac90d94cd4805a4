//! Shell error types.

use crate::prompt::PromptError;
use partyshell_rpc::RpcError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    /// A poll failed before any plugin had loaded. Ends the session so the
    /// configuration flow can reopen.
    #[error("startup failed: {0}")]
    Startup(String),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Fatal user-facing call failure, including a failed unlock retry.
    /// Aborts the triggering operation only, never the whole session.
    #[error("{0}")]
    Gateway(String),

    #[error("malformed daemon response: {0}")]
    Response(String),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
