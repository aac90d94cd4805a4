//! Synchronous user-prompt abstraction.
//!
//! The daemon occasionally needs something only the user can supply mid-call
//! (a passphrase, a pubkey for an address it has never seen). Those flows are
//! modal by contract: the implementation blocks until the user responds, and
//! there is no timeout on user input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The input channel is gone (stdin closed, terminal detached).
    #[error("input unavailable: {0}")]
    Unavailable(String),
}

/// Blocking user-interaction surface.
pub trait UserPrompt {
    /// Ask for a plaintext value.
    fn input(&self, message: &str) -> Result<String, PromptError>;

    /// Ask for a masked value (passphrase, private key).
    fn secret(&self, message: &str) -> Result<String, PromptError>;

    /// Show a blocking, user-visible notification.
    fn alert(&self, message: &str);
}

/// Resolve key material for an address by asking the user.
///
/// Contract: synchronous `(address) -> string`, invoked mid-call when a
/// method needs a public key (hex) or a private key (WIF).
pub fn resolve_key(prompt: &dyn UserPrompt, address: &str) -> Result<String, PromptError> {
    prompt.input(&format!(
        "Public keys (hexadecimal) or private key (WIF) for `{}`: ",
        address
    ))
}
