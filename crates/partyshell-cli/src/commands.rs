//! CLI command implementations.

use crate::plugins::BuiltinPlugins;
use partyshell_core::{
    PromptError, RpcRequest, Session, ShellConfig, ShellError, UserPrompt,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

// ─── Prompt ─────────────────────────────────────────────────────────────────

/// Blocking terminal prompt: stdin for plaintext, rpassword for masked
/// input, stderr for alerts.
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn input(&self, message: &str) -> std::result::Result<String, PromptError> {
        eprint!("{}", message);
        let _ = io::stderr().flush();
        let mut line = String::new();
        let n = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PromptError::Unavailable(e.to_string()))?;
        if n == 0 {
            return Err(PromptError::Unavailable("stdin closed".into()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn secret(&self, message: &str) -> std::result::Result<String, PromptError> {
        rpassword::prompt_password(message).map_err(|e| PromptError::Unavailable(e.to_string()))
    }

    fn alert(&self, message: &str) {
        eprintln!("\n{}\n", message);
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

/// Run the shell until the process exits.
///
/// A failure on the very first poll ends the session and drops back into
/// the configuration wizard, mirroring the desktop shell's behavior.
pub async fn run(config: ShellConfig, config_path: &Path) -> Result {
    let mut session = Session::open(config, Box::new(TerminalPrompt))?;
    match session.run(&BuiltinPlugins).await {
        Err(ShellError::Startup(message)) => {
            eprintln!("Could not reach the daemon: {}", message);
            configure(config_path)?;
            Err(ShellError::Startup(message).into())
        }
        other => other.map_err(Into::into),
    }
}

/// One poll cycle, printed.
pub async fn status(config: ShellConfig) -> Result {
    let mut session = Session::open(config, Box::new(TerminalPrompt))?;
    let status = session.poll_once().await?;
    println!("{}", status);
    Ok(())
}

/// Forward a single method call through the gateway and print the result.
pub async fn call(config: ShellConfig, method: &str, params: &str) -> Result {
    let params: serde_json::Value =
        serde_json::from_str(params).map_err(|e| format!("invalid params JSON: {}", e))?;

    let session = Session::open(config, Box::new(TerminalPrompt))?;
    let result = session.call(&RpcRequest::new(method, params)).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

// ─── Configuration wizard ───────────────────────────────────────────────────

fn ask(prompt: &str, current: &str) -> std::result::Result<String, PromptError> {
    let answer = TerminalPrompt.input(&format!("{} [{}]: ", prompt, current))?;
    if answer.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(answer)
    }
}

fn ask_port(prompt: &str, current: u16) -> std::result::Result<u16, PromptError> {
    loop {
        let answer = ask(prompt, &current.to_string())?;
        match answer.parse::<u16>() {
            Ok(port) if port > 0 => return Ok(port),
            _ => eprintln!("Enter a port between 1 and 65535."),
        }
    }
}

fn ask_u64(prompt: &str, current: u64) -> std::result::Result<u64, PromptError> {
    loop {
        let answer = ask(prompt, &current.to_string())?;
        match answer.parse::<u64>() {
            Ok(value) => return Ok(value),
            _ => eprintln!("Enter a number."),
        }
    }
}

fn ask_yes_no(prompt: &str, current: bool) -> std::result::Result<bool, PromptError> {
    loop {
        let shown = if current { "y" } else { "n" };
        let answer = ask(&format!("{} (y/n)", prompt), shown)?;
        match answer.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("Answer y or n."),
        }
    }
}

fn ask_password(prompt: &str) -> std::result::Result<Option<String>, PromptError> {
    let answer = TerminalPrompt.secret(&format!("{} (empty keeps current): ", prompt))?;
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

/// Interactive configuration wizard. Walks every connection setting,
/// keeping the current value on empty input, and writes the file back.
pub fn configure(path: &Path) -> Result {
    let (mut config, created) = ShellConfig::load_or_create(path)?;
    if created {
        println!("Created {}", path.display());
    }
    println!("Configuration ({})", path.display());

    config.testnet = ask_yes_no("Use testnet network", config.testnet)?;
    if config.testnet && config.daemon.port == partyshell_rpc::ports::DAEMON_MAINNET {
        config.daemon.port = partyshell_rpc::ports::DAEMON_TESTNET;
    }

    println!("-- Daemon --");
    config.daemon.host = ask("Host", &config.daemon.host)?;
    config.daemon.port = ask_port("Port", config.daemon.port)?;
    config.daemon.user = ask("User", &config.daemon.user)?;
    if let Some(password) = ask_password("Password")? {
        config.daemon.password = password;
    }
    config.daemon.ssl = ask_yes_no("Use SSL", config.daemon.ssl)?;
    if config.daemon.ssl {
        config.daemon.ssl_verify = ask_yes_no("Verify SSL certificate", config.daemon.ssl_verify)?;
    }

    println!("-- Wallet --");
    config.wallet.name = ask("Wallet backend name", &config.wallet.name)?;
    config.wallet.host = ask("Host", &config.wallet.host)?;
    config.wallet.port = ask_port("Port", config.wallet.port)?;
    config.wallet.user = ask("User", &config.wallet.user)?;
    if let Some(password) = ask_password("Password")? {
        config.wallet.password = password;
    }
    config.wallet.ssl = ask_yes_no("Use SSL", config.wallet.ssl)?;
    if config.wallet.ssl {
        config.wallet.ssl_verify = ask_yes_no("Verify SSL certificate", config.wallet.ssl_verify)?;
    }

    println!("-- Shell --");
    config.poll_interval_ms = ask_u64("Poll interval (ms)", config.poll_interval_ms)?;
    let plugins = ask("Plugins (comma separated)", &config.plugins.join(","))?;
    config.plugins = plugins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    config.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
