use clap::{Parser, Subcommand};
use env_logger::Env;
use partyshell_core::ShellConfig;
use std::path::PathBuf;

mod commands;
mod plugins;

/// Terminal shell for a wallet daemon.
#[derive(Parser)]
#[command(name = "partyshell")]
#[command(about = "Terminal front-end for a wallet daemon")]
#[command(version)]
struct Cli {
    /// Location of the configuration file.
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Daemon URL override (e.g. http://localhost:4120).
    #[arg(long)]
    daemon: Option<String>,

    /// Poll interval override, in milliseconds.
    #[arg(long)]
    poll_interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the shell: status loop plus plugin hosting (default).
    Run,

    /// Poll the daemon once and print the status line.
    Status,

    /// Forward one method call through the gateway and print the result.
    Call {
        /// Method name, forwarded opaquely to the daemon.
        method: String,

        /// Params as a JSON mapping or sequence.
        #[arg(default_value = "{}")]
        params: String,
    },

    /// Interactive configuration wizard.
    Configure,
}

/// Split a daemon URL override into (ssl, host, port).
fn parse_daemon_url(url: &str) -> Result<(bool, String, u16), String> {
    let (ssl, rest) = if let Some(rest) = url.strip_prefix("https://") {
        (true, rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        (false, rest)
    } else {
        (false, url)
    };

    let rest = rest.trim_end_matches('/');
    let default_port = if ssl { 443 } else { partyshell_rpc::ports::DAEMON_MAINNET };

    // IPv6 literals keep their brackets so daemon_url() re-forms a valid URL.
    let (host, port) = if let Some(inner) = rest.strip_prefix('[') {
        let (addr, tail) = inner
            .split_once(']')
            .ok_or_else(|| format!("invalid daemon URL `{}`", url))?;
        let port = match tail.strip_prefix(':') {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| format!("invalid port in `{}`", url))?,
            None if tail.is_empty() => default_port,
            None => return Err(format!("invalid daemon URL `{}`", url)),
        };
        (format!("[{}]", addr), port)
    } else {
        match rest.rsplit_once(':') {
            Some((host, port)) => (
                host.to_string(),
                port.parse::<u16>()
                    .map_err(|_| format!("invalid port in `{}`", url))?,
            ),
            None => (rest.to_string(), default_port),
        }
    };

    if host.is_empty() || host == "[]" {
        return Err(format!("invalid daemon URL `{}`", url));
    }
    Ok((ssl, host, port))
}

fn apply_overrides(config: &mut ShellConfig, cli: &Cli) -> Result<(), String> {
    if let Some(url) = &cli.daemon {
        let (ssl, host, port) = parse_daemon_url(url)?;
        config.daemon.ssl = ssl;
        config.daemon.host = host;
        config.daemon.port = port;
    }
    if let Some(ms) = cli.poll_interval {
        config.poll_interval_ms = ms;
    }
    Ok(())
}

/// Status-line summaries are logged at `info`; that must be the floor so
/// `run` displays them without the user setting RUST_LOG.
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init_from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER));
    let cli = Cli::parse();

    let config_path = cli
        .config_file
        .clone()
        .unwrap_or_else(ShellConfig::default_path);

    let result = dispatch(&cli, &config_path).await;
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn dispatch(
    cli: &Cli,
    config_path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Some(Commands::Configure)) {
        return commands::configure(config_path);
    }

    let (mut config, created) = ShellConfig::load_or_create(config_path)?;
    if created {
        // First run: walk through the wizard before touching the daemon.
        commands::configure(config_path)?;
        config = ShellConfig::load(config_path)?;
    }
    apply_overrides(&mut config, cli)?;

    match &cli.command {
        None | Some(Commands::Run) => commands::run(config, config_path).await,
        Some(Commands::Status) => commands::status(config).await,
        Some(Commands::Call { method, params }) => commands::call(config, method, params).await,
        Some(Commands::Configure) => unreachable!("handled above"),
    }
}
