//! Nexx - send CRUD notifications to the Nexx video management API

mod logging;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use nexx_core::config::NexxConfig;
use nexx_notify::{Command, EntityKind, NotificationDispatcher, NotificationResult, Values};
use tracing::{debug, warn};

use crate::output::StderrNotices;

#[derive(Parser, Debug)]
#[command(name = "nexx")]
#[command(author = "Nexx Integration Team")]
#[command(version = nexx_core::VERSION)]
#[command(about = "Notify the Nexx video CMS about entity changes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NEXX_CONFIG")]
    config: Option<PathBuf>,

    /// API base URL (must end with a slash)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Installation (omnia) ID
    #[arg(long, global = true)]
    installation_id: Option<String>,

    /// Installation code sent as X-Request-CID
    #[arg(long, global = true)]
    auth_key: Option<String>,

    /// Shared API secret
    #[arg(long, global = true)]
    shared_secret: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Notify that an entity was created
    Insert(NotifyArgs),

    /// Notify that an entity was updated
    Update(NotifyArgs),

    /// Notify that an entity was deleted
    Delete(NotifyArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct NotifyArgs {
    /// Entity kind: actor, channel, tag or video
    kind: EntityKind,

    /// Reference ID (remote ID for videos, local ID otherwise)
    reference_id: String,

    /// Value sent along as a request header, as key=value
    #[arg(short = 'v', long = "value", value_parser = parse_value)]
    values: Vec<(String, String)>,
}

fn parse_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {:?}", raw));
    }

    Ok((key.to_string(), value.to_string()))
}

/// File or environment config, then command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<NexxConfig> {
    let mut config = match &cli.config {
        Some(path) => NexxConfig::from_file(path)?,
        None => NexxConfig::from_env(),
    };

    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(id) = &cli.installation_id {
        config.api.installation_id = id.clone();
    }
    if let Some(key) = &cli.auth_key {
        config.api.auth_key = key.clone();
    }
    if let Some(secret) = &cli.shared_secret {
        config.api.shared_secret = secret.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    Ok(config)
}

/// Process exit code for a finished dispatch. The outcome has already been
/// printed, so failures only change the status.
fn exit_code(result: &NotificationResult) -> i32 {
    if result.is_success() {
        0
    } else {
        1
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    logging::init(&config.logging)?;

    let (command, args) = match cli.command {
        Commands::Version => {
            println!("nexx {}", nexx_core::VERSION);
            return Ok(());
        }
        Commands::Insert(args) => (Command::Insert, args),
        Commands::Update(args) => (Command::Update, args),
        Commands::Delete(args) => (Command::Delete, args),
    };

    debug!(api = ?config.api, "Loaded configuration");
    if let Err(e) = config.api.validate() {
        warn!(error = %e, "Configuration check failed");
    }

    let dispatcher = NotificationDispatcher::new(config.api, &config.http)?
        .with_notices(Arc::new(StderrNotices));

    let values: Values = args.values.into_iter().collect();
    let result = match command {
        Command::Insert => dispatcher.insert(args.kind, args.reference_id, values).await?,
        Command::Update => dispatcher.update(args.kind, args.reference_id, values).await?,
        Command::Delete => dispatcher.delete(args.kind, args.reference_id, values).await?,
    };

    output::print_result(&result)?;

    match exit_code(&result) {
        0 => Ok(()),
        code => std::process::exit(code),
    }
}
