//! silent-token-ctl - Diagnostic utility for silent token acquisition.
//!
//! This utility allows you to:
//! - Run one silent acquisition against a JSON cache snapshot
//! - List the identity keys stored in a snapshot
//!
//! # Usage
//!
//! ```bash
//! # Acquire a token for a user by username
//! silent-token-ctl acquire --cache snapshot.json \
//!     --authority https://login.example.com/contoso \
//!     --resource https://graph.example.com \
//!     --client-id client-1 \
//!     --displayable-id alice@contoso.com
//!
//! # Same request through the desktop policy with a forced prompt
//! silent-token-ctl acquire --cache snapshot.json ... --prompt always
//!
//! # List snapshot keys
//! silent-token-ctl keys --cache snapshot.json
//! ```

mod snapshot;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use silent_token_core::{
    CachedTokenResult, ClientCredential, Config, PromptBehavior, SilentAcquisition,
    SilentRequestContext, UserIdentifier,
};
use silent_token_platform::policy_for;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::snapshot::{unix_seconds, Snapshot};

/// Diagnostic utility for silent token acquisition.
#[derive(Parser)]
#[command(name = "silent-token-ctl")]
#[command(about = "Run silent token acquisition against a cache snapshot")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire a cached token without user interaction
    Acquire(AcquireArgs),

    /// List identity keys stored in a snapshot
    #[command(alias = "ls")]
    Keys {
        /// Path to the JSON cache snapshot
        #[arg(long, value_name = "PATH")]
        cache: PathBuf,
    },
}

#[derive(Args)]
struct AcquireArgs {
    /// Path to the JSON cache snapshot
    #[arg(long, value_name = "PATH")]
    cache: PathBuf,

    /// Path to config file [default: ~/.config/silent-token/config.toml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    authority: String,

    #[arg(long)]
    resource: String,

    #[arg(long)]
    client_id: String,

    /// Request on behalf of a confidential client
    #[arg(long)]
    confidential: bool,

    /// Identify the user by unique id
    #[arg(long, conflicts_with = "displayable_id")]
    unique_id: Option<String>,

    /// Identify the user by username
    #[arg(long)]
    displayable_id: Option<String>,

    /// Prompt behavior of a request sharing the interactive path
    /// (auto, always, never, refresh_session, select_account)
    #[arg(long, value_name = "PROMPT")]
    prompt: Option<PromptBehavior>,
}

impl AcquireArgs {
    fn user(&self) -> Option<UserIdentifier> {
        match (&self.unique_id, &self.displayable_id) {
            (Some(id), _) => Some(UserIdentifier::unique(id.as_str())),
            (None, Some(id)) => Some(UserIdentifier::displayable(id.as_str())),
            (None, None) => None,
        }
    }

    fn context(&self) -> SilentRequestContext {
        let credential = if self.confidential {
            ClientCredential::Confidential
        } else {
            ClientCredential::Public
        };
        let ctx = SilentRequestContext::new(
            self.authority.as_str(),
            self.resource.as_str(),
            self.client_id.as_str(),
            credential,
            self.user(),
        );
        match self.prompt {
            Some(prompt) => ctx.with_prompt_behavior(prompt),
            None => ctx,
        }
    }
}

fn setup_logging(level: &str) {
    // RUST_LOG takes precedence over CLI flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from specified path");
            Config::load_from(path).context("Failed to load configuration")
        }
        None => {
            let config = Config::load().context("Failed to load configuration")?;
            if !Config::default_path().is_some_and(|path| path.exists()) {
                debug!("No config file found, using defaults");
            }
            Ok(config)
        }
    }
}

/// Format a remaining lifetime as human-readable string.
fn format_ttl(remaining: Option<Duration>) -> String {
    match remaining.map(|d| d.as_secs()) {
        None => "expired".to_string(),
        Some(s) if s < 60 => format!("{}s", s),
        Some(s) if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        Some(s) => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

/// Describe a returned token without exposing any secret.
fn describe(result: &CachedTokenResult, now: SystemTime, margin: Duration) -> String {
    let refresh = if result.needs_refresh(now, margin) {
        "refresh required"
    } else if result.is_expired_at(now, margin) {
        "expired, no refresh token"
    } else if result.has_refresh_token() {
        "available"
    } else {
        "none"
    };

    let mut lines = vec![
        format!("key:        {}", result.key()),
        format!("subject:    {}", result.key().subject_type()),
        format!(
            "expires:    {} ({})",
            unix_seconds(result.expires_on()),
            format_ttl(result.expires_in(now))
        ),
        format!("refresh:    {}", refresh),
    ];
    if let Some(tenant_id) = result.tenant_id() {
        lines.push(format!("tenant:     {}", tenant_id));
    }
    if result.is_multiple_resource_refresh_token() {
        lines.push("multi-resource refresh token".to_string());
    }
    lines.join("\n")
}

/// Handle the acquire command.
async fn cmd_acquire(args: AcquireArgs) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let cache = Snapshot::load(&args.cache)?.into_cache(&config.cache)?;
    debug!(records = cache.len(), "Loaded cache snapshot");

    let silent = SilentAcquisition::with_policy(cache, policy_for(config.policy.platform))
        .with_expiration_margin(config.cache.expiration_margin());
    let ctx = args.context();

    match silent.acquire_silently(&ctx).await {
        Ok(result) => {
            println!("Token found.");
            println!(
                "{}",
                describe(&result, SystemTime::now(), config.cache.expiration_margin())
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error ({}): {}", e.code(), e);
            if e.requires_interaction() {
                eprintln!("Interactive sign-in required.");
            } else if e.is_retryable() {
                eprintln!("The cache could not be read; retry later.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Handle the keys command.
fn cmd_keys(path: &Path) -> Result<ExitCode> {
    let cache = Snapshot::load(path)?.into_cache(&Config::default().cache)?;

    if cache.is_empty() {
        println!("No cached tokens.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut keys: Vec<String> = cache
        .keys()
        .map(|key| format!("{:016x}  {:<16} {}", key.stable_hash(), key.subject_type().to_string(), key))
        .collect();
    keys.sort();

    for line in keys {
        println!("{}", line);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    setup_logging(log_level);

    let result = match cli.command {
        Commands::Acquire(args) => cmd_acquire(args).await,
        Commands::Keys { cache } => cmd_keys(&cache),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
