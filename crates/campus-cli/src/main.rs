//! campus - a command-line client for the academic-records API.
//!
//! Each invocation restores the persisted session, admits the requested
//! route through the navigation guard, and only then talks to the API.

mod commands;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campus_core::{Config, Portal};
use commands::{Action, ResourceKind};

/// Log file name inside the cache directory
const LOG_FILE: &str = "campus.log";

#[derive(Parser)]
#[command(name = "campus", version, about = "Academic records from the command line")]
struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Remember the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },
    /// Clear the session
    Logout {
        /// Also remove the remembered password for this account
        #[arg(long)]
        forget: bool,
    },
    /// Show the logged-in identity
    Whoami,
    /// Check whether a route is reachable with the current session
    Open { path: String },
    /// List a collection
    List { resource: ResourceKind },
    /// Show one record
    Show { resource: ResourceKind, id: i64 },
    /// Create a record from a JSON object
    Create {
        resource: ResourceKind,
        #[arg(long)]
        data: String,
    },
    /// Change the given fields of a record
    Update {
        resource: ResourceKind,
        id: i64,
        #[arg(long)]
        data: String,
    },
    /// Delete a record
    Delete { resource: ResourceKind, id: i64 },
    /// Student and teacher totals
    Stats,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut guard = None;
    let file_layer = match config.log_file.then(|| config.cache_dir()) {
        Some(Ok(dir)) if std::fs::create_dir_all(&dir).is_ok() => {
            let (writer, worker) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
            guard = Some(worker);
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (mut config, load_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let _log_guard = init_tracing(&config);
    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let mut portal = Portal::new(config)?;
    portal.start();
    info!(authenticated = portal.session().is_authenticated(), "campus starting");

    match cli.command {
        Command::Login { email, remember } => commands::login(&mut portal, email, remember).await,
        Command::Logout { forget } => {
            commands::logout(&mut portal, forget);
            Ok(())
        }
        Command::Whoami => {
            commands::whoami(&portal);
            Ok(())
        }
        Command::Open { path } => {
            commands::open(&portal, &path);
            Ok(())
        }
        Command::List { resource } => commands::resource(&portal, resource, Action::List).await,
        Command::Show { resource, id } => {
            commands::resource(&portal, resource, Action::Show(id)).await
        }
        Command::Create { resource, data } => {
            commands::resource(&portal, resource, Action::Create(data)).await
        }
        Command::Update { resource, id, data } => {
            commands::resource(&portal, resource, Action::Update(id, data)).await
        }
        Command::Delete { resource, id } => {
            commands::resource(&portal, resource, Action::Delete(id)).await
        }
        Command::Stats => commands::stats(&portal).await,
    }
}
