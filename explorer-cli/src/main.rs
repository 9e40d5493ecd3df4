//! Explorer CLI
//!
//! Runs the API server or resolves a single search from the terminal.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use explorer_api::{ApiConfig, ApiServer, AppState, DEFAULT_PORT};
use explorer_cache::{Resolution, ResolutionSource};
use explorer_core::types::{LookupKey, ResourceKind};

/// Explorer - cached location data aggregator
#[derive(Parser)]
#[command(name = "explorer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Record store: a file path, ":memory:", or a libsql:// URL
    #[arg(long, global = true, env = "DATABASE_URL")]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Resolve a search, then one location-dependent kind
    Lookup {
        /// Free-text search (e.g. "seattle")
        search: String,
        /// Kind to resolve for the location (weather, events, movies, yelp, trails)
        #[arg(short, long)]
        kind: Option<ResourceKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "explorer=debug,info"
    } else {
        "explorer=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ApiConfig::from_env().context("Invalid environment configuration")?;
    if let Some(db) = cli.db {
        config.store.url = db;
    }

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(config, port, &bind).await,
        Commands::Lookup { search, kind } => cmd_lookup(config, &search, kind).await,
    }
}

/// Run API server
async fn cmd_serve(mut config: ApiConfig, port: u16, bind: &str) -> Result<()> {
    println!("{}", "Starting Explorer API server...".cyan().bold());
    println!("   {} {}", "Store:".dimmed(), config.store.url);
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!("\n   Press Ctrl+C to stop.\n");

    config.port = port;
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let server = ApiServer::open(config)
        .await
        .context("Failed to open the record store")?;
    server.run(addr).await?;

    Ok(())
}

/// Resolve a search and optionally one dependent kind
async fn cmd_lookup(config: ApiConfig, search: &str, kind: Option<ResourceKind>) -> Result<()> {
    if kind.is_some_and(|k| k.is_location()) {
        bail!("--kind must be a location-dependent kind");
    }

    let state = AppState::open(config)
        .await
        .context("Failed to open the record store")?;
    let orchestrator = &state.orchestrator;

    println!("{} {}", "Resolving:".cyan().bold(), search);
    let location = orchestrator
        .resolve(ResourceKind::Location, &LookupKey::search(search))
        .await
        .context("Location lookup failed")?;
    print_resolution(&location)?;

    if let Some(kind) = kind {
        let Some(location_ref) = location.location_ref() else {
            println!("\n{}", "No location found; nothing to look up.".yellow());
            return Ok(());
        };

        println!("\n{} {}", "Resolving:".cyan().bold(), kind);
        let resolution = orchestrator
            .resolve(kind, &LookupKey::location(location_ref))
            .await
            .with_context(|| format!("{} lookup failed", kind))?;
        print_resolution(&resolution)?;
    }

    orchestrator.close().await.context("Failed to close the record store")?;
    Ok(())
}

fn print_resolution(resolution: &Resolution) -> Result<()> {
    let source = match resolution.source {
        ResolutionSource::Cache => "cache".green(),
        ResolutionSource::Upstream => "upstream".yellow(),
        ResolutionSource::NoData => "no data".red(),
    };
    println!(
        "   {} {} ({} record(s))",
        "Source:".dimmed(),
        source,
        resolution.records.len()
    );
    println!("{}", serde_json::to_string_pretty(&resolution.records)?);
    Ok(())
}
