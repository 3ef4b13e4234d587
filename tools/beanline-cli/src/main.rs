//! Beanline CLI - Run and inspect the storefront content sync engine.
//!
//! Commands:
//! - `beanline watch` - Initialise the engine and follow its refreshes
//! - `beanline fetch` - Load one domain (or all) and print the payload
//! - `beanline cache` - Load all domains and list the cache entries
//! - `beanline config` - Show or create configuration

mod commands;
mod context;
mod output;
mod sink;

use anyhow::Result;
use beanline_observability::{init_logging, LogConfig, LogFormat, LogLevel};
use clap::{Parser, Subcommand};

use commands::{CacheArgs, ConfigArgs, FetchArgs, WatchArgs};

/// Beanline CLI - Keep storefront content in sync with the backend API
#[derive(Parser)]
#[command(name = "beanline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialise the engine and keep refreshing
    Watch(WatchArgs),

    /// Load a content domain once and print it
    Fetch(FetchArgs),

    /// Load every domain and list the cache
    Cache(CacheArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let format = if cli.json { LogFormat::Json } else { LogFormat::Human };
    init_logging(&LogConfig::new(level, format));

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.api_base_url.as_deref(), output)?;

    let result = match cli.command {
        Commands::Watch(args) => commands::watch::run(args, &ctx).await,
        Commands::Fetch(args) => commands::fetch::run(args, &ctx).await,
        Commands::Cache(args) => commands::cache::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
