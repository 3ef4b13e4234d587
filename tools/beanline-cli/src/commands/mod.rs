//! CLI command implementations.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod watch;

use anyhow::{Context as _, Result};
use beanline_sync::{ContentDomain, ContentSyncEngine, LoadOutcome, RefreshTarget};
use clap::{Args, Subcommand};

use crate::context::Context;
use crate::sink::ConsoleSink;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Stop after this many seconds instead of waiting for Ctrl-C.
    #[arg(long)]
    pub for_secs: Option<u64>,
}

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Domain to load: products, testimonials, activity, settings or all.
    #[arg(default_value = "all")]
    pub target: String,
}

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    /// Only load this domain before listing.
    #[arg(short, long)]
    pub domain: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default config file.
    Init {
        /// Where to write it.
        #[arg(short, long, default_value = "beanline.toml")]
        path: String,

        /// Overwrite an existing file without asking.
        #[arg(short, long)]
        force: bool,
    },
}

/// Build an engine over HTTP that renders updates to the terminal.
pub fn build_engine(ctx: &Context) -> Result<ContentSyncEngine> {
    ContentSyncEngine::builder(ctx.config.clone())
        .sink(ConsoleSink::new(ctx.output.is_json()))
        .build()
        .context("Failed to build content sync engine")
}

/// Load the given domains concurrently, keeping their order.
pub async fn load_domains(
    engine: &ContentSyncEngine,
    domains: &[ContentDomain],
) -> Result<Vec<(ContentDomain, LoadOutcome)>> {
    let handles: Vec<_> = domains
        .iter()
        .map(|&domain| {
            let engine = engine.clone();
            (domain, tokio::spawn(async move { engine.load_domain(domain).await }))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (domain, handle) in handles {
        let outcome = handle
            .await
            .with_context(|| format!("Loading {} panicked", domain))?;
        outcomes.push((domain, outcome));
    }
    Ok(outcomes)
}

/// Parse `all` or a domain name into the domains to load.
pub fn parse_domains(target: &str) -> Result<Vec<ContentDomain>> {
    match target.parse::<RefreshTarget>() {
        Ok(RefreshTarget::All) => Ok(ContentDomain::ALL.to_vec()),
        Ok(RefreshTarget::Domain(domain)) => Ok(vec![domain]),
        Err(e) => Err(e).context("Expected one of: products, testimonials, activity, settings, all"),
    }
}
