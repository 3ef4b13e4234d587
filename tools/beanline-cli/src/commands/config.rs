//! Configuration management commands.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use beanline_core::generate_default_config;
use dialoguer::Confirm;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { path, force } => init_config(&path, force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "built-in defaults"),
    }

    let config = &ctx.config;
    ctx.output.kv("apiBaseUrl", &config.api_base_url);
    ctx.output.kv("cacheTimeout", &format!("{}ms", config.cache_timeout));
    ctx.output.kv("autoRefreshInterval", &format!("{}ms", config.auto_refresh_interval));
    ctx.output.kv("retryAttempts", &config.retry_attempts.to_string());
    ctx.output.kv("retryDelay", &format!("{}ms", config.retry_delay));
    match config.request_timeout {
        Some(ms) => ctx.output.kv("requestTimeout", &format!("{}ms", ms)),
        None => ctx.output.kv("requestTimeout", "none"),
    }
    ctx.output.kv("staleWarning", &config.stale_warning.to_string());

    Ok(())
}

fn init_config(path: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(path);

    if config_path.exists() && !force && !confirm_overwrite(&config_path)? {
        ctx.output.warn("Config init cancelled");
        return Ok(());
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", path.display()))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
