//! Run the engine until interrupted.

use std::time::Duration;

use anyhow::{Context as _, Result};
use beanline_sync::EngineEvent;
use chrono::Local;
use console::style;
use serde_json::json;

use super::{build_engine, WatchArgs};
use crate::context::Context;
use crate::output::event_badge;

/// Run the watch command.
pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let engine = build_engine(ctx)?;

    let json = ctx.output.is_json();
    engine.subscribe(move |event: &EngineEvent| print_event(event, json));

    ctx.output.header("Watching content");
    ctx.output.kv("API", &ctx.config.api_base_url);
    ctx.output.kv(
        "Activity refresh",
        &format!("{}s", ctx.config.auto_refresh_interval().as_secs()),
    );

    let spinner = ctx.output.spinner("Loading content...");
    let init = engine.init().await;
    spinner.finish_and_clear();
    init.context("Initial load failed")?;

    ctx.output.success(&format!("{} refresh timers running", engine.active_timers()));

    match args.for_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => {
            ctx.output.info("Press Ctrl-C to stop");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
        }
    }

    engine.shutdown();
    ctx.output.success("Stopped");
    Ok(())
}

fn print_event(event: &EngineEvent, json: bool) {
    let stamp = Local::now().format("%H:%M:%S").to_string();
    if json {
        println!("{}", json!({ "event": event.name(), "at": stamp }));
        return;
    }
    match event {
        EngineEvent::Error(message) => {
            println!("{} {} {}", style(stamp).dim(), event_badge(event.name()), message)
        }
        _ => println!("{} {}", style(stamp).dim(), event_badge(event.name())),
    }
}
