//! Load content once and print it.

use anyhow::{bail, Result};
use beanline_sync::LoadOutcome;
use serde_json::{Map, Value};

use super::{build_engine, load_domains, parse_domains, FetchArgs};
use crate::context::Context;

/// Run the fetch command.
pub async fn run(args: FetchArgs, ctx: &Context) -> Result<()> {
    let domains = parse_domains(&args.target)?;
    let engine = build_engine(ctx)?;

    ctx.output.debug(&format!("Loading from {}", ctx.config.api_base_url));
    let outcomes = load_domains(&engine, &domains).await?;

    let mut payloads = Map::new();
    let mut failed = 0;
    for (domain, outcome) in outcomes {
        match outcome {
            LoadOutcome::Loaded(data) => {
                payloads.insert(domain.name().to_string(), data);
            }
            LoadOutcome::NoData => {
                ctx.output.warn(&format!("{}: response carried no data", domain));
                payloads.insert(domain.name().to_string(), Value::Null);
            }
            LoadOutcome::Failed(e) => {
                ctx.output.debug(&format!("{}: {}", domain, e));
                failed += 1;
            }
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&payloads);
    } else {
        for (name, data) in &payloads {
            ctx.output.header(name);
            println!("{}", serde_json::to_string_pretty(data)?);
        }
    }

    if failed == domains.len() {
        bail!("No content could be loaded from {}", ctx.config.api_base_url);
    }
    Ok(())
}
