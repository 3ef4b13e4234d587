//! Load content and list what ended up cached.

use anyhow::Result;

use super::{build_engine, load_domains, parse_domains, CacheArgs};
use crate::context::Context;
use crate::output::{format_age, format_bytes};

/// Run the cache command.
pub async fn run(args: CacheArgs, ctx: &Context) -> Result<()> {
    let domains = parse_domains(args.domain.as_deref().unwrap_or("all"))?;
    let engine = build_engine(ctx)?;
    load_domains(&engine, &domains).await?;

    let entries = engine.cache_snapshot();
    if ctx.output.is_json() {
        ctx.output.json(&entries);
        return Ok(());
    }

    ctx.output.header("Cache entries");
    if entries.is_empty() {
        ctx.output.info("Nothing cached");
        return Ok(());
    }

    let widths = [42, 10, 10, 20];
    ctx.output.table_row(&["ENDPOINT", "AGE", "SIZE", "STORED"], &widths);
    for entry in &entries {
        let stored = entry.stored_at.format("%Y-%m-%d %H:%M:%S").to_string();
        ctx.output.table_row(
            &[
                &entry.key,
                &format_age(entry.age_ms),
                &format_bytes(entry.bytes as u64),
                &stored,
            ],
            &widths,
        );
    }
    Ok(())
}
