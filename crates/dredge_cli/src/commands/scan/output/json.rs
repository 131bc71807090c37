//! JSON output formatter for scan findings.

use std::io::Write;

use chrono::{DateTime, Utc};
use dredge_core::Finding;
use serde::Serialize;

use super::OutputContext;

#[derive(Serialize)]
struct JsonReport<'a> {
    findings: &'a [Finding],
    collection_size: usize,
    scanned: usize,
    unavailable: usize,
    finished_at: DateTime<Utc>,
}

/// Serialises scan findings and run statistics as a pretty-printed JSON
/// document to the given writer.
pub fn write(ctx: &OutputContext<'_>, writer: &mut dyn Write) -> anyhow::Result<()> {
    let report = JsonReport {
        findings: ctx.findings,
        collection_size: ctx.stats.collection_size,
        scanned: ctx.stats.scanned,
        unavailable: ctx.stats.unavailable,
        finished_at: Utc::now(),
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
