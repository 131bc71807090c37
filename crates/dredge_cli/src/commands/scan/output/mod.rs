//! Output formatting for scan results.

pub mod json;
pub mod text;

use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::Context as _;
use dredge_core::Finding;

use crate::{OutputFormat, ScanArgs};

/// Run statistics shown in the scan summary.
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    /// Total pull requests in the cached collection.
    pub collection_size: usize,
    /// Pull requests scanned and checkpointed this run.
    pub scanned: usize,
    /// Pull requests skipped because their diff was unavailable.
    pub unavailable: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Everything the output formatters need to render results.
#[derive(Debug)]
pub struct OutputContext<'a> {
    /// Findings in collection order.
    pub findings: &'a [Finding],
    /// Run statistics.
    pub stats: ScanStats,
    /// Whether findings were already printed live during the run; the text
    /// formatter then only renders the summary.
    pub printed_live: bool,
}

/// Writes scan results to stdout or the file given by `--output`.
pub fn write_output(args: &ScanArgs, ctx: &OutputContext<'_>) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create output file '{}'", path.display()))?;
            write_to(args, ctx, &mut file, true)
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_to(args, ctx, &mut handle, false)
        }
    }
}

fn write_to(
    args: &ScanArgs,
    ctx: &OutputContext<'_>,
    writer: &mut dyn Write,
    strip_colors: bool,
) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Json => json::write(ctx, writer),
        OutputFormat::Text => text::write(ctx, writer, strip_colors),
    }
}
