//! Text output formatting for scan findings.

use std::fmt::Write as _;
use std::io::Write;

use chrono::Utc;
use console::style;
use dredge_core::Finding;

use super::OutputContext;
use crate::ui::{colors, format_duration, indicators, pluralise_word};

/// Prints one finding to stdout as it is discovered.
pub fn print_finding(finding: &Finding) {
    println!("{}", render_finding(finding));
}

fn render_finding(finding: &Finding) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} {} {}",
        colors::error().apply_to(indicators::ERROR),
        style(&finding.pattern).bold(),
        colors::muted().apply_to("·"),
        colors::accent().apply_to(format!("PR #{}", finding.pr.number)),
    );
    let _ = writeln!(
        out,
        "  {}",
        colors::muted().apply_to(format!(
            "opened {} by {} · {}",
            finding.pr.created_at.format("%Y-%m-%d"),
            finding.pr.author,
            finding.pr.title,
        )),
    );
    let _ = writeln!(
        out,
        "  {}",
        colors::secondary().apply_to(format!("{}:{}", finding.file, finding.line_number)),
    );
    let _ = write!(out, "  {}", colors::code().apply_to(&finding.content));

    out
}

/// Renders scan findings and the run summary as styled text.
///
/// When findings were already printed live during the run, only the
/// summary is written.
pub fn write(ctx: &OutputContext<'_>, writer: &mut dyn Write, strip_colors: bool) -> anyhow::Result<()> {
    if !ctx.printed_live {
        for finding in ctx.findings {
            write_line(writer, &render_finding(finding), strip_colors)?;
            write_line(writer, "", strip_colors)?;
        }
    }

    write_summary(ctx, writer, strip_colors)
}

fn write_summary(ctx: &OutputContext<'_>, writer: &mut dyn Write, strip_colors: bool) -> anyhow::Result<()> {
    let stats = ctx.stats;

    write_line(writer, "", strip_colors)?;

    let headline = if ctx.findings.is_empty() {
        format!(
            "{} {}",
            colors::success().apply_to(indicators::SUCCESS),
            colors::secondary().apply_to("no secrets found"),
        )
    } else {
        format!(
            "{} {} {} found",
            colors::error().apply_to(indicators::ERROR),
            colors::secondary().apply_to(ctx.findings.len()),
            colors::muted()
                .apply_to(pluralise_word(ctx.findings.len(), "secret", "secrets")),
        )
    };
    write_line(writer, &headline, strip_colors)?;

    let mut detail = format!(
        "{} of {} pull requests scanned this run",
        stats.scanned, stats.collection_size,
    );
    if stats.unavailable > 0 {
        let _ = write!(detail, " ({} unavailable)", stats.unavailable);
    }
    let _ = write!(detail, " in {}", format_duration(stats.elapsed));
    write_line(writer, &format!("  {}", colors::muted().apply_to(detail)), strip_colors)?;

    let finished = format!(
        "  {}",
        colors::muted().apply_to(format!("scan finished at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))),
    );
    write_line(writer, &finished, strip_colors)?;

    Ok(())
}

fn write_line(writer: &mut dyn Write, line: &str, strip_colors: bool) -> anyhow::Result<()> {
    if strip_colors {
        writeln!(writer, "{}", console::strip_ansi_codes(line))?;
    } else {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
