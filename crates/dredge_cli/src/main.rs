//! # Commands
//!
//! - `dredge scan` - Audit a repository's closed pull requests for secrets
//! - `dredge patterns` - List detection patterns

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
pub use dredge_core::CONFIG_FILENAME;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/dredge-scan/dredge";

#[derive(Debug, Parser)]
#[command(
    name = "dredge",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "p")]
    Patterns(PatternsArgs),
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Arguments for the `dredge scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Web URL of the repository to audit (https://github.com/<owner>/<repo>).
    pub url: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write findings to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to `.dredge.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file of detection patterns replacing the built-in set.
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// Root directory for per-repository caches.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// GitHub API base URL (for GitHub Enterprise installations).
    #[arg(long, default_value = dredge_github::DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// Glob patterns for diff file paths to exclude from scanning.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Maximum attempts per diff request when rate limited.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Always exit with code 0, even when secrets are found.
    #[arg(long)]
    pub exit_zero: bool,

    /// Increase output verbosity (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `dredge patterns` command.
#[derive(Debug, Parser)]
pub struct PatternsArgs {
    /// JSON file of detection patterns replacing the built-in set.
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// Show full regular expressions without truncation.
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

/// Initialises the tracing subscriber.
///
/// Progress events from the fetchers (page counts, rate-limit status) are
/// emitted at info level, so the default filter keeps them visible unless
/// `RUST_LOG` overrides it.
#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dredge_core=info,dredge_github=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Patterns(args) => commands::patterns::run(&args),
        Command::Scan(args) => commands::scan::run(&args),
    }
}

fn build_about() -> String {
    format!(
        r"
  {} audits a repository's closed pull-request history for leaked secrets.

  Scans only the added lines of every merged or closed pull request's
  diff, checkpoints progress durably, and resumes where it left off.",
        colors::accent().apply_to("dredge").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    dredge scan https://github.com/acme/widgets     Audit a repository
    dredge scan <url> --format json -o audit.json   Machine-readable output
    dredge scan <url> --exclude 'vendor/**'         Skip vendored paths
    dredge patterns                                 List detection patterns

  Set {} (or {}) to raise the API rate limit.

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to("DREDGE_TOKEN"),
        colors::accent().apply_to("GITHUB_TOKEN"),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
