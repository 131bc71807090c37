//! Scan command - audits closed pull requests for secrets.

mod output;
mod runner;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context as _;
use dredge_core::prelude::*;
use dredge_github::{GithubClient, RepoSlug, RetryPolicy};
use globset::{Glob, GlobSet, GlobSetBuilder};

use self::output::{OutputContext, ScanStats, write_output};
use self::runner::run_loop;
use crate::ui::{exit, print_command_header};
use crate::{CONFIG_FILENAME, OutputFormat, ScanArgs};

/// Environment variables consulted, in order, for the API access token.
const TOKEN_ENV_VARS: [&str; 2] = ["DREDGE_TOKEN", "GITHUB_TOKEN"];

/// Directory under the platform cache dir holding per-repository caches.
const CACHE_ROOT_NAME: &str = "dredge";

/// Executes the `dredge scan` command.
pub fn run(args: &ScanArgs) -> super::Result {
    let show_progress = should_show_progress(args);
    let start = Instant::now();

    if show_progress {
        print_command_header("scan");
    }

    let slug = RepoSlug::parse(&args.url)?;
    let config = load_config(args)?;
    let patterns = load_patterns(args, &config)?;
    let excludes = build_excludes(args, &config)?;
    let retry = RetryPolicy {
        max_attempts: args
            .max_retries
            .or(config.max_retries)
            .unwrap_or(RetryPolicy::DEFAULT_MAX_ATTEMPTS),
    };

    let repo_cache = slug.cache_dir(&resolve_cache_root(args, &config));
    std::fs::create_dir_all(&repo_cache)
        .with_context(|| format!("failed to create cache directory '{}'", repo_cache.display()))?;

    let client = GithubClient::new(&args.api_url, resolve_token())?;

    if show_progress && args.verbose > 0 {
        print_verbose_context(args, &slug, &patterns, &repo_cache, retry);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create async runtime")?;

    let outcome = rt.block_on(run_loop(
        &client,
        &slug,
        &repo_cache,
        &patterns,
        &excludes,
        retry,
        show_progress,
    ))?;

    let stats = ScanStats {
        collection_size: outcome.collection_size,
        scanned: outcome.scanned,
        unavailable: outcome.unavailable,
        elapsed: start.elapsed(),
    };

    write_output(
        args,
        &OutputContext {
            findings: &outcome.findings,
            stats,
            printed_live: show_progress,
        },
    )?;

    handle_exit_code(args, &outcome.findings);

    Ok(())
}

const fn should_show_progress(args: &ScanArgs) -> bool {
    args.output.is_none() && matches!(args.format, OutputFormat::Text)
}

fn load_config(args: &ScanArgs) -> super::Result<Config> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    Ok(Config::load(&path)?)
}

/// Compiles the pattern set once for the whole run: the built-in library
/// (or the file given by `--patterns`), with config-declared patterns
/// appended in declaration order.
fn load_patterns(args: &ScanArgs, config: &Config) -> super::Result<PatternSet> {
    let mut set = match &args.patterns {
        Some(path) => PatternSet::load(path)?,
        None => PatternSet::builtin()?,
    };

    for custom in &config.patterns {
        set.push(custom.compile()?);
    }

    anyhow::ensure!(!set.is_empty(), "pattern set is empty, nothing to scan for");
    Ok(set)
}

fn build_excludes(args: &ScanArgs, config: &Config) -> super::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in config.exclude_paths.iter().chain(args.exclude.iter()) {
        builder.add(Glob::new(pattern).with_context(|| format!("invalid exclude glob '{pattern}'"))?);
    }
    Ok(builder.build()?)
}

fn resolve_cache_root(args: &ScanArgs, config: &Config) -> PathBuf {
    args.cache_dir
        .clone()
        .or_else(|| config.cache_dir.clone())
        .unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CACHE_ROOT_NAME)
        })
}

fn resolve_token() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

fn print_verbose_context(
    args: &ScanArgs,
    slug: &RepoSlug,
    patterns: &PatternSet,
    repo_cache: &std::path::Path,
    retry: RetryPolicy,
) {
    use crate::ui::colors;

    let print_row = |label: &str, value: &str| {
        println!(
            "  {} {}",
            colors::muted().apply_to(format!("{label:<12}")),
            colors::secondary().apply_to(value)
        );
    };

    print_row("repository", &slug.to_string());
    print_row("cache", &repo_cache.display().to_string());
    print_row("patterns", &patterns.len().to_string());
    print_row("retries", &retry.max_attempts.to_string());
    if args.verbose > 1 {
        print_row("api", &args.api_url);
    }
    println!();
}

fn handle_exit_code(args: &ScanArgs, findings: &[Finding]) {
    if args.exit_zero {
        return;
    }

    if !findings.is_empty() {
        std::process::exit(exit::FINDINGS);
    }
}
