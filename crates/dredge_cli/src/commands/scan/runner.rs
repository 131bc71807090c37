//! The pull-request scan loop.

use std::path::Path;

use dredge_core::prelude::*;
use dredge_github::{DiffResponse, GithubClient, PullRequest, RateLimitTracker, RepoSlug, RetryPolicy};
use globset::GlobSet;
use indicatif::ProgressBar;

use super::output::text::print_finding;
use crate::ui::{create_pr_progress, print_info, print_warning, pluralise_word};

/// Filename of the checkpoint log within the repository cache directory.
const CHECKPOINT_FILENAME: &str = "scanned.log";

/// Aggregated results of one scan run.
#[derive(Debug)]
pub struct RunOutcome {
    /// All findings, in collection order.
    pub findings: Vec<Finding>,
    /// Total pull requests in the cached collection.
    pub collection_size: usize,
    /// Pull requests scanned and checkpointed this run.
    pub scanned: usize,
    /// Pull requests skipped because their diff was unavailable.
    pub unavailable: usize,
}

/// Drives the end-to-end scan: fetch the collection (cached), load the
/// checkpoint log, then walk every unscanned pull request in collection
/// order - fetch its diff, scan the added lines, and checkpoint it.
///
/// An unavailable diff is skipped without checkpointing so it is retried
/// on the next run; any other fetch failure aborts the whole run, leaving
/// the checkpoint log at the last completed pull request.
pub async fn run_loop(
    client: &GithubClient,
    slug: &RepoSlug,
    repo_cache: &Path,
    patterns: &PatternSet,
    excludes: &GlobSet,
    retry: RetryPolicy,
    show_progress: bool,
) -> anyhow::Result<RunOutcome> {
    let mut tracker = RateLimitTracker::new();

    let pulls = dredge_github::pulls::fetch_all(
        client,
        slug,
        &repo_cache.join(dredge_github::pulls::CACHE_FILENAME),
        &mut tracker,
    )
    .await?;

    let mut checkpoint = CheckpointLog::load(&repo_cache.join(CHECKPOINT_FILENAME))?;

    let pending: Vec<&PullRequest> = pulls.iter().filter(|pr| !checkpoint.contains(pr.number)).collect();

    if show_progress && !checkpoint.is_empty() {
        print_info(&format!(
            "resuming: {} {} already scanned in previous runs",
            checkpoint.len(),
            pluralise_word(checkpoint.len(), "pull request", "pull requests"),
        ));
    }

    let pb = (show_progress && !pending.is_empty()).then(|| create_pr_progress(pending.len()));

    let mut ctx = ScanContext::new();
    let mut findings = Vec::new();
    let mut scanned = 0usize;
    let mut unavailable = 0usize;

    for pr in pending {
        match dredge_github::diff::fetch(client, &pr.url, &mut tracker, retry).await? {
            DiffResponse::Unavailable => {
                unavailable += 1;
                suspended(pb.as_ref(), || {
                    print_warning(&format!(
                        "diff for pull request #{} unavailable, will retry next run",
                        pr.number
                    ));
                });
            }
            DiffResponse::Diff(raw) => {
                let pr_ref = to_pr_ref(pr);

                for file in dredge_core::diff::parse(&raw) {
                    if excludes.is_match(&file.path) {
                        continue;
                    }

                    let file_findings = scan_file(&file.path, &file.added, patterns, &mut ctx, &pr_ref);

                    if show_progress {
                        for finding in &file_findings {
                            suspended(pb.as_ref(), || print_finding(finding));
                        }
                    }
                    findings.extend(file_findings);
                }

                checkpoint.append(pr.number)?;
                scanned += 1;
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(RunOutcome {
        findings,
        collection_size: pulls.len(),
        scanned,
        unavailable,
    })
}

/// Runs `f` with the progress bar suspended so its output is not clobbered.
fn suspended(pb: Option<&ProgressBar>, f: impl FnOnce()) {
    match pb {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn to_pr_ref(pr: &PullRequest) -> PullRequestRef {
    PullRequestRef {
        number: pr.number,
        created_at: pr.created_at,
        title: pr.title.clone(),
        author: pr.user.login.clone(),
    }
}
