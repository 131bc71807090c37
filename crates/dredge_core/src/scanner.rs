//! The scanner that matches added lines against the pattern set.

use std::collections::HashSet;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::diff::AddedLine;
use crate::finding::{Finding, Fingerprint, PullRequestRef};
use crate::pattern::PatternSet;

/// In-run deduplication state threaded through every scan call.
///
/// Holds fingerprints of line contents already reported during the current
/// run. The context is created fresh at process start and never persisted,
/// so an identical secret appearing in two separate runs is reported in
/// both; within one run it is reported once, regardless of which file or
/// pull request it turns up in next.
#[derive(Debug, Default)]
pub struct ScanContext {
    seen: HashSet<u64>,
}

impl ScanContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct secrets reported so far this run.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.seen.len()
    }

    fn is_seen(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(&fingerprint.short())
    }

    fn record(&mut self, fingerprint: &Fingerprint) {
        self.seen.insert(fingerprint.short());
    }
}

/// Scans one file's added lines against the pattern set.
///
/// Patterns are tested in definition order against the trimmed line
/// content with unanchored search semantics. A line whose content was
/// already reported this run is skipped before any pattern is consulted;
/// otherwise the first matching pattern wins, the content is recorded in
/// the context, and no later pattern is tested for that line.
#[must_use]
pub fn scan_file(
    file: &str,
    added: &[AddedLine],
    patterns: &PatternSet,
    ctx: &mut ScanContext,
    pr: &PullRequestRef,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for line in added {
        let trimmed = line.content.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fingerprint = Fingerprint::of(trimmed);
        if ctx.is_seen(&fingerprint) {
            continue;
        }

        for pattern in patterns.patterns() {
            if pattern.regex.is_match(trimmed) {
                #[cfg(feature = "tracing")]
                trace!(pattern = %pattern.name, file, line = line.line_number, "pattern matched");

                ctx.record(&fingerprint);
                findings.push(Finding {
                    pr: pr.clone(),
                    file: file.to_string(),
                    line_number: line.line_number,
                    pattern: pattern.name.to_string(),
                    content: trimmed.to_string(),
                    fingerprint: fingerprint.as_str().to_string(),
                });
                break;
            }
        }
    }

    #[cfg(feature = "tracing")]
    debug!(file, added = added.len(), findings = findings.len(), "scanned file");

    findings
}
