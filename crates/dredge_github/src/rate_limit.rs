//! Rate-limit quota bookkeeping.

use reqwest::header::HeaderMap;

/// Quota consumption between remaining-quota reports.
const REPORT_INTERVAL: u64 = 100;

/// Name of the response header carrying the remaining request quota.
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Tracks the API's remaining-quota counter across requests.
///
/// The tracker is explicit state owned by the orchestrator and passed into
/// every fetch call. It surfaces the remaining quota once per
/// `REPORT_INTERVAL` consumed requests; the report is purely observational
/// and has no effect on fetching.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitTracker {
    baseline: Option<u64>,
}

impl RateLimitTracker {
    /// Creates a tracker with no recorded baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the baseline to `remaining` without reporting.
    ///
    /// The listing fetcher calls this on every page so that a later diff
    /// fetch measures consumption from the most recent page, not from the
    /// start of the run.
    pub fn reset(&mut self, remaining: u64) {
        self.baseline = Some(remaining);
    }

    /// Records `remaining` and returns `Some(remaining)` when at least
    /// `REPORT_INTERVAL` requests have been consumed since the last
    /// report. The first observation only establishes the baseline.
    pub fn observe(&mut self, remaining: u64) -> Option<u64> {
        match self.baseline {
            None => {
                self.baseline = Some(remaining);
                None
            }
            Some(baseline) if baseline.saturating_sub(remaining) >= REPORT_INTERVAL => {
                self.baseline = Some(remaining);
                Some(remaining)
            }
            Some(_) => None,
        }
    }
}

/// Extracts the remaining-quota counter from response headers.
#[must_use]
pub fn remaining_quota(headers: &HeaderMap) -> Option<u64> {
    headers.get(REMAINING_HEADER)?.to_str().ok()?.parse().ok()
}
