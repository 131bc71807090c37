//! GitHub API client for dredge.
//!
//! This crate is the network half of the scan pipeline: repository slug
//! parsing, paginated retrieval of the closed pull-request listing (cached
//! to disk once complete), and rate-limit-aware retrieval of individual
//! pull-request diffs.
//!
//! All requests go through one [`GithubClient`] carrying the optional
//! access token, and rate-limit bookkeeping is threaded through an
//! explicit [`RateLimitTracker`] value rather than process-wide state, so
//! each piece can be exercised in isolation against a mock server.

/// Shared HTTP client with token and API base configuration.
pub mod client;
/// Per-PR diff retrieval with rate-limit backoff.
pub mod diff;
/// Error types for API calls and cache I/O.
pub mod error;
/// Paginated pull-request listing with on-disk cache.
pub mod pulls;
/// Rate-limit quota bookkeeping.
pub mod rate_limit;
/// Repository slug parsing and cache locations.
pub mod repo;

pub use client::{DEFAULT_API_URL, GithubClient};
pub use diff::{DiffResponse, RetryPolicy};
pub use error::GithubError;
pub use pulls::{PullRequest, PullRequestAuthor};
pub use rate_limit::RateLimitTracker;
pub use repo::RepoSlug;

/// HTTP `User-Agent` header sent with every API request.
pub(crate) const USER_AGENT: &str = concat!("dredge-pr-auditor/", env!("CARGO_PKG_VERSION"));
