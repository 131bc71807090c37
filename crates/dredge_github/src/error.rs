use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while talking to the GitHub API or its on-disk caches.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The repository URL did not match the expected pattern.
    #[error("invalid repository URL '{url}' (expected https://github.com/<owner>/<repo>)")]
    InvalidRepoUrl {
        /// The URL that failed to parse.
        url: String,
    },

    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status outside the explicitly handled set.
    ///
    /// Fatal: the orchestrator aborts the run with no further checkpoint
    /// writes.
    #[error("unexpected API response status {status}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
    },

    /// Rate-limit retries were exhausted without a successful response.
    #[error("rate limit still exceeded after {attempts} attempts")]
    RateLimitExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// A cache file could not be read or written.
    #[error("cache I/O failed for '{path}': {source}")]
    Cache {
        /// Path of the cache file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A cache file held malformed JSON.
    #[error("malformed cache file '{path}': {source}")]
    CacheFormat {
        /// Path of the cache file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
