use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or compiling secret detection patterns.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern's regular expression failed to compile.
    #[error("invalid regex in pattern '{name}': {source}")]
    InvalidRegex {
        /// Name of the pattern that failed (e.g. `"aws_access_key_id"`).
        name: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A pattern file could not be read from disk.
    #[error("failed to read pattern file '{path}': {source}")]
    Read {
        /// Path to the pattern file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A pattern file did not contain a JSON object of name/regex pairs.
    #[error("failed to parse pattern file '{path}': {source}")]
    Parse {
        /// Path to the pattern file that could not be parsed.
        path: PathBuf,
        /// The underlying JSON deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error type for the dredge scanning pipeline.
///
/// Unifies errors from pattern compilation, configuration loading, and
/// checkpoint I/O into a single type for callers that orchestrate the
/// full workflow.
#[derive(Debug, Error)]
pub enum DredgeError {
    /// A pattern failed to load or compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The checkpoint log could not be read or appended to.
    #[error(transparent)]
    Checkpoint(#[from] crate::checkpoint::CheckpointError),
}
