//! Core scanning engine for dredge.
//!
//! This crate provides everything needed to turn a pull request's unified
//! diff into secret findings: diff parsing restricted to added lines, a
//! named pattern set compiled once per run, in-run deduplication, and the
//! durable checkpoint log that makes interrupted scans resumable.
//!
//! # Main Types
//!
//! - [`PatternSet`] - Named detection patterns compiled from a JSON library
//! - [`FileDiff`] - Added lines of one file in a pull request diff
//! - [`ScanContext`] - In-run deduplication state threaded through scans
//! - [`Finding`] - A detected secret with pull-request provenance
//! - [`CheckpointLog`] - Append-only log of already-scanned pull requests
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`PatternError`] - Pattern loading/compilation failures
//! - [`ConfigError`] - Configuration loading/parsing failures
//! - [`CheckpointError`] - Checkpoint log I/O failures
//! - [`DredgeError`] - Top-level error enum combining the above
//!
//! The CLI crate (`dredge_cli`) uses `anyhow` for error propagation.

/// Append-only log of pull requests that have been fully scanned.
pub mod checkpoint;
/// User configuration loaded from `.dredge.toml`.
pub mod config;
/// Unified-diff parsing restricted to added lines.
pub mod diff;
/// Error types for pattern loading and the top-level pipeline.
pub mod error;
/// Types representing detected secrets and their provenance.
pub mod finding;
/// Filesystem helpers for atomic writes.
pub mod fs_util;
/// Named pattern definitions compiled from a JSON library.
pub mod pattern;
/// Common re-exports for internal use.
pub mod prelude;
/// The scanner that matches added lines against the pattern set.
pub mod scanner;

pub use checkpoint::{CheckpointError, CheckpointLog};
pub use config::{Config, ConfigError, CustomPattern};
pub use diff::{AddedLine, FileDiff};
pub use error::{DredgeError, PatternError};
pub use finding::{Finding, Fingerprint, PullRequestRef};
pub use pattern::{Pattern, PatternSet};
pub use scanner::{ScanContext, scan_file};

/// Default filename for dredge configuration.
pub const CONFIG_FILENAME: &str = ".dredge.toml";
