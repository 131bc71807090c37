//! Append-only log of pull requests that have been fully scanned.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Durable set of already-scanned pull request numbers.
///
/// Backed by a newline-delimited append-only log, one number per line.
/// Every append is flushed and synced before returning, so a crash mid-run
/// preserves all prior commits and loses at most the pull request in
/// flight, which is simply retried on the next run.
#[derive(Debug)]
pub struct CheckpointLog {
    path: PathBuf,
    file: File,
    scanned: HashSet<u64>,
}

impl CheckpointLog {
    /// Opens the log at `path`, creating it if absent, and parses the
    /// already-recorded numbers.
    ///
    /// Lines that do not parse as numbers are ignored, so a torn trailing
    /// line left by an interrupted append does not poison the log.
    pub fn load(path: &Path) -> Result<Self, CheckpointError> {
        let scanned = match std::fs::read_to_string(path) {
            Ok(content) => content.lines().filter_map(|l| l.trim().parse().ok()).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(source) => {
                return Err(CheckpointError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| CheckpointError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            scanned,
        })
    }

    /// Returns `true` if `number` has already been fully scanned.
    #[must_use]
    pub fn contains(&self, number: u64) -> bool {
        self.scanned.contains(&number)
    }

    /// Number of recorded pull requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scanned.len()
    }

    /// Returns `true` if no pull requests have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scanned.is_empty()
    }

    /// Records `number` as fully scanned.
    ///
    /// The entry is flushed and synced to disk before this returns, so the
    /// commit survives a crash immediately after.
    pub fn append(&mut self, number: u64) -> Result<(), CheckpointError> {
        writeln!(self.file, "{number}")
            .and_then(|()| self.file.flush())
            .and_then(|()| self.file.sync_data())
            .map_err(|source| CheckpointError::Append {
                path: self.path.clone(),
                source,
            })?;

        self.scanned.insert(number);
        Ok(())
    }
}

/// Errors that can occur when reading or appending to the checkpoint log.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The log file could not be opened for appending.
    #[error("failed to open checkpoint log '{path}': {source}")]
    Open {
        /// Path to the checkpoint log.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The log file exists but could not be read.
    #[error("failed to read checkpoint log '{path}': {source}")]
    Read {
        /// Path to the checkpoint log.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be durably appended.
    #[error("failed to append to checkpoint log '{path}': {source}")]
    Append {
        /// Path to the checkpoint log.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
