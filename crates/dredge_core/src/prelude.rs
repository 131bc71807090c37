//! Convenience re-exports of the most commonly used types.

pub use crate::checkpoint::{CheckpointError, CheckpointLog};
pub use crate::config::{Config, ConfigError, CustomPattern};
pub use crate::diff::{AddedLine, FileDiff};
pub use crate::error::{DredgeError, PatternError};
pub use crate::finding::{Finding, Fingerprint, PullRequestRef};
pub use crate::pattern::{Pattern, PatternSet};
pub use crate::scanner::{ScanContext, scan_file};
