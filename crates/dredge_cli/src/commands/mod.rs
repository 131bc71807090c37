//! CLI command handlers.

/// Pattern listing and inspection.
pub mod patterns;
/// Pull-request history auditing for leaked secrets.
pub mod scan;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;
