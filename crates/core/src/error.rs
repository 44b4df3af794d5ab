//! Error types for the acrf layout engine.
//!
//! Per-item failures inside the pipeline (a malformed pattern, a row with
//! unusable coordinates, a page with no dimensions) are never fatal: the
//! offending item is skipped and a diagnostic is traced. `AcrfError`
//! surfaces only at API edges, currently pattern compilation.

use thiserror::Error;

/// Primary error type for CRF layout operations.
#[derive(Error, Debug)]
pub enum AcrfError {
    #[error("invalid detection pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Convenience Result type alias for AcrfError.
pub type Result<T> = std::result::Result<T, AcrfError>;
