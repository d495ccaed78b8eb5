//! Domain-level error taxonomy for testforge.
//!
//! Only resource-resolution failures surface as errors. Analysis of
//! malformed source degrades to a partial model, a missing runner is a
//! normal verification outcome, and a stalled or exhausted repair loop is
//! a terminal state — none of those are represented here.

use std::path::PathBuf;

/// Testforge domain errors.
#[derive(Debug, thiserror::Error)]
pub enum TestforgeError {
    #[error("component source not found: {path:?}")]
    InputNotFound { path: PathBuf },

    #[error("component source is not valid UTF-8: {path:?}")]
    InvalidEncoding { path: PathBuf },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for testforge domain operations.
pub type Result<T> = std::result::Result<T, TestforgeError>;
