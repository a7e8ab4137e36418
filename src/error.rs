//! Error types for axquery operations.

use thiserror::Error;

/// Errors that can occur while resolving roles or running queries.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid CSS selector {selector:?}: {message}")]
    InvalidCss { selector: String, message: String },

    #[error("Cyclic role hierarchy at role: {0}")]
    CyclicRoleHierarchy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
