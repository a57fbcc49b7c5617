use thiserror::Error;

use crate::SoulError;

/// Failure reported by a host port (page, overlay, scanner).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The selector no longer resolves to a live element.
    #[error("element detached: {0}")]
    Detached(String),
    #[error("operation not supported by element: {0}")]
    Unsupported(String),
    #[error("host failure: {0}")]
    Host(String),
}

impl From<HostError> for SoulError {
    fn from(err: HostError) -> Self {
        SoulError::new(err.to_string())
    }
}
