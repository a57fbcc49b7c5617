use std::path::PathBuf;

use soulfill_core_types::{HostError, SoulError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

impl FixtureError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        FixtureError::Selector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<FixtureError> for HostError {
    fn from(err: FixtureError) -> Self {
        HostError::Unsupported(err.to_string())
    }
}

impl From<FixtureError> for SoulError {
    fn from(err: FixtureError) -> Self {
        SoulError::new(err.to_string())
    }
}
