use soulfill_core_types::{HostError, SoulError};
use thiserror::Error;

const NO_TARGET_PREFIX: &str = "No element matches selector";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FillError {
    #[error("tool disabled by policy")]
    Disabled,
    #[error("No element matches selector {0}")]
    NoActiveTarget(String),
    #[error("Option not found")]
    OptionNotFound,
    #[error("value too long ({len} > {max})")]
    ValueTooLong { len: usize, max: usize },
    #[error("host error: {0}")]
    Host(String),
    #[error("{0} port is required")]
    MissingPort(&'static str),
    #[error("operation cancelled")]
    Cancelled,
}

impl FillError {
    /// Recognises a [`FillError::NoActiveTarget`] recorded in a `FillResult`.
    pub fn is_no_target_message(message: &str) -> bool {
        message.starts_with(NO_TARGET_PREFIX)
    }

    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FillError::Disabled => "disabled",
            FillError::NoActiveTarget(_) => "no-active-target",
            FillError::OptionNotFound => "option-not-found",
            FillError::ValueTooLong { .. } => "value-too-long",
            FillError::Host(_) => "host",
            FillError::MissingPort(_) => "missing-port",
            FillError::Cancelled => "cancelled",
        }
    }
}

impl From<HostError> for FillError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Detached(selector) => FillError::NoActiveTarget(selector),
            other => FillError::Host(other.to_string()),
        }
    }
}

impl From<FillError> for SoulError {
    fn from(err: FillError) -> Self {
        SoulError::new(err.to_string())
    }
}
