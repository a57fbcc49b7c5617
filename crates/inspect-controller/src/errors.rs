use soulfill_core_types::{InspectMode, SoulError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InspectError {
    #[error("an inspect session is already active ({0})")]
    SessionConflict(InspectMode),
}

impl From<InspectError> for SoulError {
    fn from(err: InspectError) -> Self {
        SoulError::new(err.to_string())
    }
}
