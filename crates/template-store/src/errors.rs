use soulfill_core_types::SoulError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("invalid template: {0}")]
    Invalid(String),
    #[error("template store io: {0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<StoreError> for SoulError {
    fn from(err: StoreError) -> Self {
        SoulError::new(err.to_string())
    }
}
