use soulfill_core_types::SoulError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("template has no field with key '{0}'")]
    UnknownTemplateField(String),
    #[error("selector '{0}' is not part of the mapped container")]
    UnknownSelector(String),
}

impl From<MatchError> for SoulError {
    fn from(err: MatchError) -> Self {
        SoulError::new(err.to_string())
    }
}
