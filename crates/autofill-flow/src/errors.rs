use form_matcher::MatchError;
use inspect_controller::InspectError;
use soulfill_core_types::{HostError, SoulError};
use soulfill_template_store::StoreError;
use thiserror::Error;

/// User-visible failures of a whole autofill attempt. Per-field problems never end up here.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no form fields found")]
    ZeroFieldsDetected,
    #[error("none of the fields in {container} could be resolved")]
    TargetsUnresolved { container: String },
    #[error("fill mode needs a template")]
    MissingTemplate,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Inspect(#[from] InspectError),
    #[error("page scan failed: {0}")]
    Scan(#[from] HostError),
    #[error("fill failed: {0}")]
    Fill(SoulError),
    #[error("{0} is required")]
    MissingComponent(&'static str),
}

impl From<FlowError> for SoulError {
    fn from(err: FlowError) -> Self {
        SoulError::new(err.to_string())
    }
}
