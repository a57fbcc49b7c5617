//! Glue between page scans, matching, the decision policy, the fill executor and inspect sessions.

pub mod errors;
pub mod model;
pub mod ports;
pub mod service;

pub use errors::FlowError;
pub use model::{AutofillOutcome, InspectCompletion, PendingFill, BODY_CONTAINER};
pub use ports::ScanPort;
pub use service::{AutofillService, AutofillServiceBuilder};
