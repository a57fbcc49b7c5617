#![allow(dead_code)]

pub mod api;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod ports;

mod markup;
mod redact;
mod runner;

pub use api::{FillTool, FillToolBuilder};
pub use errors::FillError;
pub use events::{BusEvents, FillEvent};
pub use metrics::{FillMetrics, FillMetricsSnapshot};
pub use model::{ChoiceOption, ElementInfo, ElementKind, FillCtx, Notification};
pub use policy::FillPolicyView;
pub use ports::{DomPort, EventsPort, MetricsPort};
