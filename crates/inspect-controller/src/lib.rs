#![allow(dead_code)]

pub mod ancestor;
pub mod config;
pub mod controller;
pub mod errors;
pub mod fsm;
pub mod model;
pub mod seed;

pub use ancestor::{is_form_like, nearest_form_like, ElementTree, NodeHandle};
pub use config::InspectConfig;
pub use controller::{InspectController, InspectSurface};
pub use errors::InspectError;
pub use fsm::{transition, ActiveSession, Effect, Input, SessionState};
pub use model::{
    ButtonPhase, InspectCommit, InspectEvent, InspectToken, PointerButton, PointerDisposition,
    PointerOutcome,
};
pub use seed::seed_template;
