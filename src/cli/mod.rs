pub mod autofill;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod fill;
pub mod inspect;
pub mod match_cmd;
pub mod output;
pub mod runtime;
pub mod session;
pub mod templates;

pub use context::CliContext;
pub use dispatch::dispatch;
pub use env::{CliArgs, LogFormat};
pub use output::OutputFormat;
