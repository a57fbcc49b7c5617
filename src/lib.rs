//! SoulFill command-line front end
//!
//! Wires the template store, matcher, fill executor and inspect controller to fixture pages.
//! Exposed as a library for integration testing.

pub mod cli;
pub mod config;

pub use config::Config;
