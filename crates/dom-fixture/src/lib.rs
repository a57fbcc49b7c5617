//! Simulated page host.
//!
//! A [`VirtualPage`] is loaded from a YAML or JSON fixture and implements the scan, DOM, overlay and
//! inspect-surface ports, so matching, filling and inspect sessions can run end to end without a
//! browser. Every host effect is logged as a [`PageOp`] for assertions.

mod dom;
pub mod errors;
pub mod format;
mod host;
pub mod ops;
pub mod page;
pub mod selector;

pub use errors::FixtureError;
pub use format::{NodeSpec, PageFixture};
pub use ops::PageOp;
pub use page::VirtualPage;
pub use selector::{Selector, Step};
