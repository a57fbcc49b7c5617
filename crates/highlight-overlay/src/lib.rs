//! Ephemeral overlay boxes drawn around a target element.
//!
//! The renderer owns no decision logic. It resolves a selector's live bounding box through an
//! [`OverlayPort`], computes a [`HighlightLayout`] and asks the host to draw it.

pub mod layout;
pub mod renderer;

use soulfill_core_types::{BoundingBox, HostError, SoulError, Viewport};
use thiserror::Error;

pub use layout::{layout, ChipLayout, HighlightLayout, CHIP_HEIGHT, FRAME_PADDING};
pub use renderer::{ActiveHighlight, HighlightRenderer};

/// Which overlay a draw call targets. Each slot holds at most one highlight.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    /// Candidate container shown on the confirm route.
    Preview,
    /// Ancestor under the pointer during an inspect session.
    InspectFrame,
}

impl Slot {
    pub fn label(&self) -> &'static str {
        match self {
            Slot::Preview => "preview",
            Slot::InspectFrame => "inspect-frame",
        }
    }
}

/// Host drawing surface. Calls are synchronous; they run inside pointer and scroll callbacks.
pub trait OverlayPort: Send + Sync {
    fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>, HostError>;
    fn viewport(&self) -> Viewport;
    fn draw(&self, slot: Slot, layout: &HighlightLayout) -> Result<(), HostError>;
    fn clear(&self, slot: Slot) -> Result<(), HostError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("highlight target not found: {0}")]
    TargetMissing(String),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl From<HighlightError> for SoulError {
    fn from(err: HighlightError) -> Self {
        SoulError::new(err.to_string())
    }
}
