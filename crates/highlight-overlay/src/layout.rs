use serde::Serialize;
use soulfill_core_types::{BoundingBox, Viewport};

pub const FRAME_PADDING: f64 = 4.0;
pub const CHIP_HEIGHT: f64 = 20.0;
const CHIP_CHAR_WIDTH: f64 = 7.0;
const CHIP_INSET: f64 = 12.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub text: String,
    /// Chip sits inside the frame because there was no room above it.
    pub flipped: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightLayout {
    pub frame: BoundingBox,
    pub chip: ChipLayout,
}

/// Frame padded around `target`, with a label chip above it.
///
/// The chip moves inside the frame when it would cross the viewport top, and is shifted left so it
/// never overflows the right edge.
pub fn layout(target: BoundingBox, viewport: Viewport, label: &str) -> HighlightLayout {
    let frame = target.padded(FRAME_PADDING);
    let width = label.chars().count() as f64 * CHIP_CHAR_WIDTH + CHIP_INSET;

    let above = frame.y - CHIP_HEIGHT;
    let (y, flipped) = if above < 0.0 {
        (frame.y.max(0.0), true)
    } else {
        (above, false)
    };
    let max_x = (viewport.width - width).max(0.0);
    let x = frame.x.clamp(0.0, max_x);

    HighlightLayout {
        frame,
        chip: ChipLayout {
            x,
            y,
            width,
            text: label.to_string(),
            flipped,
        },
    }
}
