use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::layout::{layout, HighlightLayout};
use crate::{HighlightError, OverlayPort, Slot};

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveHighlight {
    pub selector: String,
    pub label: String,
    pub layout: HighlightLayout,
}

/// Keeps at most one highlight per [`Slot`] and redraws them on scroll or resize.
pub struct HighlightRenderer {
    port: Arc<dyn OverlayPort>,
    active: Mutex<BTreeMap<Slot, ActiveHighlight>>,
}

impl HighlightRenderer {
    pub fn new(port: Arc<dyn OverlayPort>) -> Self {
        Self {
            port,
            active: Mutex::new(BTreeMap::new()),
        }
    }

    /// Draws `selector` into `slot`, silently replacing whatever the slot showed before.
    pub fn show(&self, slot: Slot, selector: &str, label: &str) -> Result<(), HighlightError> {
        let Some(target) = self.port.bounding_box(selector)? else {
            self.remove(slot);
            return Err(HighlightError::TargetMissing(selector.to_string()));
        };
        let computed = layout(target, self.port.viewport(), label);

        let mut active = self.active.lock();
        if active.contains_key(&slot) {
            self.port.clear(slot)?;
        }
        self.port.draw(slot, &computed)?;
        active.insert(
            slot,
            ActiveHighlight {
                selector: selector.to_string(),
                label: label.to_string(),
                layout: computed,
            },
        );
        debug!(slot = slot.label(), selector, "highlight shown");
        Ok(())
    }

    pub fn show_preview(&self, selector: &str, label: &str) -> Result<(), HighlightError> {
        self.show(Slot::Preview, selector, label)
    }

    /// Safe to call when nothing is shown.
    pub fn remove(&self, slot: Slot) {
        let removed = self.active.lock().remove(&slot);
        if removed.is_some() {
            if let Err(err) = self.port.clear(slot) {
                warn!(slot = slot.label(), %err, "failed to clear highlight");
            }
        }
    }

    pub fn remove_preview(&self) {
        self.remove(Slot::Preview);
    }

    pub fn clear_all(&self) {
        let slots: Vec<Slot> = self.active.lock().keys().copied().collect();
        for slot in slots {
            self.remove(slot);
        }
    }

    pub fn active(&self, slot: Slot) -> Option<ActiveHighlight> {
        self.active.lock().get(&slot).cloned()
    }

    /// Recomputes every active highlight from live geometry. Highlights whose target vanished are
    /// removed. Returns how many are still shown.
    pub fn reposition(&self) -> usize {
        let snapshot: Vec<(Slot, ActiveHighlight)> = self
            .active
            .lock()
            .iter()
            .map(|(slot, h)| (*slot, h.clone()))
            .collect();

        let viewport = self.port.viewport();
        let mut shown = 0;
        for (slot, highlight) in snapshot {
            match self.port.bounding_box(&highlight.selector) {
                Ok(Some(target)) => {
                    let computed = layout(target, viewport, &highlight.label);
                    if computed == highlight.layout {
                        shown += 1;
                        continue;
                    }
                    if let Err(err) = self.port.draw(slot, &computed) {
                        warn!(slot = slot.label(), %err, "failed to redraw highlight");
                        continue;
                    }
                    if let Some(entry) = self.active.lock().get_mut(&slot) {
                        entry.layout = computed;
                    }
                    shown += 1;
                }
                Ok(None) | Err(_) => {
                    debug!(slot = slot.label(), selector = %highlight.selector, "highlight target gone");
                    self.remove(slot);
                }
            }
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulfill_core_types::{BoundingBox, HostError, Viewport};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSurface {
        boxes: Mutex<HashMap<String, BoundingBox>>,
        log: Mutex<Vec<String>>,
    }

    impl FakeSurface {
        fn place(&self, selector: &str, b: BoundingBox) {
            self.boxes.lock().insert(selector.to_string(), b);
        }
    }

    impl OverlayPort for FakeSurface {
        fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>, HostError> {
            Ok(self.boxes.lock().get(selector).copied())
        }

        fn viewport(&self) -> Viewport {
            Viewport::default()
        }

        fn draw(&self, slot: Slot, layout: &HighlightLayout) -> Result<(), HostError> {
            self.log
                .lock()
                .push(format!("draw {} {}", slot.label(), layout.chip.text));
            Ok(())
        }

        fn clear(&self, slot: Slot) -> Result<(), HostError> {
            self.log.lock().push(format!("clear {}", slot.label()));
            Ok(())
        }
    }

    fn renderer() -> (Arc<FakeSurface>, HighlightRenderer) {
        let surface = Arc::new(FakeSurface::default());
        surface.place("#a", BoundingBox::new(50.0, 100.0, 200.0, 100.0));
        surface.place("#b", BoundingBox::new(50.0, 300.0, 200.0, 100.0));
        (surface.clone(), HighlightRenderer::new(surface))
    }

    #[test]
    fn new_preview_replaces_previous() {
        let (surface, renderer) = renderer();
        renderer.show_preview("#a", "3/4 matched").unwrap();
        renderer.show_preview("#b", "2/2 matched").unwrap();
        assert_eq!(renderer.active(Slot::Preview).unwrap().selector, "#b");
        assert_eq!(
            *surface.log.lock(),
            vec![
                "draw preview 3/4 matched",
                "clear preview",
                "draw preview 2/2 matched"
            ]
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let (surface, renderer) = renderer();
        renderer.remove_preview();
        renderer.show_preview("#a", "x").unwrap();
        renderer.remove_preview();
        renderer.remove_preview();
        assert_eq!(surface.log.lock().len(), 2);
        assert!(renderer.active(Slot::Preview).is_none());
    }

    #[test]
    fn slots_are_independent() {
        let (_, renderer) = renderer();
        renderer.show_preview("#a", "p").unwrap();
        renderer.show(Slot::InspectFrame, "#b", "form").unwrap();
        renderer.remove(Slot::InspectFrame);
        assert!(renderer.active(Slot::Preview).is_some());
    }

    #[test]
    fn missing_target_is_an_error() {
        let (_, renderer) = renderer();
        let err = renderer.show_preview("#nope", "x").unwrap_err();
        assert_eq!(err, HighlightError::TargetMissing("#nope".into()));
    }

    #[test]
    fn reposition_follows_geometry_and_drops_vanished_targets() {
        let (surface, renderer) = renderer();
        renderer.show_preview("#a", "p").unwrap();
        renderer.show(Slot::InspectFrame, "#b", "f").unwrap();

        surface.place("#a", BoundingBox::new(50.0, 40.0, 200.0, 100.0));
        surface.boxes.lock().remove("#b");
        assert_eq!(renderer.reposition(), 1);

        let preview = renderer.active(Slot::Preview).unwrap();
        assert_eq!(preview.layout.frame.y, 36.0);
        assert!(renderer.active(Slot::InspectFrame).is_none());
    }
}
