//! Port implementations over [`VirtualPage`].

use async_trait::async_trait;
use autofill_flow::ScanPort;
use highlight_overlay::{HighlightLayout, OverlayPort, Slot};
use inspect_controller::{ElementTree, InspectSurface, NodeHandle};
use soulfill_core_types::{BoundingBox, FieldDescriptor, FormScan, HostError, Point, Viewport};
use tool_fill::{DomPort, ElementInfo, Notification};

use crate::ops::PageOp;
use crate::page::VirtualPage;

fn index(node: NodeHandle) -> usize {
    node.0 as usize
}

#[async_trait]
impl DomPort for VirtualPage {
    async fn inspect(&self, selector: &str) -> Result<Option<ElementInfo>, HostError> {
        Ok(self.element_info(selector))
    }

    async fn write_value(&self, selector: &str, value: &str) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let id = state.require(selector)?;
        state.node_mut(id)?.value = Some(value.to_string());
        state.record(PageOp::SetValue {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn write_markup(&self, selector: &str, markup: &str) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let id = state.require(selector)?;
        state.node_mut(id)?.markup = Some(markup.to_string());
        state.record(PageOp::SetMarkup {
            selector: selector.to_string(),
            markup: markup.to_string(),
        });
        Ok(())
    }

    async fn choose_option(&self, selector: &str, index: usize) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let id = state.require(selector)?;
        let node = state.node_mut(id)?;
        let option = node.options.get(index).cloned().ok_or_else(|| {
            HostError::Unsupported(format!("option index {index} out of range for {selector}"))
        })?;
        node.value = Some(option.value);
        state.record(PageOp::ChooseOption {
            selector: selector.to_string(),
            index,
        });
        Ok(())
    }

    async fn write_checked(&self, selector: &str, checked: bool) -> Result<(), HostError> {
        let mut state = self.state.lock();
        let id = state.require(selector)?;
        state.node_mut(id)?.checked = checked;
        if checked {
            state.dom.clear_radio_group(id);
        }
        state.record(PageOp::SetChecked {
            selector: selector.to_string(),
            checked,
        });
        Ok(())
    }

    async fn dispatch(&self, selector: &str, notification: Notification) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.require(selector)?;
        state.record(PageOp::Notify {
            selector: selector.to_string(),
            notification,
        });
        Ok(())
    }
}

#[async_trait]
impl ScanPort for VirtualPage {
    async fn scan_container(
        &self,
        selector: Option<&str>,
    ) -> Result<Vec<FieldDescriptor>, HostError> {
        self.scan(selector)
    }

    async fn scan_whole_forms(&self) -> Result<Vec<FormScan>, HostError> {
        Ok(self.forms())
    }
}

impl OverlayPort for VirtualPage {
    fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>, HostError> {
        let state = self.state.lock();
        let Some(id) = state.resolve(selector)? else {
            return Ok(None);
        };
        Ok(state
            .dom
            .effective_rect(id)
            .map(|rect| BoundingBox::new(rect.x, rect.y - state.scroll_y, rect.width, rect.height)))
    }

    fn viewport(&self) -> Viewport {
        VirtualPage::viewport(self)
    }

    fn draw(&self, slot: Slot, layout: &HighlightLayout) -> Result<(), HostError> {
        self.state.lock().record(PageOp::Draw {
            slot,
            frame: layout.frame,
            label: layout.chip.text.clone(),
        });
        Ok(())
    }

    fn clear(&self, slot: Slot) -> Result<(), HostError> {
        self.state.lock().record(PageOp::Clear { slot });
        Ok(())
    }
}

impl ElementTree for VirtualPage {
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        let state = self.state.lock();
        state
            .dom
            .node(index(node))?
            .parent
            .map(|p| NodeHandle(p as u64))
    }

    fn tag(&self, node: NodeHandle) -> String {
        self.state
            .lock()
            .dom
            .node(index(node))
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    fn attr(&self, node: NodeHandle, name: &str) -> Option<String> {
        self.state
            .lock()
            .dom
            .node(index(node))?
            .attr(name)
            .map(str::to_string)
    }

    fn fillable_descendants(&self, node: NodeHandle) -> usize {
        self.state.lock().dom.fillable_below(index(node)).len()
    }

    fn selector(&self, node: NodeHandle) -> String {
        self.state.lock().dom.selector_for(index(node))
    }
}

impl InspectSurface for VirtualPage {
    fn element_at(&self, point: Point) -> Option<NodeHandle> {
        self.hit_test(point).map(|id| NodeHandle(id as u64))
    }

    fn install_overlay(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.overlay_installed = true;
        state.record(PageOp::InstallOverlay);
        Ok(())
    }

    fn remove_overlay(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.overlay_installed = false;
        state.record(PageOp::RemoveOverlay);
        Ok(())
    }

    fn install_listeners(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.listeners_installed = true;
        state.record(PageOp::InstallListeners);
        Ok(())
    }

    fn remove_listeners(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        state.listeners_installed = false;
        state.record(PageOp::RemoveListeners);
        Ok(())
    }
}
