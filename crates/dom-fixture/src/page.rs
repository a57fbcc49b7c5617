use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use soulfill_core_types::{FieldDescriptor, FormScan, HostError, Point, Viewport};
use tool_fill::{ElementInfo, Notification};
use tracing::debug;

use crate::dom::{Dom, Node};
use crate::errors::FixtureError;
use crate::format::PageFixture;
use crate::ops::PageOp;
use crate::selector::Selector;

pub(crate) struct PageState {
    pub dom: Dom,
    pub scroll_y: f64,
    pub overlay_installed: bool,
    pub listeners_installed: bool,
    pub ops: Vec<PageOp>,
}

impl PageState {
    pub fn resolve(&self, selector: &str) -> Result<Option<usize>, FixtureError> {
        let parsed = Selector::parse(selector)?;
        Ok(self.dom.query(&parsed))
    }

    /// Resolves for a write; unresolved selectors are reported as detached.
    pub fn require(&self, selector: &str) -> Result<usize, HostError> {
        self.resolve(selector)?
            .ok_or_else(|| HostError::Detached(selector.to_string()))
    }

    pub fn node_mut(&mut self, id: usize) -> Result<&mut Node, HostError> {
        self.dom
            .node_mut(id)
            .ok_or_else(|| HostError::Host(format!("dangling node {id}")))
    }

    pub fn record(&mut self, op: PageOp) {
        self.ops.push(op);
    }
}

/// In-process page built from a fixture file. Implements every host port so the whole pipeline can
/// run without a browser, and records each effect as a [`PageOp`].
pub struct VirtualPage {
    title: Option<String>,
    viewport: Viewport,
    pub(crate) state: Mutex<PageState>,
}

impl VirtualPage {
    pub fn from_fixture(fixture: PageFixture) -> Self {
        Self {
            title: fixture.title,
            viewport: fixture.viewport.unwrap_or_default(),
            state: Mutex::new(PageState {
                dom: Dom::build(&fixture.root),
                scroll_y: 0.0,
                overlay_installed: false,
                listeners_installed: false,
                ops: Vec::new(),
            }),
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, FixtureError> {
        Ok(Self::from_fixture(serde_yaml::from_str(raw)?))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, FixtureError> {
        Ok(Self::from_fixture(serde_json::from_str(raw)?))
    }

    /// Loads `.json` files as JSON and anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let page = if is_json {
            Self::from_json_str(&raw)?
        } else {
            Self::from_yaml_str(&raw)?
        };
        debug!(path = %path.display(), title = ?page.title, "page fixture loaded");
        Ok(page)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn exists(&self, selector: &str) -> Result<bool, FixtureError> {
        Ok(self.state.lock().resolve(selector)?.is_some())
    }

    /// Current value of a value-bound control or the selected option of a choice.
    pub fn value_of(&self, selector: &str) -> Option<String> {
        let state = self.state.lock();
        let id = state.resolve(selector).ok()??;
        state.dom.node(id)?.value.clone()
    }

    pub fn checked(&self, selector: &str) -> Option<bool> {
        let state = self.state.lock();
        let id = state.resolve(selector).ok()??;
        state.dom.node(id).map(|n| n.checked)
    }

    pub fn markup_of(&self, selector: &str) -> Option<String> {
        let state = self.state.lock();
        let id = state.resolve(selector).ok()??;
        state.dom.node(id)?.markup.clone()
    }

    pub fn ops(&self) -> Vec<PageOp> {
        self.state.lock().ops.clone()
    }

    pub fn take_ops(&self) -> Vec<PageOp> {
        std::mem::take(&mut self.state.lock().ops)
    }

    pub fn notifications_for(&self, selector: &str) -> Vec<Notification> {
        self.state
            .lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                PageOp::Notify {
                    selector: target,
                    notification,
                } if target == selector => Some(*notification),
                _ => None,
            })
            .collect()
    }

    pub fn overlay_installed(&self) -> bool {
        self.state.lock().overlay_installed
    }

    pub fn listeners_installed(&self) -> bool {
        self.state.lock().listeners_installed
    }

    /// Removes an element from the page, as a re-render would. Returns `false` when nothing matched.
    pub fn detach(&self, selector: &str) -> Result<bool, FixtureError> {
        let mut state = self.state.lock();
        match state.resolve(selector)? {
            Some(id) => Ok(state.dom.detach(id)),
            None => Ok(false),
        }
    }

    pub fn scroll_by(&self, dy: f64) {
        let mut state = self.state.lock();
        state.scroll_y = (state.scroll_y + dy).max(0.0);
    }

    pub(crate) fn scan(&self, selector: Option<&str>) -> Result<Vec<FieldDescriptor>, HostError> {
        let state = self.state.lock();
        let ids = match selector {
            None => state.dom.fillable_below(0),
            Some(raw) => {
                let container = state.require(raw)?;
                state.dom.fillable_below(container)
            }
        };
        Ok(ids
            .into_iter()
            .filter_map(|id| describe(&state.dom, id))
            .collect())
    }

    pub(crate) fn forms(&self) -> Vec<FormScan> {
        let state = self.state.lock();
        let mut out = Vec::new();
        collect_forms(&state.dom, 0, &mut out);
        out
    }

    pub(crate) fn element_info(&self, selector: &str) -> Option<ElementInfo> {
        let state = self.state.lock();
        let id = match state.resolve(selector) {
            Ok(found) => found?,
            Err(err) => {
                debug!(%err, "selector did not parse; treating as unresolved");
                return None;
            }
        };
        let node = state.dom.node(id)?;
        Some(ElementInfo {
            tag: node.tag.clone(),
            input_type: (node.tag == "input").then(|| node.input_type()),
            content_editable: node.is_content_editable(),
            value_attr: node.attr("value").map(str::to_string),
            options: node.options.clone(),
        })
    }

    pub(crate) fn hit_test(&self, point: Point) -> Option<usize> {
        let state = self.state.lock();
        let doc_point = Point::new(point.x, point.y + state.scroll_y);
        state
            .dom
            .preorder()
            .into_iter()
            .rev()
            .find(|&id| {
                state
                    .dom
                    .effective_rect(id)
                    .map(|rect| rect.contains(doc_point))
                    .unwrap_or(false)
            })
    }
}

fn collect_forms(dom: &Dom, id: usize, out: &mut Vec<FormScan>) {
    if dom.is_form_container(id) {
        out.push(FormScan {
            selector: dom.selector_for(id),
            fields: dom
                .fillable_below(id)
                .into_iter()
                .filter_map(|field| describe(dom, field))
                .collect(),
        });
        return;
    }
    if let Some(node) = dom.node(id) {
        for &child in &node.children {
            collect_forms(dom, child, out);
        }
    }
}

fn describe(dom: &Dom, id: usize) -> Option<FieldDescriptor> {
    let node = dom.node(id)?;
    let field_type = match node.tag.as_str() {
        "input" => node.input_type(),
        "select" if node.attrs.contains_key("multiple") => "select-multiple".to_string(),
        "select" => "select-one".to_string(),
        "textarea" => "textarea".to_string(),
        _ => "contenteditable".to_string(),
    };
    let required = node.attrs.contains_key("required")
        || node
            .attr("aria-required")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

    Some(FieldDescriptor {
        name: node
            .attr("name")
            .or_else(|| node.attr("id"))
            .unwrap_or_default()
            .to_string(),
        field_type,
        label: dom.label_for(id),
        placeholder: node.attr("placeholder").unwrap_or_default().to_string(),
        required,
        selector: dom.selector_for(id),
        value: current_value(node),
    })
}

fn current_value(node: &Node) -> Option<String> {
    if node.is_toggle() {
        return node
            .checked
            .then(|| node.attr("value").unwrap_or("true").to_string());
    }
    if node.tag == "select" {
        return node
            .value
            .clone()
            .or_else(|| node.options.first().map(|opt| opt.value.clone()));
    }
    if node.is_content_editable() && node.tag != "input" && node.tag != "textarea" {
        return node
            .markup
            .clone()
            .or_else(|| node.text.clone())
            .filter(|v| !v.is_empty());
    }
    node.value.clone().filter(|v| !v.is_empty())
}
