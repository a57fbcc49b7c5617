use std::collections::BTreeMap;

use soulfill_core_types::BoundingBox;
use tool_fill::ChoiceOption;

use crate::format::NodeSpec;
use crate::selector::Selector;

const SKIPPED_INPUT_TYPES: [&str; 6] = ["hidden", "submit", "button", "image", "reset", "file"];
const CONTAINER_ROLES: [&str; 2] = ["form", "dialog"];
const NAMING_HINTS: [&str; 3] = ["form", "dialog", "modal"];

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub rect: Option<BoundingBox>,
    pub value: Option<String>,
    pub checked: bool,
    pub markup: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn input_type(&self) -> String {
        self.attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    pub fn is_toggle(&self) -> bool {
        self.tag == "input" && matches!(self.input_type().as_str(), "checkbox" | "radio")
    }

    pub fn is_content_editable(&self) -> bool {
        self.attr("contenteditable")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
    }
}

/// Element arena. Index 0 is the document root.
#[derive(Clone, Debug)]
pub(crate) struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub fn build(root: &NodeSpec) -> Self {
        let mut dom = Self { nodes: Vec::new() };
        dom.push(root, None);
        dom
    }

    fn push(&mut self, spec: &NodeSpec, parent: Option<usize>) -> usize {
        let tag = spec.tag.trim().to_ascii_lowercase();
        let attrs: BTreeMap<String, String> = spec
            .attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect();
        let toggle = tag == "input"
            && attrs
                .get("type")
                .map(|t| matches!(t.to_ascii_lowercase().as_str(), "checkbox" | "radio"))
                .unwrap_or(false);
        let value = if toggle {
            spec.value.clone()
        } else {
            spec.value.clone().or_else(|| attrs.get("value").cloned())
        };
        let checked = spec.checked.unwrap_or_else(|| attrs.contains_key("checked"));

        let id = self.nodes.len();
        self.nodes.push(Node {
            tag,
            attrs,
            text: spec.text.clone(),
            rect: spec.rect,
            value,
            checked,
            markup: None,
            options: spec.options.clone(),
            parent,
            children: Vec::new(),
        });
        for child in &spec.children {
            let child_id = self.push(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }

    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Attached elements in document order.
    pub fn preorder(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk(0, &mut out);
        out
    }

    /// Strict descendants of `id` in document order.
    pub fn descendants(&self, id: usize) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(node) = self.node(id) {
            for &child in &node.children {
                self.walk(child, &mut out);
            }
        }
        out
    }

    fn walk(&self, id: usize, out: &mut Vec<usize>) {
        if let Some(node) = self.node(id) {
            out.push(id);
            for &child in &node.children {
                self.walk(child, out);
            }
        }
    }

    pub fn ancestors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.node(id).and_then(|n| n.parent), move |&p| {
            self.node(p).and_then(|n| n.parent)
        })
    }

    pub fn child_index(&self, id: usize) -> Option<usize> {
        let parent = self.node(id)?.parent?;
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == id)
            .map(|pos| pos + 1)
    }

    pub fn query(&self, selector: &Selector) -> Option<usize> {
        self.preorder()
            .into_iter()
            .find(|&id| selector.matches(self, id))
    }

    /// Selector that resolves back to `id`: a unique `#id`, otherwise an `nth-child` path anchored
    /// at the nearest uniquely identified ancestor or the root.
    pub fn selector_for(&self, id: usize) -> String {
        let mut steps = Vec::new();
        let mut current = id;
        loop {
            if let Some(unique) = self.unique_id_selector(current) {
                steps.push(unique);
                break;
            }
            let Some(node) = self.node(current) else {
                break;
            };
            match (node.parent, self.child_index(current)) {
                (Some(parent), Some(index)) => {
                    steps.push(format!("{}:nth-child({index})", node.tag));
                    current = parent;
                }
                _ => {
                    steps.push(node.tag.clone());
                    break;
                }
            }
        }
        steps.reverse();
        steps.join(" > ")
    }

    fn unique_id_selector(&self, id: usize) -> Option<String> {
        let value = self.node(id)?.attr("id")?;
        let plain = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !plain {
            return None;
        }
        let count = self
            .preorder()
            .into_iter()
            .filter(|&n| self.node(n).and_then(|node| node.attr("id")) == Some(value))
            .count();
        (count == 1).then(|| format!("#{value}"))
    }

    pub fn is_fillable(&self, id: usize) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.attrs.contains_key("disabled") {
            return false;
        }
        match node.tag.as_str() {
            "input" => !SKIPPED_INPUT_TYPES.contains(&node.input_type().as_str()),
            "select" | "textarea" => true,
            _ => node.is_content_editable(),
        }
    }

    pub fn fillable_below(&self, id: usize) -> Vec<usize> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.is_fillable(n))
            .collect()
    }

    /// Explicit form containers used by the whole-page scan. The document root never qualifies.
    pub fn is_form_container(&self, id: usize) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if matches!(node.tag.as_str(), "body" | "html") {
            return false;
        }
        if node.tag == "form" {
            return true;
        }
        if let Some(role) = node.attr("role") {
            if CONTAINER_ROLES.contains(&role.trim().to_ascii_lowercase().as_str()) {
                return true;
            }
        }
        ["id", "class"].iter().any(|attr| {
            node.attr(attr)
                .map(|v| {
                    let v = v.to_ascii_lowercase();
                    NAMING_HINTS.iter().any(|hint| v.contains(hint))
                })
                .unwrap_or(false)
        })
    }

    /// Own rectangle, or the union of the children's when the node has none.
    pub fn effective_rect(&self, id: usize) -> Option<BoundingBox> {
        let node = self.node(id)?;
        if node.rect.is_some() {
            return node.rect;
        }
        node.children
            .iter()
            .filter_map(|&child| self.effective_rect(child))
            .reduce(union)
    }

    pub fn text_content(&self, id: usize) -> String {
        let mut ids = vec![id];
        ids.extend(self.descendants(id));
        ids.into_iter()
            .filter_map(|n| self.node(n).and_then(|node| node.text.as_deref()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `label[for]`, then an enclosing `label`, then `aria-label`.
    pub fn label_for(&self, id: usize) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        if let Some(own_id) = node.attr("id") {
            let explicit = self.preorder().into_iter().find(|&n| {
                self.node(n)
                    .map(|l| l.tag == "label" && l.attr("for") == Some(own_id))
                    .unwrap_or(false)
            });
            if let Some(label) = explicit {
                let text = self.text_content(label);
                if !text.is_empty() {
                    return text;
                }
            }
        }
        let wrapping = self
            .ancestors(id)
            .find(|&a| self.node(a).map(|n| n.tag == "label").unwrap_or(false));
        if let Some(label) = wrapping {
            let text = self.text_content(label);
            if !text.is_empty() {
                return text;
            }
        }
        node.attr("aria-label")
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Unlinks `id` from its parent. The root cannot be detached.
    pub fn detach(&mut self, id: usize) -> bool {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Unchecks every other radio sharing `id`'s name.
    pub fn clear_radio_group(&mut self, id: usize) {
        let Some(name) = self
            .node(id)
            .filter(|n| n.tag == "input" && n.input_type() == "radio")
            .and_then(|n| n.attr("name"))
            .map(str::to_string)
        else {
            return;
        };
        for other in self.preorder() {
            if other == id {
                continue;
            }
            if let Some(node) = self.node_mut(other) {
                if node.tag == "input"
                    && node.input_type() == "radio"
                    && node.attr("name") == Some(name.as_str())
                {
                    node.checked = false;
                }
            }
        }
    }
}

fn union(a: BoundingBox, b: BoundingBox) -> BoundingBox {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    BoundingBox::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom() -> Dom {
        let root = NodeSpec::new("body")
            .child(
                NodeSpec::new("form")
                    .attr("id", "signup")
                    .child(NodeSpec::new("label").attr("for", "email").text("E-mail"))
                    .child(NodeSpec::new("input").attr("id", "email"))
                    .child(
                        NodeSpec::new("label")
                            .text("Phone")
                            .child(NodeSpec::new("input").attr("name", "tel")),
                    )
                    .child(NodeSpec::new("input").attr("type", "hidden"))
                    .child(NodeSpec::new("input").attr("disabled", "")),
            )
            .child(
                NodeSpec::new("div")
                    .child(NodeSpec::new("div").attr("contenteditable", "true"))
                    .child(NodeSpec::new("div").attr("id", "dup"))
                    .child(NodeSpec::new("div").attr("id", "dup")),
            );
        Dom::build(&root)
    }

    fn find(dom: &Dom, raw: &str) -> usize {
        dom.query(&Selector::parse(raw).unwrap()).unwrap()
    }

    #[test]
    fn generated_selectors_round_trip() {
        let dom = dom();
        for id in dom.preorder() {
            let selector = dom.selector_for(id);
            assert_eq!(find(&dom, &selector), id, "{selector}");
        }
        assert_eq!(dom.selector_for(find(&dom, "#email")), "#email");
        let dup = find(&dom, "#dup");
        assert_eq!(dom.selector_for(dup), "body > div:nth-child(2) > div:nth-child(2)");
    }

    #[test]
    fn fillable_controls_skip_hidden_and_disabled() {
        let dom = dom();
        let form = find(&dom, "#signup");
        assert_eq!(dom.fillable_below(form).len(), 2);
        assert_eq!(dom.fillable_below(0).len(), 3);
    }

    #[test]
    fn labels_resolve_explicit_then_wrapping() {
        let dom = dom();
        assert_eq!(dom.label_for(find(&dom, "#email")), "E-mail");
        assert_eq!(dom.label_for(find(&dom, "input[name=tel]")), "Phone");
    }

    #[test]
    fn detached_nodes_stop_resolving() {
        let mut dom = dom();
        let email = find(&dom, "#email");
        assert!(dom.detach(email));
        assert!(dom.query(&Selector::parse("#email").unwrap()).is_none());
        assert!(!dom.detach(0));
    }

    #[test]
    fn containers_without_rect_use_children_union() {
        let root = NodeSpec::new("body").child(
            NodeSpec::new("form")
                .child(NodeSpec::new("input").rect(BoundingBox::new(10.0, 10.0, 100.0, 20.0)))
                .child(NodeSpec::new("input").rect(BoundingBox::new(10.0, 50.0, 200.0, 20.0))),
        );
        let dom = Dom::build(&root);
        assert_eq!(
            dom.effective_rect(1),
            Some(BoundingBox::new(10.0, 10.0, 200.0, 60.0))
        );
    }
}
