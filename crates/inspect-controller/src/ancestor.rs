use crate::config::InspectConfig;

/// Host-assigned element identity, stable for the lifetime of a page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeHandle(pub u64);

/// Read-only navigation over the page structure.
pub trait ElementTree {
    fn parent(&self, node: NodeHandle) -> Option<NodeHandle>;
    /// Lower-case tag name.
    fn tag(&self, node: NodeHandle) -> String;
    fn attr(&self, node: NodeHandle, name: &str) -> Option<String>;
    /// Fillable controls strictly below `node`.
    fn fillable_descendants(&self, node: NodeHandle) -> usize;
    /// Selector that resolves back to `node`.
    fn selector(&self, node: NodeHandle) -> String;
}

const CONTAINER_ROLES: [&str; 2] = ["form", "dialog"];
const NAMING_HINTS: [&str; 3] = ["form", "dialog", "modal"];

fn is_document_root(tag: &str) -> bool {
    tag == "body" || tag == "html"
}

pub fn is_form_like<T>(tree: &T, node: NodeHandle, config: &InspectConfig) -> bool
where
    T: ElementTree + ?Sized,
{
    if tree.tag(node) == "form" {
        return true;
    }
    if let Some(role) = tree.attr(node, "role") {
        let role = role.trim().to_ascii_lowercase();
        if CONTAINER_ROLES.contains(&role.as_str()) {
            return true;
        }
    }
    let named = ["id", "class"].iter().any(|attr| {
        tree.attr(node, attr)
            .map(|value| {
                let value = value.to_ascii_lowercase();
                NAMING_HINTS.iter().any(|hint| value.contains(hint))
            })
            .unwrap_or(false)
    });
    if named {
        return true;
    }
    tree.fillable_descendants(node) >= config.min_fillable_descendants.max(1)
}

/// Walks up from `start` (inclusive) to the first form-like element. Never yields `body`/`html`.
pub fn nearest_form_like<T>(
    tree: &T,
    start: NodeHandle,
    config: &InspectConfig,
) -> Option<NodeHandle>
where
    T: ElementTree + ?Sized,
{
    let mut current = Some(start);
    while let Some(node) = current {
        if is_document_root(&tree.tag(node)) {
            return None;
        }
        if is_form_like(tree, node, config) {
            return Some(node);
        }
        current = tree.parent(node);
    }
    None
}
