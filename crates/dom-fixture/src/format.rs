//! On-disk page description.
//!
//! ```yaml
//! title: Signup
//! root:
//!   tag: body
//!   children:
//!     - tag: form
//!       attrs: { id: signup }
//!       rect: { x: 0, y: 0, width: 400, height: 300 }
//!       children:
//!         - tag: input
//!           attrs: { id: email, name: email, type: email }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use soulfill_core_types::{BoundingBox, Viewport};
use tool_fill::ChoiceOption;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFixture {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub root: NodeSpec,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Document coordinates. Containers without one take the union of their children.
    #[serde(default)]
    pub rect: Option<BoundingBox>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn rect(mut self, rect: BoundingBox) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(ChoiceOption::new(value, text));
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}
