use serde::{Deserialize, Serialize};
use soulfill_core_types::ActionId;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
pub struct FillCtx {
    pub action_id: ActionId,
    pub cancel: CancellationToken,
}

impl FillCtx {
    pub fn new(action_id: ActionId, cancel: CancellationToken) -> Self {
        Self { action_id, cancel }
    }

    /// Fresh action id with a token nobody else holds.
    pub fn detached() -> Self {
        Self::new(ActionId::new(), CancellationToken::new())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default)]
    pub text: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// What the host reports about a resolved element before it is written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag: String,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub content_editable: bool,
    /// The element's own `value` attribute; toggles compare against it.
    #[serde(default)]
    pub value_attr: Option<String>,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl ElementInfo {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> ElementKind {
        let tag = self.tag.to_ascii_lowercase();
        if tag == "select" {
            return ElementKind::Choice;
        }
        if tag == "input" {
            let input_type = self
                .input_type
                .as_deref()
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if input_type == "checkbox" || input_type == "radio" {
                return ElementKind::Toggle;
            }
        }
        if self.content_editable && tag != "input" && tag != "textarea" {
            return ElementKind::RichText;
        }
        ElementKind::Value
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Free-form editable region (contenteditable).
    RichText,
    /// Dropdown with options.
    Choice,
    /// Checkbox or radio.
    Toggle,
    /// Any value-bound input, including plain textareas.
    Value,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::RichText => "rich-text",
            ElementKind::Choice => "choice",
            ElementKind::Toggle => "toggle",
            ElementKind::Value => "value",
        }
    }

    /// Notifications dispatched after the write, in order.
    pub fn notifications(&self) -> &'static [Notification] {
        match self {
            ElementKind::Toggle => &[Notification::Input, Notification::Change],
            ElementKind::RichText | ElementKind::Choice | ElementKind::Value => {
                &[Notification::Input, Notification::Change, Notification::Blur]
            }
        }
    }
}

/// Synthetic signal dispatched so reactive front-ends observe a programmatic write.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Notification {
    Input,
    Change,
    Blur,
}

impl Notification {
    pub fn label(&self) -> &'static str {
        match self {
            Notification::Input => "input",
            Notification::Change => "change",
            Notification::Blur => "blur",
        }
    }
}

/// Index of the option whose value equals `target`, or whose text equals it ignoring case.
pub fn find_option(options: &[ChoiceOption], target: &str) -> Option<usize> {
    let wanted = target.to_lowercase();
    options
        .iter()
        .position(|opt| opt.value == target)
        .or_else(|| {
            options
                .iter()
                .position(|opt| opt.text.trim().to_lowercase() == wanted)
        })
}

pub fn toggle_state(target: &str, value_attr: Option<&str>) -> bool {
    target == "true" || target == "1" || value_attr == Some(target)
}
