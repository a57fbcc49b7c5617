/// Canonical shape of one fillable element reported by a page scan.
///
/// Descriptors are produced fresh per scan and never persisted; `selector` is re-validated at fill
/// time rather than trusted across reloads.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldDescriptor {
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde-full", serde(default, rename = "type"))]
    pub field_type: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub label: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub placeholder: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub required: bool,
    pub selector: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub value: Option<String>,
}

impl FieldDescriptor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    /// `name + label + placeholder`, space-joined, empty parts omitted.
    pub fn probe(&self) -> String {
        [
            self.name.as_str(),
            self.label.as_str(),
            self.placeholder.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Best human-facing caption for the field.
    pub fn caption(&self) -> &str {
        [&self.label, &self.placeholder, &self.name]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// One top-level form-like container and the fields scanned inside it.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormScan {
    pub selector: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub fields: Vec<FieldDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_skips_missing_parts_in_order() {
        let field = FieldDescriptor::new("#e")
            .with_name("user_email")
            .with_placeholder("Your email");
        assert_eq!(field.probe(), "user_email Your email");

        let bare = FieldDescriptor::new("#x");
        assert_eq!(bare.probe(), "");
    }

    #[test]
    fn caption_prefers_label() {
        let field = FieldDescriptor::new("#p")
            .with_name("tel")
            .with_label("Phone")
            .with_placeholder("555-0100");
        assert_eq!(field.caption(), "Phone");
        assert_eq!(FieldDescriptor::new("#n").with_name("zip").caption(), "zip");
    }
}
