use std::fmt;

use crate::redact::RedactedValue;
use crate::slug::{canonical_key, normalize_aliases, slugify};
use crate::TemplateId;

/// One labelled value inside a template, with the aliases used to recognise it on a page.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Default, Eq, PartialEq)]
pub struct TemplateField {
    pub key: String,
    pub label: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub value: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub aliases: Vec<String>,
}

impl TemplateField {
    /// Builds a field whose key is derived from `label`.
    pub fn new<I, S>(label: impl Into<String>, value: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let label = label.into();
        let key = slugify(&label);
        let aliases = normalize_aliases(aliases, &key);
        Self {
            key,
            label,
            value: value.into(),
            aliases,
        }
    }

    /// Re-applies the key/alias invariants in place.
    pub fn normalize(&mut self) {
        self.key = canonical_key(&self.key);
        if self.key.is_empty() {
            self.key = slugify(&self.label);
        }
        let raw = std::mem::take(&mut self.aliases);
        self.aliases = normalize_aliases(raw, &self.key);
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

impl fmt::Debug for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateField")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("value", &RedactedValue(&self.value))
            .field("aliases", &self.aliases)
            .finish()
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Template {
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub id: TemplateId,
    pub name: String,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub is_default: bool,
    #[cfg_attr(feature = "serde-full", serde(default))]
    pub fields: Vec<TemplateField>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TemplateId::default(),
            name: name.into(),
            description: None,
            is_default: false,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: TemplateField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Returns a copy whose fields all satisfy the key/alias invariants.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        for field in &mut self.fields {
            field.normalize();
        }
        self
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_default: self.is_default,
            field_count: self.fields.len(),
        }
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub field_count: usize,
}
