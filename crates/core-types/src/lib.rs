#![allow(dead_code)]

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

pub mod field;
pub mod geometry;
pub mod host;
pub mod plan;
pub mod redact;
pub mod slug;
pub mod template;

pub use field::{FieldDescriptor, FormScan};
pub use geometry::{BoundingBox, Point, Viewport};
pub use host::HostError;
pub use plan::{FillEntry, FillPlan, FillResult, FillSummary};
pub use redact::RedactedValue;
pub use slug::{canonical_key, normalize_aliases, slugify};
pub use template::{Template, TemplateField, TemplateSummary};

/// Shared error type crossing crate boundaries through host ports.
#[derive(Debug, Error, Clone)]
pub enum SoulError {
    #[error("{message}")]
    Message { message: String },
}

impl SoulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution route picked by the decision policy for a scanned container.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Route {
    Confirm,
    ManualMap,
    Inspect,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Confirm => "confirm",
            Route::ManualMap => "manual-map",
            Route::Inspect => "inspect",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Purpose of an inspect session.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InspectMode {
    Import,
    Fill,
}

impl InspectMode {
    pub fn label(&self) -> &'static str {
        match self {
            InspectMode::Import => "import",
            InspectMode::Fill => "fill",
        }
    }
}

impl fmt::Display for InspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for InspectMode {
    type Err = SoulError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "import" => Ok(InspectMode::Import),
            "fill" => Ok(InspectMode::Fill),
            other => Err(SoulError::new(format!("unknown inspect mode: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_mode_parses_case_insensitively() {
        assert_eq!("Import".parse::<InspectMode>().unwrap(), InspectMode::Import);
        assert_eq!(" fill ".parse::<InspectMode>().unwrap(), InspectMode::Fill);
        assert!("hover".parse::<InspectMode>().is_err());
    }

    #[test]
    fn template_ids_are_unique() {
        assert_ne!(TemplateId::new(), TemplateId::new());
        assert!(TemplateId::default().is_empty());
    }
}
