use std::fmt;

use crate::redact::RedactedValue;

/// One resolved `(selector, value)` pair.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Eq, PartialEq)]
pub struct FillEntry {
    pub selector: String,
    pub value: String,
}

impl FillEntry {
    pub fn new(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for FillEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillEntry")
            .field("selector", &self.selector)
            .field("value", &RedactedValue(&self.value))
            .finish()
    }
}

/// Ordered fill instructions; the only input the fill executor accepts.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FillPlan {
    pub entries: Vec<FillEntry>,
}

impl FillPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, selector: impl Into<String>, value: impl Into<String>) {
        self.entries.push(FillEntry::new(selector, value));
    }

    pub fn with(mut self, selector: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(selector, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FillEntry> {
        self.entries.iter()
    }
}

impl FromIterator<FillEntry> for FillPlan {
    fn from_iter<T: IntoIterator<Item = FillEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Outcome of one attempted plan entry.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FillResult {
    pub selector: String,
    pub success: bool,
    #[cfg_attr(feature = "serde-full", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl FillResult {
    pub fn ok(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(selector: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FillSummary {
    pub filled: usize,
    pub attempted: usize,
    pub per_field: Vec<FillResult>,
}

impl FillSummary {
    pub fn from_results(per_field: Vec<FillResult>) -> Self {
        let filled = per_field.iter().filter(|result| result.success).count();
        Self {
            filled,
            attempted: per_field.len(),
            per_field,
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.filled
    }

    pub fn message(&self) -> String {
        format!("Filled {}/{} fields", self.filled, self.attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_successes() {
        let summary = FillSummary::from_results(vec![
            FillResult::ok("#a"),
            FillResult::failed("#b", "Option not found"),
            FillResult::ok("#c"),
        ]);
        assert_eq!(summary.filled, 2);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.message(), "Filled 2/3 fields");
    }

    #[test]
    fn plan_preserves_insertion_order() {
        let plan = FillPlan::new().with("#b", "2").with("#a", "1");
        let selectors: Vec<_> = plan.iter().map(|e| e.selector.as_str()).collect();
        assert_eq!(selectors, vec!["#b", "#a"]);
    }
}
