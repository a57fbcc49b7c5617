use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPolicyView {
    pub enabled: bool,
    /// Longest value (in chars) written to a single element.
    pub max_value_len: usize,
    /// Markup inserted for each newline in rich-text regions.
    pub line_break_markup: String,
    /// HTML-escape rich-text values before inserting line breaks.
    pub escape_markup: bool,
}

impl Default for FillPolicyView {
    fn default() -> Self {
        Self {
            enabled: true,
            max_value_len: 10_000,
            line_break_markup: "<br>".to_string(),
            escape_markup: true,
        }
    }
}
