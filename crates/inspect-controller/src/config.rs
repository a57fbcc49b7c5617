use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Key name that cancels an active session.
    pub cancel_key: String,
    /// Fillable descendants that make an otherwise anonymous ancestor a form.
    pub min_fillable_descendants: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            cancel_key: "Escape".to_string(),
            min_fillable_descendants: 2,
        }
    }
}
