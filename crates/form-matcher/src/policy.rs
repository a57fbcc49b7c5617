use serde::{Deserialize, Serialize};
use soulfill_core_types::Route;

pub const DEFAULT_CONFIRM_THRESHOLD: f64 = 0.5;

/// Maps aggregate container confidence to an execution route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionPolicy {
    /// Minimum `matched / total` ratio for the confirm route.
    pub confirm_threshold: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            confirm_threshold: DEFAULT_CONFIRM_THRESHOLD,
        }
    }
}

impl DecisionPolicy {
    pub fn with_threshold(confirm_threshold: f64) -> Self {
        Self {
            confirm_threshold: confirm_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn decide(&self, confidence: f64, match_count: usize) -> Route {
        if match_count == 0 {
            Route::Inspect
        } else if confidence >= self.confirm_threshold {
            Route::Confirm
        } else {
            Route::ManualMap
        }
    }
}

/// [`DecisionPolicy::decide`] with the default threshold.
pub fn decide(confidence: f64, match_count: usize) -> Route {
    DecisionPolicy::default().decide(confidence, match_count)
}
