use serde::{Deserialize, Serialize};
use soulfill_core_types::{FieldDescriptor, Route, TemplateField};

/// Which clause of the matching predicate accepted the pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchReason {
    /// Probe and an alias contain one another.
    Alias,
    /// A term of an alias and a term of the probe contain one another.
    AliasTerm,
    Label,
    Key,
    /// Predicate held but the template value is empty; nothing to fill.
    EmptyValue,
    NoMatch,
}

impl MatchReason {
    pub fn label(&self) -> &'static str {
        match self {
            MatchReason::Alias => "alias",
            MatchReason::AliasTerm => "alias-term",
            MatchReason::Label => "label",
            MatchReason::Key => "key",
            MatchReason::EmptyValue => "empty-value",
            MatchReason::NoMatch => "no-match",
        }
    }
}

/// One entry per scanned field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub field: FieldDescriptor,
    pub template_field: Option<TemplateField>,
    pub matched: bool,
    pub reason: MatchReason,
}

impl MatchCandidate {
    pub(crate) fn unmatched(field: FieldDescriptor) -> Self {
        Self {
            field,
            template_field: None,
            matched: false,
            reason: MatchReason::NoMatch,
        }
    }

    /// Value to write when the candidate is fillable.
    pub fn fill_value(&self) -> Option<&str> {
        if !self.matched {
            return None;
        }
        self.template_field.as_ref().map(|tf| tf.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub candidates: Vec<MatchCandidate>,
    pub match_count: usize,
    pub total: usize,
    pub confidence: f64,
}

impl MatchReport {
    pub fn from_candidates(candidates: Vec<MatchCandidate>) -> Self {
        let match_count = candidates.iter().filter(|c| c.matched).count();
        let total = candidates.len();
        let confidence = if total == 0 {
            0.0
        } else {
            match_count as f64 / total as f64
        };
        Self {
            candidates,
            match_count,
            total,
            confidence,
        }
    }
}

/// Evaluation of one container from a whole-page scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMatch {
    pub index: usize,
    pub selector: String,
    pub report: MatchReport,
}

/// Output of `match_and_decide`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub route: Route,
    pub candidates: Vec<MatchCandidate>,
    pub match_count: usize,
    pub total: usize,
    pub confidence: f64,
}

impl Decision {
    pub fn from_report(route: Route, report: MatchReport) -> Self {
        Self {
            route,
            candidates: report.candidates,
            match_count: report.match_count,
            total: report.total,
            confidence: report.confidence,
        }
    }
}
