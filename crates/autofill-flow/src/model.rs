use form_matcher::{Decision, MatchReport};
use inspect_controller::InspectToken;
use serde::Serialize;
use soulfill_core_types::{FieldDescriptor, FillSummary, Template};

/// Container name used when the page has no form-like containers.
pub const BODY_CONTAINER: &str = "body";

/// A matched container waiting on the user (confirm or manual mapping).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingFill {
    pub template: Template,
    pub container: String,
    pub decision: Decision,
}

impl PendingFill {
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        self.decision
            .candidates
            .iter()
            .map(|candidate| candidate.field.clone())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AutofillOutcome {
    AwaitingConfirm(PendingFill),
    AwaitingMapping(PendingFill),
    Inspecting {
        token: InspectToken,
        template: Template,
    },
    Filled {
        container: String,
        summary: FillSummary,
    },
}

impl AutofillOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AutofillOutcome::AwaitingConfirm(_) => "awaiting-confirm",
            AutofillOutcome::AwaitingMapping(_) => "awaiting-mapping",
            AutofillOutcome::Inspecting { .. } => "inspecting",
            AutofillOutcome::Filled { .. } => "filled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum InspectCompletion {
    /// Seeded from the committed container; not persisted yet.
    Imported { container: String, template: Template },
    Filled {
        container: String,
        report: MatchReport,
        summary: FillSummary,
    },
}
