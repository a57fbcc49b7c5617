use std::fmt;

use serde::Serialize;
use soulfill_core_types::{InspectMode, Template};
use uuid::Uuid;

/// Opaque handle for one inspect session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct InspectToken(Uuid);

impl InspectToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InspectToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a committed session, handed to whoever drives the pipeline next.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectCommit {
    pub token: InspectToken,
    pub mode: InspectMode,
    pub selector: String,
    pub pending_template: Option<Template>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InspectEvent {
    Started {
        token: InspectToken,
        mode: InspectMode,
    },
    Committed(InspectCommit),
    Cancelled {
        token: InspectToken,
    },
}

impl InspectEvent {
    pub fn token(&self) -> InspectToken {
        match self {
            InspectEvent::Started { token, .. } | InspectEvent::Cancelled { token } => *token,
            InspectEvent::Committed(commit) => commit.token,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InspectEvent::Started { .. } => "started",
            InspectEvent::Committed(_) => "committed",
            InspectEvent::Cancelled { .. } => "cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ButtonPhase {
    Press,
    Release,
    Click,
}

/// Whether the host must stop the pointer event from reaching the page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerDisposition {
    Suppress,
    PassThrough,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerOutcome {
    pub disposition: PointerDisposition,
    pub commit: Option<InspectCommit>,
}

impl PointerOutcome {
    pub(crate) fn pass() -> Self {
        Self {
            disposition: PointerDisposition::PassThrough,
            commit: None,
        }
    }

    pub(crate) fn suppress(commit: Option<InspectCommit>) -> Self {
        Self {
            disposition: PointerDisposition::Suppress,
            commit,
        }
    }
}
