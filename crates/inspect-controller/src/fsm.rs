//! Inspect session state machine.
//!
//! [`transition`] is pure: it takes the current state and an input and returns the next state with
//! the side effects the controller must perform, in order.

use soulfill_core_types::{InspectMode, Template};

use crate::errors::InspectError;
use crate::model::{InspectCommit, InspectEvent, InspectToken};

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSession {
    pub token: InspectToken,
    pub mode: InspectMode,
    pub pending_template: Option<Template>,
    /// Selector of the form-like ancestor currently framed.
    pub target: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Start {
        token: InspectToken,
        mode: InspectMode,
        pending_template: Option<Template>,
    },
    /// Pointer moved; `target` is the nearest form-like ancestor, if any.
    Hover {
        target: Option<String>,
    },
    /// Primary click.
    Commit,
    /// Cancel key.
    Cancel,
    Stop,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    InstallOverlay,
    InstallListeners,
    RemoveListeners,
    RemoveOverlay,
    Frame { selector: String },
    HideFrame,
    Publish(InspectEvent),
}

fn teardown() -> Vec<Effect> {
    vec![Effect::HideFrame, Effect::RemoveListeners, Effect::RemoveOverlay]
}

pub fn transition(
    state: SessionState,
    input: Input,
) -> Result<(SessionState, Vec<Effect>), InspectError> {
    match (state, input) {
        (
            SessionState::Idle,
            Input::Start {
                token,
                mode,
                pending_template,
            },
        ) => Ok((
            SessionState::Active(ActiveSession {
                token,
                mode,
                pending_template,
                target: None,
            }),
            vec![
                Effect::InstallOverlay,
                Effect::InstallListeners,
                Effect::Publish(InspectEvent::Started { token, mode }),
            ],
        )),
        (SessionState::Active(session), Input::Start { .. }) => {
            Err(InspectError::SessionConflict(session.mode))
        }

        (SessionState::Active(mut session), Input::Hover { target }) => {
            if session.target == target {
                return Ok((SessionState::Active(session), Vec::new()));
            }
            let effect = match &target {
                Some(selector) => Effect::Frame {
                    selector: selector.clone(),
                },
                None => Effect::HideFrame,
            };
            session.target = target;
            Ok((SessionState::Active(session), vec![effect]))
        }

        (SessionState::Active(session), Input::Commit) => {
            let Some(selector) = session.target.clone() else {
                // Nothing framed: swallow the click and keep targeting.
                return Ok((SessionState::Active(session), Vec::new()));
            };
            let mut effects = teardown();
            effects.push(Effect::Publish(InspectEvent::Committed(InspectCommit {
                token: session.token,
                mode: session.mode,
                selector,
                pending_template: session.pending_template,
            })));
            Ok((SessionState::Idle, effects))
        }

        (SessionState::Active(session), Input::Cancel | Input::Stop) => {
            let mut effects = teardown();
            effects.push(Effect::Publish(InspectEvent::Cancelled {
                token: session.token,
            }));
            Ok((SessionState::Idle, effects))
        }

        // Stop from Idle still tears down whatever a broken host may have left behind.
        (SessionState::Idle, Input::Stop) => Ok((SessionState::Idle, teardown())),

        (SessionState::Idle, Input::Hover { .. } | Input::Commit | Input::Cancel) => {
            Ok((SessionState::Idle, Vec::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(mode: InspectMode) -> (InspectToken, SessionState) {
        let token = InspectToken::new();
        let (state, effects) = transition(
            SessionState::Idle,
            Input::Start {
                token,
                mode,
                pending_template: None,
            },
        )
        .unwrap();
        assert_eq!(effects[0], Effect::InstallOverlay);
        assert_eq!(effects[1], Effect::InstallListeners);
        (token, state)
    }

    fn hover(state: SessionState, target: Option<&str>) -> (SessionState, Vec<Effect>) {
        transition(
            state,
            Input::Hover {
                target: target.map(str::to_string),
            },
        )
        .unwrap()
    }

    #[test]
    fn second_start_is_rejected_and_session_kept() {
        let (_, state) = start(InspectMode::Fill);
        let err = transition(
            state.clone(),
            Input::Start {
                token: InspectToken::new(),
                mode: InspectMode::Import,
                pending_template: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, InspectError::SessionConflict(InspectMode::Fill));
        assert!(state.is_active());
    }

    #[test]
    fn hover_frames_only_on_change() {
        let (_, state) = start(InspectMode::Import);
        let (state, effects) = hover(state, Some("#signup"));
        assert_eq!(
            effects,
            vec![Effect::Frame {
                selector: "#signup".into()
            }]
        );
        let (state, effects) = hover(state, Some("#signup"));
        assert!(effects.is_empty());
        let (_, effects) = hover(state, None);
        assert_eq!(effects, vec![Effect::HideFrame]);
    }

    #[test]
    fn commit_without_target_keeps_session() {
        let (_, state) = start(InspectMode::Import);
        let (state, effects) = transition(state, Input::Commit).unwrap();
        assert!(state.is_active());
        assert!(effects.is_empty());
    }

    #[test]
    fn commit_tears_down_then_publishes() {
        let template = Template::new("Work");
        let token = InspectToken::new();
        let (state, _) = transition(
            SessionState::Idle,
            Input::Start {
                token,
                mode: InspectMode::Fill,
                pending_template: Some(template.clone()),
            },
        )
        .unwrap();
        let (state, _) = hover(state, Some("#billing"));
        let (state, effects) = transition(state, Input::Commit).unwrap();
        assert_eq!(state, SessionState::Idle);
        assert_eq!(&effects[..3], teardown().as_slice());
        assert_eq!(
            effects[3],
            Effect::Publish(InspectEvent::Committed(InspectCommit {
                token,
                mode: InspectMode::Fill,
                selector: "#billing".into(),
                pending_template: Some(template),
            }))
        );
    }

    #[test]
    fn cancel_returns_to_idle_with_marker() {
        let (token, state) = start(InspectMode::Fill);
        let (state, effects) = transition(state, Input::Cancel).unwrap();
        assert_eq!(state, SessionState::Idle);
        assert_eq!(
            effects.last(),
            Some(&Effect::Publish(InspectEvent::Cancelled { token }))
        );
    }

    #[test]
    fn idle_inputs_are_inert() {
        for input in [
            Input::Hover {
                target: Some("#x".into()),
            },
            Input::Commit,
            Input::Cancel,
        ] {
            let (state, effects) = transition(SessionState::Idle, input).unwrap();
            assert_eq!(state, SessionState::Idle);
            assert!(effects.is_empty());
        }
        let (state, effects) = transition(SessionState::Idle, Input::Stop).unwrap();
        assert_eq!(state, SessionState::Idle);
        assert!(effects.iter().all(|e| !matches!(e, Effect::Publish(_))));
    }
}
