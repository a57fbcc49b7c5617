use std::sync::Arc;

use highlight_overlay::{HighlightRenderer, Slot};
use parking_lot::Mutex;
use soulfill_core_types::{HostError, InspectMode, Point, Template};
use soulfill_event_bus::EventBus;
use tracing::{debug, info, warn};

use crate::ancestor::{nearest_form_like, ElementTree, NodeHandle};
use crate::config::InspectConfig;
use crate::errors::InspectError;
use crate::fsm::{transition, Effect, Input, SessionState};
use crate::model::{
    ButtonPhase, InspectCommit, InspectEvent, InspectToken, PointerButton, PointerOutcome,
};

/// Page capabilities an inspect session needs besides drawing the frame.
pub trait InspectSurface: ElementTree + Send + Sync {
    /// Topmost element under `point`, ignoring the inspect overlay itself.
    fn element_at(&self, point: Point) -> Option<NodeHandle>;
    fn install_overlay(&self) -> Result<(), HostError>;
    fn remove_overlay(&self) -> Result<(), HostError>;
    fn install_listeners(&self) -> Result<(), HostError>;
    fn remove_listeners(&self) -> Result<(), HostError>;
}

/// Owns the single inspect session. `start` and `stop` are the only ways in and out.
pub struct InspectController {
    surface: Arc<dyn InspectSurface>,
    highlights: Arc<HighlightRenderer>,
    bus: Arc<dyn EventBus<InspectEvent>>,
    config: InspectConfig,
    state: Mutex<SessionState>,
}

impl InspectController {
    pub fn new(
        surface: Arc<dyn InspectSurface>,
        highlights: Arc<HighlightRenderer>,
        bus: Arc<dyn EventBus<InspectEvent>>,
        config: InspectConfig,
    ) -> Self {
        Self {
            surface,
            highlights,
            bus,
            config,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_active()
    }

    pub fn mode(&self) -> Option<InspectMode> {
        match &*self.state.lock() {
            SessionState::Active(session) => Some(session.mode),
            SessionState::Idle => None,
        }
    }

    /// Selector currently framed, if any.
    pub fn target(&self) -> Option<String> {
        match &*self.state.lock() {
            SessionState::Active(session) => session.target.clone(),
            SessionState::Idle => None,
        }
    }

    pub fn start(
        &self,
        mode: InspectMode,
        pending_template: Option<Template>,
    ) -> Result<InspectToken, InspectError> {
        let token = InspectToken::new();
        self.apply(Input::Start {
            token,
            mode,
            pending_template,
        })?;
        info!(%token, mode = mode.label(), "inspect session started");
        Ok(token)
    }

    /// Ends any session. Safe to call at any time.
    pub fn stop(&self) {
        if let Err(err) = self.apply(Input::Stop) {
            warn!(%err, "inspect stop failed");
        }
    }

    /// Re-targets the frame to the nearest form-like ancestor under `point`.
    pub fn pointer_move(&self, point: Point) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let target = self
            .surface
            .element_at(point)
            .and_then(|node| nearest_form_like(self.surface.as_ref(), node, &self.config))
            .map(|node| self.surface.selector(node));
        if let Err(err) = self.apply(Input::Hover {
            target: target.clone(),
        }) {
            warn!(%err, "inspect hover failed");
        }
        target
    }

    /// Routes a button event. While active every primary event is suppressed; a primary click
    /// commits the framed target.
    pub fn pointer_button(&self, button: PointerButton, phase: ButtonPhase) -> PointerOutcome {
        if !self.is_active() || button != PointerButton::Primary {
            return PointerOutcome::pass();
        }
        if phase != ButtonPhase::Click {
            return PointerOutcome::suppress(None);
        }
        match self.apply(Input::Commit) {
            Ok(commit) => PointerOutcome::suppress(commit),
            Err(err) => {
                warn!(%err, "inspect commit failed");
                PointerOutcome::suppress(None)
            }
        }
    }

    /// Returns `true` when the key cancelled the session.
    pub fn key_down(&self, key: &str) -> bool {
        if !self.is_active() || key != self.config.cancel_key {
            return false;
        }
        debug!(key, "inspect cancel key");
        self.apply(Input::Cancel).is_ok()
    }

    /// Scroll or resize while active.
    pub fn viewport_changed(&self) {
        if self.is_active() {
            self.highlights.reposition();
        }
    }

    fn apply(&self, input: Input) -> Result<Option<InspectCommit>, InspectError> {
        let effects = {
            let mut state = self.state.lock();
            let current = std::mem::take(&mut *state);
            match transition(current.clone(), input) {
                Ok((next, effects)) => {
                    *state = next;
                    effects
                }
                Err(err) => {
                    *state = current;
                    return Err(err);
                }
            }
        };
        Ok(self.perform(effects))
    }

    fn perform(&self, effects: Vec<Effect>) -> Option<InspectCommit> {
        let mut commit = None;
        for effect in effects {
            let outcome = match &effect {
                Effect::InstallOverlay => self.surface.install_overlay(),
                Effect::InstallListeners => self.surface.install_listeners(),
                Effect::RemoveListeners => self.surface.remove_listeners(),
                Effect::RemoveOverlay => self.surface.remove_overlay(),
                Effect::Frame { selector } => {
                    let label = self.frame_label();
                    if let Err(err) = self.highlights.show(Slot::InspectFrame, selector, &label) {
                        debug!(%err, selector = %selector, "inspect frame not drawn");
                    }
                    Ok(())
                }
                Effect::HideFrame => {
                    self.highlights.remove(Slot::InspectFrame);
                    Ok(())
                }
                Effect::Publish(event) => {
                    if let InspectEvent::Committed(done) = event {
                        info!(token = %done.token, selector = %done.selector, "inspect committed");
                        commit = Some(done.clone());
                    }
                    if let Err(err) = self.bus.publish(event.clone()) {
                        warn!(%err, "failed to publish inspect event");
                    }
                    Ok(())
                }
            };
            if let Err(err) = outcome {
                warn!(?effect, %err, "inspect surface effect failed");
            }
        }
        commit
    }

    fn frame_label(&self) -> String {
        match self.mode() {
            Some(InspectMode::Import) => "Import this form".to_string(),
            Some(InspectMode::Fill) => "Fill this form".to_string(),
            None => String::new(),
        }
    }
}
