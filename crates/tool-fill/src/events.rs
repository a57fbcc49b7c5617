use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use soulfill_core_types::{ActionId, FillResult, FillSummary};
use soulfill_event_bus::EventBus;
use tracing::warn;

use crate::ports::EventsPort;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FillEvent {
    Started {
        action: ActionId,
        attempted: usize,
    },
    Field {
        action: ActionId,
        result: FillResult,
    },
    Finished {
        action: ActionId,
        summary: FillSummary,
    },
}

/// [`EventsPort`] adapter publishing [`FillEvent`]s onto a bus.
pub struct BusEvents {
    bus: Arc<dyn EventBus<FillEvent>>,
}

impl BusEvents {
    pub fn new(bus: Arc<dyn EventBus<FillEvent>>) -> Self {
        Self { bus }
    }

    fn publish(&self, event: FillEvent) {
        if let Err(err) = self.bus.publish(event) {
            warn!(%err, "failed to publish fill event");
        }
    }
}

#[async_trait]
impl EventsPort for BusEvents {
    async fn emit_started(&self, action: &ActionId, attempted: usize) {
        self.publish(FillEvent::Started {
            action: action.clone(),
            attempted,
        });
    }

    async fn emit_field(&self, action: &ActionId, result: &FillResult) {
        self.publish(FillEvent::Field {
            action: action.clone(),
            result: result.clone(),
        });
    }

    async fn emit_finished(&self, action: &ActionId, summary: &FillSummary) {
        self.publish(FillEvent::Finished {
            action: action.clone(),
            summary: summary.clone(),
        });
    }
}
