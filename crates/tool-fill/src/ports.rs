use async_trait::async_trait;
use soulfill_core_types::{ActionId, FillResult, FillSummary, HostError};

use crate::model::{ElementInfo, Notification};

/// Live page access used by the executor. Every call re-resolves `selector`.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// `None` when the selector resolves to nothing.
    async fn inspect(&self, selector: &str) -> Result<Option<ElementInfo>, HostError>;
    async fn write_value(&self, selector: &str, value: &str) -> Result<(), HostError>;
    async fn write_markup(&self, selector: &str, markup: &str) -> Result<(), HostError>;
    async fn choose_option(&self, selector: &str, index: usize) -> Result<(), HostError>;
    async fn write_checked(&self, selector: &str, checked: bool) -> Result<(), HostError>;
    async fn dispatch(&self, selector: &str, notification: Notification)
        -> Result<(), HostError>;
}

#[async_trait]
pub trait EventsPort: Send + Sync {
    async fn emit_started(&self, action: &ActionId, attempted: usize);
    async fn emit_field(&self, action: &ActionId, result: &FillResult);
    async fn emit_finished(&self, action: &ActionId, summary: &FillSummary);
}

pub trait MetricsPort: Send + Sync {
    fn record_ok(&self, kind: &str);
    fn record_fail(&self, kind: &str);
    fn record_run(&self, latency_ms: u128);
}
