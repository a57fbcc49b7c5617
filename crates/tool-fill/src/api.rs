use std::sync::Arc;

use async_trait::async_trait;
use soulfill_core_types::{FillPlan, FillSummary, SoulError};

use crate::errors::FillError;
use crate::metrics::FillMetrics;
use crate::model::FillCtx;
use crate::policy::FillPolicyView;
use crate::ports::{DomPort, EventsPort, MetricsPort};
use crate::runner::{execute, RuntimeDeps};

#[async_trait]
pub trait FillTool: Send + Sync {
    async fn run(&self, ctx: FillCtx, plan: FillPlan) -> Result<FillSummary, SoulError>;
}

pub struct FillToolBuilder {
    policy: FillPolicyView,
    dom: Option<Arc<dyn DomPort>>,
    events: Option<Arc<dyn EventsPort>>,
    metrics: Option<Arc<dyn MetricsPort>>,
}

impl FillToolBuilder {
    pub fn new(policy: FillPolicyView) -> Self {
        Self {
            policy,
            dom: None,
            events: None,
            metrics: None,
        }
    }

    pub fn with_dom(mut self, port: Arc<dyn DomPort>) -> Self {
        self.dom = Some(port);
        self
    }

    pub fn with_events(mut self, port: Arc<dyn EventsPort>) -> Self {
        self.events = Some(port);
        self
    }

    pub fn with_metrics(mut self, port: Arc<dyn MetricsPort>) -> Self {
        self.metrics = Some(port);
        self
    }

    pub fn build(self) -> Result<Arc<dyn FillTool>, FillError> {
        let dom = self.dom.ok_or(FillError::MissingPort("dom"))?;
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(FillMetrics::default()));
        Ok(Arc::new(FillToolImpl {
            policy: self.policy,
            dom,
            events: self.events,
            metrics,
        }))
    }
}

struct FillToolImpl {
    policy: FillPolicyView,
    dom: Arc<dyn DomPort>,
    events: Option<Arc<dyn EventsPort>>,
    metrics: Arc<dyn MetricsPort>,
}

#[async_trait]
impl FillTool for FillToolImpl {
    async fn run(&self, ctx: FillCtx, plan: FillPlan) -> Result<FillSummary, SoulError> {
        let runtime = RuntimeDeps {
            dom: self.dom.as_ref(),
            events: self.events.as_deref(),
            metrics: self.metrics.as_ref(),
            policy: &self.policy,
        };

        execute(&ctx, &plan, runtime).await.map_err(Into::into)
    }
}
