use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use autofill_flow::{AutofillService, AutofillServiceBuilder};
use highlight_overlay::HighlightRenderer;
use inspect_controller::{InspectController, InspectEvent};
use soulfill_dom_fixture::VirtualPage;
use soulfill_event_bus::{EventBus, RecordingBus};
use soulfill_template_store::TemplateStore;
use tool_fill::{BusEvents, FillEvent, FillMetrics, FillTool, FillToolBuilder};
use tracing::debug;

use crate::config::Config;

const EVENT_CAPACITY: usize = 256;

/// Everything one command needs to drive a fixture page.
pub struct PageSession {
    pub page: Arc<VirtualPage>,
    pub service: AutofillService,
    pub fill: Arc<dyn FillTool>,
    pub metrics: Arc<FillMetrics>,
    pub fill_events: Arc<RecordingBus<FillEvent>>,
    pub inspect_events: Arc<RecordingBus<InspectEvent>>,
}

impl PageSession {
    pub fn open(fixture: &Path, config: &Config, store: Arc<dyn TemplateStore>) -> Result<Self> {
        let page = Arc::new(
            VirtualPage::load(fixture)
                .with_context(|| format!("failed to load page {}", fixture.display()))?,
        );
        debug!(title = ?page.title(), "page opened");

        let fill_events = RecordingBus::<FillEvent>::new(EVENT_CAPACITY);
        let fill_bus: Arc<dyn EventBus<FillEvent>> = fill_events.clone();
        let inspect_events = RecordingBus::<InspectEvent>::new(EVENT_CAPACITY);
        let inspect_bus: Arc<dyn EventBus<InspectEvent>> = inspect_events.clone();
        let metrics = Arc::new(FillMetrics::default());

        let fill = FillToolBuilder::new(config.fill.clone())
            .with_dom(page.clone())
            .with_events(Arc::new(BusEvents::new(fill_bus)))
            .with_metrics(metrics.clone())
            .build()?;

        let highlights = Arc::new(HighlightRenderer::new(page.clone()));
        let inspect = Arc::new(InspectController::new(
            page.clone(),
            highlights.clone(),
            inspect_bus,
            config.inspect.clone(),
        ));

        let service = AutofillServiceBuilder::new(config.decision.clone())
            .with_store(store)
            .with_scanner(page.clone())
            .with_fill(fill.clone())
            .with_inspect(inspect)
            .with_highlights(highlights)
            .build()?;

        Ok(Self {
            page,
            service,
            fill,
            metrics,
            fill_events,
            inspect_events,
        })
    }
}
