use std::sync::Arc;

use form_matcher::{
    build_plan, manual_plan, match_fields, select_best_container, Decision, DecisionPolicy,
    ManualAssignment,
};
use highlight_overlay::HighlightRenderer;
use inspect_controller::{seed_template, InspectCommit, InspectController, InspectToken};
use soulfill_core_types::{
    FieldDescriptor, FillPlan, FillSummary, FormScan, InspectMode, Route, Template, TemplateId,
};
use soulfill_template_store::TemplateStore;
use tool_fill::{FillCtx, FillError, FillTool};
use tracing::{debug, info, instrument, warn};

use crate::errors::FlowError;
use crate::model::{AutofillOutcome, InspectCompletion, PendingFill, BODY_CONTAINER};
use crate::ports::ScanPort;

const IMPORTED_NAME: &str = "Imported form";

pub struct AutofillServiceBuilder {
    policy: DecisionPolicy,
    store: Option<Arc<dyn TemplateStore>>,
    scanner: Option<Arc<dyn ScanPort>>,
    fill: Option<Arc<dyn FillTool>>,
    inspect: Option<Arc<InspectController>>,
    highlights: Option<Arc<HighlightRenderer>>,
}

impl AutofillServiceBuilder {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self {
            policy,
            store: None,
            scanner: None,
            fill: None,
            inspect: None,
            highlights: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn TemplateStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn ScanPort>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn with_fill(mut self, fill: Arc<dyn FillTool>) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_inspect(mut self, inspect: Arc<InspectController>) -> Self {
        self.inspect = Some(inspect);
        self
    }

    pub fn with_highlights(mut self, highlights: Arc<HighlightRenderer>) -> Self {
        self.highlights = Some(highlights);
        self
    }

    pub fn build(self) -> Result<AutofillService, FlowError> {
        Ok(AutofillService {
            policy: self.policy,
            store: self.store.ok_or(FlowError::MissingComponent("template store"))?,
            scanner: self.scanner.ok_or(FlowError::MissingComponent("scanner"))?,
            fill: self.fill.ok_or(FlowError::MissingComponent("fill tool"))?,
            inspect: self
                .inspect
                .ok_or(FlowError::MissingComponent("inspect controller"))?,
            highlights: self
                .highlights
                .ok_or(FlowError::MissingComponent("highlight renderer"))?,
        })
    }
}

/// Drives one autofill attempt through whichever route the decision policy picks.
///
/// The caller must not run two fills at once; the only shared guard is the inspect session.
pub struct AutofillService {
    policy: DecisionPolicy,
    store: Arc<dyn TemplateStore>,
    scanner: Arc<dyn ScanPort>,
    fill: Arc<dyn FillTool>,
    inspect: Arc<InspectController>,
    highlights: Arc<HighlightRenderer>,
}

impl AutofillService {
    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn inspect_controller(&self) -> &Arc<InspectController> {
        &self.inspect
    }

    pub fn match_and_decide(&self, fields: &[FieldDescriptor], template: &Template) -> Decision {
        form_matcher::match_and_decide(fields, template, &self.policy)
    }

    /// Scans the page, picks the best container and routes it.
    #[instrument(skip_all, fields(template = %template_id))]
    pub async fn autofill(&self, template_id: &TemplateId) -> Result<AutofillOutcome, FlowError> {
        let template = self.store.get(template_id).await?;
        let containers = self.scan_candidates().await?;

        let Some(best) = select_best_container(&containers, &template) else {
            return Err(FlowError::ZeroFieldsDetected);
        };
        let route = self
            .policy
            .decide(best.report.confidence, best.report.match_count);
        info!(
            container = %best.selector,
            route = %route,
            matched = best.report.match_count,
            total = best.report.total,
            "autofill routed"
        );

        let pending = PendingFill {
            template,
            container: best.selector,
            decision: Decision::from_report(route, best.report),
        };
        match route {
            Route::Confirm => {
                let label = format!(
                    "{}: {}/{} fields",
                    pending.template.name, pending.decision.match_count, pending.decision.total
                );
                if let Err(err) = self.highlights.show_preview(&pending.container, &label) {
                    warn!(%err, "preview highlight unavailable");
                }
                Ok(AutofillOutcome::AwaitingConfirm(pending))
            }
            Route::ManualMap => Ok(AutofillOutcome::AwaitingMapping(pending)),
            Route::Inspect => self.enter_inspect(pending.template),
        }
    }

    /// Accepting fills the previewed container; rejecting re-targets through an inspect session
    /// that keeps the template.
    pub async fn resolve_confirm(
        &self,
        pending: PendingFill,
        accepted: bool,
    ) -> Result<AutofillOutcome, FlowError> {
        self.highlights.remove_preview();
        if !accepted {
            debug!(container = %pending.container, "confirm rejected");
            return self.enter_inspect(pending.template);
        }
        let plan = build_plan(&pending.decision.candidates);
        let summary = self
            .run_plan(&pending.template, &pending.container, plan)
            .await?;
        Ok(AutofillOutcome::Filled {
            container: pending.container,
            summary,
        })
    }

    /// Fills with the user's hand-built mapping.
    pub async fn submit_mapping(
        &self,
        pending: PendingFill,
        assignments: &[ManualAssignment],
    ) -> Result<AutofillOutcome, FlowError> {
        let plan = manual_plan(&pending.fields(), &pending.template, assignments)?;
        let summary = self
            .run_plan(&pending.template, &pending.container, plan)
            .await?;
        Ok(AutofillOutcome::Filled {
            container: pending.container,
            summary,
        })
    }

    pub fn start_inspect(
        &self,
        mode: InspectMode,
        pending_template: Option<Template>,
    ) -> Result<InspectToken, FlowError> {
        Ok(self.inspect.start(mode, pending_template)?)
    }

    pub fn stop_inspect(&self) {
        self.inspect.stop();
    }

    /// Continues the pipeline with the container the user picked.
    ///
    /// Import mode returns an unsaved template. Fill mode matches and fills directly without
    /// consulting the decision policy.
    #[instrument(skip_all, fields(mode = commit.mode.label(), container = %commit.selector))]
    pub async fn complete_inspect(
        &self,
        commit: InspectCommit,
    ) -> Result<InspectCompletion, FlowError> {
        let fields = self.scanner.scan_container(Some(&commit.selector)).await?;
        if fields.is_empty() {
            return Err(FlowError::ZeroFieldsDetected);
        }

        match commit.mode {
            InspectMode::Import => {
                let template = seed_template(IMPORTED_NAME, &fields);
                info!(fields = template.fields.len(), "template seeded from page");
                Ok(InspectCompletion::Imported {
                    container: commit.selector,
                    template,
                })
            }
            InspectMode::Fill => {
                let template = commit.pending_template.ok_or(FlowError::MissingTemplate)?;
                let report = match_fields(&fields, &template);
                let plan = build_plan(&report.candidates);
                let summary = self.run_plan(&template, &commit.selector, plan).await?;
                Ok(InspectCompletion::Filled {
                    container: commit.selector,
                    report,
                    summary,
                })
            }
        }
    }

    pub async fn save_imported(&self, template: Template) -> Result<Template, FlowError> {
        Ok(self.store.save(template).await?)
    }

    /// Runs a plan as-is; per-field failures stay in the summary.
    pub async fn execute_fill(&self, plan: FillPlan) -> Result<FillSummary, FlowError> {
        self.fill
            .run(FillCtx::detached(), plan)
            .await
            .map_err(FlowError::Fill)
    }

    /// Non-empty form containers, or the whole page as a single `body` container when there are
    /// none.
    pub async fn scan_candidates(&self) -> Result<Vec<FormScan>, FlowError> {
        let forms: Vec<FormScan> = self
            .scanner
            .scan_whole_forms()
            .await?
            .into_iter()
            .filter(|form| !form.fields.is_empty())
            .collect();
        if !forms.is_empty() {
            return Ok(forms);
        }

        let fields = self.scanner.scan_container(None).await?;
        if fields.is_empty() {
            return Err(FlowError::ZeroFieldsDetected);
        }
        debug!(fields = fields.len(), "no form containers; using whole page");
        Ok(vec![FormScan {
            selector: BODY_CONTAINER.to_string(),
            fields,
        }])
    }

    fn enter_inspect(&self, template: Template) -> Result<AutofillOutcome, FlowError> {
        let token = self
            .inspect
            .start(InspectMode::Fill, Some(template.clone()))?;
        Ok(AutofillOutcome::Inspecting { token, template })
    }

    async fn run_plan(
        &self,
        template: &Template,
        container: &str,
        plan: FillPlan,
    ) -> Result<FillSummary, FlowError> {
        let summary = self.execute_fill(plan).await?;
        let unresolved = summary.attempted > 0
            && summary.per_field.iter().all(|result| {
                result
                    .error
                    .as_deref()
                    .map(FillError::is_no_target_message)
                    .unwrap_or(false)
            });
        if unresolved {
            return Err(FlowError::TargetsUnresolved {
                container: container.to_string(),
            });
        }
        if summary.filled > 0 {
            if let Err(err) = self.store.mark_applied(&template.id).await {
                warn!(%err, "failed to record template usage");
            }
        }
        info!(message = %summary.message(), "fill complete");
        Ok(summary)
    }
}
