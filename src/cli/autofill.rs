use std::path::PathBuf;

use anyhow::{bail, Result};
use autofill_flow::{AutofillOutcome, InspectCompletion, PendingFill};
use clap::Args;
use form_matcher::ManualAssignment;
use serde::Serialize;
use soulfill_core_types::{FillSummary, Point};
use tracing::info;

use crate::cli::context::CliContext;
use crate::cli::inspect::drive_inspect;
use crate::cli::output::{emit, print_decision, print_summary, DecisionView};
use crate::cli::templates::resolve_template;

#[derive(Args, Clone, Debug)]
pub struct AutofillArgs {
    /// Page fixture (YAML or JSON)
    #[arg(long)]
    pub page: PathBuf,
    /// Template identifier; defaults to the store's default template
    #[arg(long)]
    pub template: Option<String>,
    /// Accept the preview when the match lands on the confirm route
    #[arg(long, conflicts_with = "reject")]
    pub accept: bool,
    /// Reject the preview and pick the container by pointer instead
    #[arg(long)]
    pub reject: bool,
    /// Manual mapping `SELECTOR=KEY`; `SELECTOR=` leaves the field untouched
    #[arg(long = "map", value_name = "SELECTOR=KEY", value_parser = parse_assignment)]
    pub mappings: Vec<ManualAssignment>,
    /// Pointer position `X,Y` used when the flow ends up in an inspect session
    #[arg(long)]
    pub point: Option<Point>,
}

/// Where the flow stopped, without template values.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutofillReport {
    status: &'static str,
    container: Option<String>,
    decision: Option<DecisionView>,
    summary: Option<FillSummary>,
}

impl AutofillReport {
    fn waiting(status: &'static str, pending: &PendingFill) -> Self {
        Self {
            status,
            container: Some(pending.container.clone()),
            decision: Some(DecisionView::from(&pending.decision)),
            summary: None,
        }
    }

    fn filled(container: String, summary: FillSummary) -> Self {
        Self {
            status: "filled",
            container: Some(container),
            decision: None,
            summary: Some(summary),
        }
    }
}

pub async fn cmd_autofill(args: AutofillArgs, ctx: &CliContext) -> Result<()> {
    let template = resolve_template(ctx, args.template.as_deref()).await?;
    let session = ctx.open_page(&args.page).await?;

    let mut outcome = session.service.autofill(&template.id).await?;
    let report = loop {
        info!(status = outcome.label(), "autofill step");
        outcome = match outcome {
            AutofillOutcome::AwaitingConfirm(pending) if args.accept || args.reject => {
                session.service.resolve_confirm(pending, args.accept).await?
            }
            AutofillOutcome::AwaitingConfirm(pending) => {
                break AutofillReport::waiting("awaiting-confirm", &pending);
            }
            AutofillOutcome::AwaitingMapping(pending) if !args.mappings.is_empty() => {
                session
                    .service
                    .submit_mapping(pending, &args.mappings)
                    .await?
            }
            AutofillOutcome::AwaitingMapping(pending) => {
                break AutofillReport::waiting("awaiting-mapping", &pending);
            }
            AutofillOutcome::Inspecting { .. } => {
                let Some(point) = args.point else {
                    session.service.stop_inspect();
                    bail!("no container matched well enough; pass --point X,Y to pick one");
                };
                match drive_inspect(&session, point).await? {
                    InspectCompletion::Filled {
                        container, summary, ..
                    } => break AutofillReport::filled(container, summary),
                    InspectCompletion::Imported { .. } => {
                        bail!("inspect session unexpectedly ran in import mode")
                    }
                }
            }
            AutofillOutcome::Filled { container, summary } => {
                break AutofillReport::filled(container, summary);
            }
        };
    };

    if emit(ctx.output(), &report)? {
        return Ok(());
    }
    if let Some(container) = &report.container {
        println!("Container: {container}");
    }
    if let Some(decision) = &report.decision {
        print_decision(decision);
    }
    match (&report.summary, report.status) {
        (Some(summary), _) => print_summary(summary),
        (None, "awaiting-confirm") => println!("Re-run with --accept or --reject."),
        (None, _) => println!("Re-run with --map SELECTOR=KEY for each field to fill."),
    }
    Ok(())
}

/// Splits on the last `=` so attribute selectors keep theirs.
fn parse_assignment(raw: &str) -> Result<ManualAssignment, String> {
    let (selector, key) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SELECTOR=KEY but got '{raw}'"))?;
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(format!("missing selector in '{raw}'"));
    }
    let key = key.trim();
    Ok(if key.is_empty() {
        ManualAssignment::skip(selector)
    } else {
        ManualAssignment::new(selector, key)
    })
}
