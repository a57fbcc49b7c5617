use std::time::Instant;

use soulfill_core_types::{FillEntry, FillPlan, FillResult, FillSummary};
use tracing::{debug, instrument, warn};

use crate::errors::FillError;
use crate::markup;
use crate::model::{find_option, toggle_state, ElementKind, FillCtx};
use crate::policy::FillPolicyView;
use crate::ports::{DomPort, EventsPort, MetricsPort};
use crate::redact;

pub struct RuntimeDeps<'a> {
    pub dom: &'a dyn DomPort,
    pub events: Option<&'a dyn EventsPort>,
    pub metrics: &'a dyn MetricsPort,
    pub policy: &'a FillPolicyView,
}

/// Executes `plan` in order. Per-entry failures are recorded, never returned.
#[instrument(skip_all, fields(action = %ctx.action_id, entries = plan.len()))]
pub async fn execute(
    ctx: &FillCtx,
    plan: &FillPlan,
    deps: RuntimeDeps<'_>,
) -> Result<FillSummary, FillError> {
    if !deps.policy.enabled {
        return Err(FillError::Disabled);
    }

    let started_at = Instant::now();
    if let Some(events) = deps.events {
        events.emit_started(&ctx.action_id, plan.len()).await;
    }

    let mut results = Vec::with_capacity(plan.len());
    for entry in plan.iter() {
        let result = if ctx.cancel.is_cancelled() {
            deps.metrics.record_fail(FillError::Cancelled.kind());
            FillResult::failed(&entry.selector, FillError::Cancelled.to_string())
        } else {
            match fill_entry(entry, &deps).await {
                Ok(kind) => {
                    deps.metrics.record_ok(kind.label());
                    FillResult::ok(&entry.selector)
                }
                Err(err) => {
                    warn!(selector = %entry.selector, error = %err, "field fill failed");
                    deps.metrics.record_fail(err.kind());
                    FillResult::failed(&entry.selector, err.to_string())
                }
            }
        };
        if let Some(events) = deps.events {
            events.emit_field(&ctx.action_id, &result).await;
        }
        results.push(result);
    }

    let summary = FillSummary::from_results(results);
    deps.metrics.record_run(started_at.elapsed().as_millis());
    if let Some(events) = deps.events {
        events.emit_finished(&ctx.action_id, &summary).await;
    }
    debug!(filled = summary.filled, attempted = summary.attempted, "fill finished");
    Ok(summary)
}

async fn fill_entry(entry: &FillEntry, deps: &RuntimeDeps<'_>) -> Result<ElementKind, FillError> {
    let selector = entry.selector.as_str();
    let value = entry.value.as_str();

    let info = deps
        .dom
        .inspect(selector)
        .await?
        .ok_or_else(|| FillError::NoActiveTarget(selector.to_string()))?;

    let len = redact::value_len(value);
    if len > deps.policy.max_value_len {
        return Err(FillError::ValueTooLong {
            len,
            max: deps.policy.max_value_len,
        });
    }
    let kind = info.kind();
    debug!(
        selector,
        kind = kind.label(),
        value_len = len,
        value_hash = %redact::value_hash(value),
        "filling field"
    );

    match kind {
        ElementKind::RichText => {
            let rendered = markup::render(value, deps.policy);
            deps.dom.write_markup(selector, &rendered).await?;
        }
        ElementKind::Choice => {
            let index = find_option(&info.options, value).ok_or(FillError::OptionNotFound)?;
            deps.dom.choose_option(selector, index).await?;
        }
        ElementKind::Toggle => {
            let checked = toggle_state(value, info.value_attr.as_deref());
            deps.dom.write_checked(selector, checked).await?;
        }
        ElementKind::Value => {
            deps.dom.write_value(selector, value).await?;
        }
    }

    for notification in kind.notifications() {
        deps.dom.dispatch(selector, *notification).await?;
    }
    Ok(kind)
}
