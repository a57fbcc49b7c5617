use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use soulfill_core_types::{ActionId, FillPlan, FillSummary};
use tokio_util::sync::CancellationToken;
use tool_fill::{FillCtx, FillEvent, FillMetricsSnapshot};
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::cli::output::{emit, print_summary};

#[derive(Args, Clone, Debug)]
pub struct FillArgs {
    /// Page fixture (YAML or JSON)
    #[arg(long)]
    pub page: PathBuf,
    /// Fill plan: a JSON or YAML list of `{selector, value}` entries
    #[arg(long)]
    pub plan: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FillOutput {
    action_id: String,
    summary: FillSummary,
    metrics: FillMetricsSnapshot,
    events: Vec<FillEvent>,
}

/// Runs a plan straight through the fill executor. Ctrl-C cancels the remaining entries.
pub async fn cmd_fill(args: FillArgs, ctx: &CliContext) -> Result<()> {
    let raw = tokio::fs::read_to_string(&args.plan)
        .await
        .with_context(|| format!("failed to read plan {}", args.plan.display()))?;
    let plan: FillPlan = serde_yaml::from_str(&raw)
        .with_context(|| format!("invalid fill plan {}", args.plan.display()))?;
    let session = ctx.open_page(&args.page).await?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; cancelling fill");
                cancel.cancel();
            }
        })
    };
    let action_id = ActionId::new();
    info!(action = %action_id, entries = plan.entries.len(), "running fill plan");
    let result = session
        .fill
        .run(FillCtx::new(action_id.clone(), cancel), plan)
        .await;
    watcher.abort();
    let summary = result?;

    let output = FillOutput {
        action_id: action_id.to_string(),
        summary,
        metrics: session.metrics.snapshot(),
        events: session.fill_events.drain(),
    };
    if emit(ctx.output(), &output)? {
        return Ok(());
    }
    print_summary(&output.summary);
    println!(
        "Metrics: {} attempted, {} filled, {} failed in {} ms",
        output.metrics.attempted,
        output.metrics.filled,
        output.metrics.failed,
        output.metrics.last_latency_ms
    );
    println!("Events: {} published", output.events.len());
    Ok(())
}
