use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use form_matcher::{evaluate_containers, select_best_container, Decision};
use serde::Serialize;

use crate::cli::context::CliContext;
use crate::cli::output::{emit, percent, print_decision, DecisionView};
use crate::cli::templates::resolve_template;

#[derive(Args, Clone, Debug)]
pub struct MatchArgs {
    /// Page fixture (YAML or JSON)
    #[arg(long)]
    pub page: PathBuf,
    /// Template identifier; defaults to the store's default template
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContainerScore {
    selector: String,
    match_count: usize,
    total: usize,
    confidence: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchOutput {
    template: String,
    containers: Vec<ContainerScore>,
    container: String,
    decision: DecisionView,
}

/// Scores every container without touching the page.
pub async fn cmd_match(args: MatchArgs, ctx: &CliContext) -> Result<()> {
    let template = resolve_template(ctx, args.template.as_deref()).await?;
    let session = ctx.open_page(&args.page).await?;

    let scans = session.service.scan_candidates().await?;
    let containers: Vec<ContainerScore> = evaluate_containers(&scans, &template)
        .into_iter()
        .map(|container| ContainerScore {
            selector: container.selector,
            match_count: container.report.match_count,
            total: container.report.total,
            confidence: container.report.confidence,
        })
        .collect();
    let Some(best) = select_best_container(&scans, &template) else {
        anyhow::bail!("no form fields found on {}", args.page.display());
    };
    let route = session
        .service
        .policy()
        .decide(best.report.confidence, best.report.match_count);
    let decision = Decision::from_report(route, best.report);

    let output = MatchOutput {
        template: template.name.clone(),
        containers,
        container: best.selector,
        decision: DecisionView::from(&decision),
    };
    if emit(ctx.output(), &output)? {
        return Ok(());
    }

    println!("Template: {}", output.template);
    println!("Containers:");
    for score in &output.containers {
        let marker = if score.selector == output.container {
            "*"
        } else {
            " "
        };
        println!(
            " {marker} {:<40} {}/{} ({})",
            score.selector,
            score.match_count,
            score.total,
            percent(score.confidence)
        );
    }
    println!();
    print_decision(&output.decision);
    Ok(())
}
