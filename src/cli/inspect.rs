use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use autofill_flow::InspectCompletion;
use clap::Args;
use inspect_controller::{ButtonPhase, PointerButton};
use serde::Serialize;
use soulfill_core_types::{FillSummary, InspectMode, Point, Template};
use tracing::debug;

use crate::cli::context::CliContext;
use crate::cli::output::{emit, print_summary};
use crate::cli::session::PageSession;
use crate::cli::templates::resolve_template;

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Page fixture (YAML or JSON)
    #[arg(long)]
    pub page: PathBuf,
    /// Session purpose
    #[arg(long, default_value = "import")]
    pub mode: InspectMode,
    /// Template to fill with (fill mode); defaults to the store's default template
    #[arg(long)]
    pub template: Option<String>,
    /// Pointer position `X,Y` in viewport coordinates
    #[arg(long)]
    pub point: Point,
    /// Persist the imported template
    #[arg(long)]
    pub save: bool,
    /// Name for the imported template
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
enum InspectOutput {
    Imported {
        container: String,
        saved: bool,
        template: Template,
    },
    Filled {
        container: String,
        summary: FillSummary,
    },
}

pub async fn cmd_inspect(args: InspectArgs, ctx: &CliContext) -> Result<()> {
    let pending = match args.mode {
        InspectMode::Import => None,
        InspectMode::Fill => Some(resolve_template(ctx, args.template.as_deref()).await?),
    };
    let session = ctx.open_page(&args.page).await?;
    session.service.start_inspect(args.mode, pending)?;
    let completion = drive_inspect(&session, args.point).await?;
    for event in session.inspect_events.events() {
        debug!(kind = event.label(), token = %event.token(), "inspect event");
    }

    let output = match completion {
        InspectCompletion::Imported {
            container,
            mut template,
        } => {
            if let Some(name) = &args.name {
                template.name = name.trim().to_string();
            }
            if args.save {
                template = session.service.save_imported(template).await?;
            }
            InspectOutput::Imported {
                container,
                saved: args.save,
                template,
            }
        }
        InspectCompletion::Filled {
            container, summary, ..
        } => InspectOutput::Filled { container, summary },
    };
    if emit(ctx.output(), &output)? {
        return Ok(());
    }

    match &output {
        InspectOutput::Imported {
            container,
            saved,
            template,
        } => {
            println!(
                "Imported {} field(s) from {container}{}",
                template.fields.len(),
                if *saved { "" } else { " (not saved)" }
            );
            if *saved {
                println!("Saved as {}", template.id);
            }
            for field in &template.fields {
                println!("  {:<28} {}", field.key, field.aliases.join(", "));
            }
        }
        InspectOutput::Filled { container, summary } => {
            println!("Container: {container}");
            print_summary(summary);
        }
    }
    Ok(())
}

/// Hovers `point`, clicks, and continues the pipeline with the committed container. The session
/// is stopped when nothing form-like sits under the pointer.
pub(crate) async fn drive_inspect(session: &PageSession, point: Point) -> Result<InspectCompletion> {
    let controller = session.service.inspect_controller();
    if controller.pointer_move(point).is_none() {
        session.service.stop_inspect();
        bail!("no form-like container under {},{}", point.x, point.y);
    }
    let commit = controller
        .pointer_button(PointerButton::Primary, ButtonPhase::Click)
        .commit
        .context("inspect click did not commit a container")?;
    Ok(session.service.complete_inspect(commit).await?)
}
