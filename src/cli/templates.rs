use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;
use soulfill_core_types::{Template, TemplateId};
use soulfill_template_store::TemplateStore;
use tokio::fs;
use tracing::info;

use crate::cli::context::CliContext;
use crate::cli::output::emit;

#[derive(Args, Clone, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Subcommand, Clone, Debug)]
pub enum TemplatesCommand {
    /// List stored templates
    List,
    /// Show one template with its fields
    Show {
        /// Template identifier
        id: String,
    },
    /// Import templates from a JSON or YAML file (single object or array)
    Import {
        file: PathBuf,
        /// Mark the last imported template as the default
        #[arg(long)]
        default: bool,
    },
    /// Delete a template by identifier
    Delete { id: String },
    /// Make a template the default one
    SetDefault { id: String },
    /// Show store counters
    Stats,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateFile {
    Many(Vec<Template>),
    One(Template),
}

pub async fn cmd_templates(args: TemplatesArgs, ctx: &CliContext) -> Result<()> {
    match args.command {
        TemplatesCommand::List => cmd_list(ctx).await,
        TemplatesCommand::Show { id } => cmd_show(&id, ctx).await,
        TemplatesCommand::Import { file, default } => cmd_import(&file, default, ctx).await,
        TemplatesCommand::Delete { id } => cmd_delete(&id, ctx).await,
        TemplatesCommand::SetDefault { id } => cmd_set_default(&id, ctx).await,
        TemplatesCommand::Stats => cmd_stats(ctx).await,
    }
}

/// The named template, or the store default when no id is given.
pub(crate) async fn resolve_template(ctx: &CliContext, id: Option<&str>) -> Result<Template> {
    let store = ctx.store().await?;
    match id {
        Some(id) => Ok(store.get(&TemplateId::from(id)).await?),
        None => store.default_template().await?.ok_or_else(|| {
            anyhow!("no default template; pass --template or run `soulfill templates set-default`")
        }),
    }
}

async fn cmd_list(ctx: &CliContext) -> Result<()> {
    let summaries = ctx.store().await?.list().await?;
    if emit(ctx.output(), &summaries)? {
        return Ok(());
    }
    if summaries.is_empty() {
        println!("[no templates stored]");
        return Ok(());
    }
    println!("{:<38} {:<24} {:<7} {:<8}", "ID", "Name", "Fields", "Default");
    println!("{}", "-".repeat(80));
    for summary in summaries {
        println!(
            "{:<38} {:<24} {:<7} {:<8}",
            summary.id,
            summary.name,
            summary.field_count,
            if summary.is_default { "yes" } else { "" }
        );
    }
    Ok(())
}

async fn cmd_stats(ctx: &CliContext) -> Result<()> {
    let store = ctx.store().await?;
    let stats = store.stats_snapshot();
    if emit(ctx.output(), &stats)? {
        return Ok(());
    }
    println!("Template Store Stats:");
    println!("- Templates: {}", stats.current_templates);
    println!("- Times applied: {}", stats.template_uses);
    println!("- Lookups: {}", stats.lookups);
    println!("- Misses: {}", stats.misses);
    println!("- Saves: {}", stats.saves);
    println!("- Deletes: {}", stats.deletes);
    Ok(())
}

async fn cmd_show(id: &str, ctx: &CliContext) -> Result<()> {
    let template = resolve_template(ctx, Some(id)).await?;
    if emit(ctx.output(), &template)? {
        return Ok(());
    }
    println!("{} ({})", template.name, template.id);
    if let Some(description) = &template.description {
        println!("{description}");
    }
    println!();
    println!("{:<24} {:<24} {:<24} Aliases", "Key", "Label", "Value");
    for field in &template.fields {
        println!(
            "{:<24} {:<24} {:<24} {}",
            field.key,
            field.label,
            field.value.replace('\n', "\\n"),
            field.aliases.join(", ")
        );
    }
    Ok(())
}

async fn read_template_file(path: &Path) -> Result<Vec<Template>> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let parsed: TemplateFile = if is_json {
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw).with_context(|| format!("invalid YAML in {}", path.display()))?
    };
    Ok(match parsed {
        TemplateFile::Many(templates) => templates,
        TemplateFile::One(template) => vec![template],
    })
}

async fn cmd_import(path: &Path, make_default: bool, ctx: &CliContext) -> Result<()> {
    let templates = read_template_file(path).await?;
    if templates.is_empty() {
        bail!("no templates defined in {}", path.display());
    }
    let store = ctx.store().await?;
    let count = templates.len();
    let mut saved = Vec::with_capacity(count);
    for (idx, mut template) in templates.into_iter().enumerate() {
        if make_default && idx + 1 == count {
            template.is_default = true;
        }
        saved.push(store.save(template).await?.summary());
    }
    info!(count, path = %path.display(), "templates imported");

    if emit(ctx.output(), &saved)? {
        return Ok(());
    }
    println!("Imported {} template(s) from {}", count, path.display());
    for summary in saved {
        println!("  {}  {}", summary.id, summary.name);
    }
    Ok(())
}

async fn cmd_delete(id: &str, ctx: &CliContext) -> Result<()> {
    ctx.store().await?.delete(&TemplateId::from(id)).await?;
    println!("Removed template '{id}'");
    Ok(())
}

async fn cmd_set_default(id: &str, ctx: &CliContext) -> Result<()> {
    let store = ctx.store().await?;
    let mut template = store.get(&TemplateId::from(id)).await?;
    template.is_default = true;
    let template = store.save(template).await?;
    println!("'{}' is now the default template", template.name);
    Ok(())
}
