use super::autofill::cmd_autofill;
use super::config::cmd_config;
use super::env::CliArgs;
use super::fill::cmd_fill;
use super::inspect::cmd_inspect;
use super::match_cmd::cmd_match;
use super::templates::cmd_templates;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Templates(args) => cmd_templates(args, ctx).await,
        Commands::Match(args) => cmd_match(args, ctx).await,
        Commands::Autofill(args) => cmd_autofill(args, ctx).await,
        Commands::Fill(args) => cmd_fill(args, ctx).await,
        Commands::Inspect(args) => cmd_inspect(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
