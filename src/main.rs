use anyhow::Result;
use clap::Parser;
use soulfill_cli::cli::runtime::{init_logging, load_config, load_local_env_overrides};
use soulfill_cli::cli::{dispatch, CliArgs, CliContext};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug, cli.log_format)?;
    load_local_env_overrides();
    debug!("Starting SoulFill v{}", env!("CARGO_PKG_VERSION"));

    let result = run(&cli).await;
    match result {
        Ok(()) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(err) => {
            error!("Command failed: {err:#}");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: &CliArgs) -> Result<()> {
    let loaded = load_config(cli.config.as_ref()).await?;
    let mut config = loaded.config;
    config.apply_env_overrides()?;
    config.validate()?;

    let ctx = CliContext::new(config, loaded.path, cli.output);
    dispatch(cli, &ctx).await
}
