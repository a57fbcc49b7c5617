use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::{Map, Value as JsonValue};
use tokio::fs;
use tracing::info;

use crate::cli::context::CliContext;
use crate::cli::output::emit;
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file plus environment overrides)
    Show,

    /// Print the configuration file path in use
    Path,

    /// Get a configuration value, e.g. `decision.confirm_threshold`
    Get {
        /// Dotted configuration key
        key: String,
    },

    /// Set a configuration value in the configuration file
    Set {
        /// Dotted configuration key
        key: String,

        /// New value; parsed as JSON when possible
        value: String,
    },

    /// Write the defaults to the configuration file
    Reset,

    /// Validate the configuration file
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path().to_path_buf();
    match args.action {
        ConfigAction::Show => {
            if !emit(ctx.output(), ctx.config())? {
                println!("Effective configuration ({}):", path.display());
                print!("{}", serde_yaml::to_string(ctx.config())?);
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(ctx.config())?;
            let segments = split_key(&key)?;
            let Some(value) = get_json_value(&json, &segments) else {
                bail!("{key} not found in configuration");
            };
            if !emit(ctx.output(), value)? {
                print!("{}", serde_yaml::to_string(value)?);
            }
        }
        ConfigAction::Set { key, value } => {
            let config = load_config_file(&path).await?;
            let mut json = serde_json::to_value(&config)?;
            let segments = split_key(&key)?;
            set_json_value(&mut json, &segments, parse_cli_value(&value))?;
            let config: Config = serde_json::from_value(json)
                .with_context(|| format!("{key} does not accept {value}"))?;
            config.validate()?;
            save_config_file(&path, &config).await?;
            info!(key = %key, "configuration updated");
            println!("Saved configuration to {}", path.display());
        }
        ConfigAction::Reset => {
            save_config_file(&path, &Config::default()).await?;
            println!(
                "Configuration reset to defaults and written to {}",
                path.display()
            );
        }
        ConfigAction::Validate => {
            if fs::try_exists(&path).await? {
                load_config_file(&path).await?.validate()?;
                println!("Configuration file {} is valid", path.display());
            } else {
                println!(
                    "No configuration file at {}; defaults are valid",
                    path.display()
                );
            }
        }
    }

    Ok(())
}

async fn load_config_file(path: &Path) -> Result<Config> {
    if !fs::try_exists(path).await? {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

async fn save_config_file(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, serde_yaml::to_string(config)?)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn parse_cli_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        bail!("configuration key cannot be empty");
    }
    Ok(segments)
}

fn set_json_value(target: &mut JsonValue, path: &[&str], value: JsonValue) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        bail!("configuration key cannot be empty");
    };
    let mut current = target;
    for segment in parents {
        current = ensure_object(current, segment)?
            .entry((*segment).to_string())
            .or_insert(JsonValue::Null);
    }
    ensure_object(current, last)?.insert((*last).to_string(), value);
    Ok(())
}

fn ensure_object<'a>(
    value: &'a mut JsonValue,
    segment: &str,
) -> Result<&'a mut Map<String, JsonValue>> {
    if value.is_null() {
        *value = JsonValue::Object(Map::new());
    }
    match value {
        JsonValue::Object(map) => Ok(map),
        _ => bail!("{segment} resolves to a non-object value; cannot assign nested configuration"),
    }
}

fn get_json_value<'a>(value: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    path.iter()
        .try_fold(value, |current, segment| current.as_object()?.get(*segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get_nested_keys() {
        let mut doc = json!({});
        set_json_value(
            &mut doc,
            &["decision", "confirm_threshold"],
            JsonValue::from(0.8),
        )
        .unwrap();
        set_json_value(&mut doc, &["fill", "line_break_markup"], json!("\n")).unwrap();
        assert_eq!(
            get_json_value(&doc, &["decision", "confirm_threshold"]),
            Some(&JsonValue::from(0.8))
        );
        assert_eq!(get_json_value(&doc, &["fill", "missing"]), None);
    }

    #[test]
    fn scalar_parents_are_rejected() {
        let mut doc = json!({ "store_path": "x.json" });
        let err = set_json_value(&mut doc, &["store_path", "nested"], json!(1)).unwrap_err();
        assert!(err.to_string().contains("store_path"));
    }

    #[test]
    fn threshold_set_through_json_round_trips() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        set_json_value(
            &mut json,
            &["decision", "confirm_threshold"],
            parse_cli_value("0.75"),
        )
        .unwrap();
        let config: Config = serde_json::from_value(json).unwrap();
        assert_eq!(config.decision.confirm_threshold, 0.75);
    }
}
