use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::env::LogFormat;
use crate::config::Config;

const LOCAL_ENV_FILE: &str = "config/local.env";
const LOCAL_CONFIG_FILE: &str = "config/soulfill.yaml";

/// Logs go to stderr so structured command output on stdout stays parseable.
pub fn init_logging(level: &str, debug: bool, format: LogFormat) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
    Ok(())
}

/// Exports `KEY=VALUE` lines from `config/local.env` unless the variable is already set.
pub fn load_local_env_overrides() {
    load_env_file(Path::new(LOCAL_ENV_FILE));
}

pub fn load_env_file(path: &Path) {
    if !path.exists() {
        return;
    }
    let contents = match stdfs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read env overrides");
            return;
        }
    };

    let mut applied = 0usize;
    for (idx, raw_line) in contents.lines().enumerate() {
        let Some(entry) = parse_env_line(raw_line) else {
            if !is_blank_or_comment(raw_line) {
                warn!(line = idx + 1, "invalid env entry; skipping");
            }
            continue;
        };
        let (key, value) = entry;
        if env::var(&key).is_ok() {
            continue;
        }
        env::set_var(key, value);
        applied += 1;
    }
    info!(path = %path.display(), applied, "loaded environment overrides");
}

fn is_blank_or_comment(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Parses one `KEY=VALUE` line. Double-quoted values understand `\"`, `\n`, `\r` and `\t`.
pub fn parse_env_line(raw: &str) -> Option<(String, String)> {
    if is_blank_or_comment(raw) {
        return None;
    }
    let line = raw.trim();
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner
            .replace("\\\"", "\"")
            .replace("\\n", "\n")
            .replace("\\r", "\r")
            .replace("\\t", "\t"),
        None => value.to_string(),
    };
    Some((key.to_string(), value))
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub found: bool,
}

/// Priority: `--config` > `./config/soulfill.yaml` > `<config dir>/soulfill/config.yaml`.
pub fn resolve_config_path(explicit: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.clone());
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Ok(local);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("soulfill");
    path.push("config.yaml");
    Ok(path)
}

pub async fn load_config(explicit: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = resolve_config_path(explicit)?;
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            path,
            found: false,
        });
    }

    let content = fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?
    };
    info!(path = %path.display(), "loaded configuration");
    Ok(LoadedConfig {
        config,
        path,
        found: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_lines_parse_with_quotes_and_export() {
        assert_eq!(
            parse_env_line("export SOULFILL_RICH_TEXT_BREAK=\"<br>\\n\""),
            Some(("SOULFILL_RICH_TEXT_BREAK".into(), "<br>\n".into()))
        );
        assert_eq!(
            parse_env_line("  KEY = plain value "),
            Some(("KEY".into(), "plain value".into()))
        );
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line("   "), None);
        assert_eq!(parse_env_line("=orphan"), None);
        assert_eq!(parse_env_line("NOEQUALS"), None);
    }

    #[test]
    fn explicit_config_path_wins() {
        let explicit = PathBuf::from("/etc/custom.yaml");
        assert_eq!(resolve_config_path(Some(&explicit)).unwrap(), explicit);
    }

    #[test]
    fn missing_config_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let loaded = tokio_test::block_on(load_config(Some(&path))).unwrap();
        assert!(!loaded.found);
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soulfill.yaml");
        stdfs::write(
            &path,
            "store_path: /data/t.json\nfill:\n  max_value_len: 12\ninspect:\n  cancel_key: q\n",
        )
        .unwrap();
        let loaded = tokio_test::block_on(load_config(Some(&path))).unwrap();
        assert!(loaded.found);
        assert_eq!(loaded.config.store_path, PathBuf::from("/data/t.json"));
        assert_eq!(loaded.config.fill.max_value_len, 12);
        assert!(loaded.config.fill.escape_markup);
        assert_eq!(loaded.config.inspect.cancel_key, "q");
    }

    #[test]
    #[serial_test::serial]
    fn env_file_does_not_clobber_existing_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.env");
        stdfs::write(
            &path,
            "SOULFILL_TEST_FRESH=from-file\nSOULFILL_TEST_TAKEN=from-file\nnot an entry\n",
        )
        .unwrap();
        env::remove_var("SOULFILL_TEST_FRESH");
        env::set_var("SOULFILL_TEST_TAKEN", "from-shell");

        load_env_file(&path);
        assert_eq!(env::var("SOULFILL_TEST_FRESH").unwrap(), "from-file");
        assert_eq!(env::var("SOULFILL_TEST_TAKEN").unwrap(), "from-shell");

        env::remove_var("SOULFILL_TEST_FRESH");
        env::remove_var("SOULFILL_TEST_TAKEN");
    }

    #[test]
    #[serial_test::serial]
    fn process_environment_overrides_loaded_config() {
        env::set_var(crate::config::ENV_CONFIRM_THRESHOLD, "0.9");
        let mut config = Config::default();
        let applied = config.apply_env_overrides();
        env::remove_var(crate::config::ENV_CONFIRM_THRESHOLD);
        applied.unwrap();
        assert_eq!(config.decision.confirm_threshold, 0.9);
    }
}
