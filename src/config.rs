use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use form_matcher::DecisionPolicy;
use inspect_controller::InspectConfig;
use serde::{Deserialize, Serialize};
use tool_fill::FillPolicyView;
use tracing::info;

pub const ENV_STORE_PATH: &str = "SOULFILL_STORE_PATH";
pub const ENV_CONFIRM_THRESHOLD: &str = "SOULFILL_CONFIRM_THRESHOLD";
pub const ENV_RICH_TEXT_BREAK: &str = "SOULFILL_RICH_TEXT_BREAK";

/// Contents of `soulfill.yaml`. Every section is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// JSON file backing the template store.
    pub store_path: PathBuf,
    pub decision: DecisionPolicy,
    pub fill: FillPolicyView,
    pub inspect: InspectConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./soulfill-data/templates.json"),
            decision: DecisionPolicy::default(),
            fill: FillPolicyView::default(),
            inspect: InspectConfig::default(),
        }
    }
}

impl Config {
    /// Applies `SOULFILL_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_STORE_PATH).filter(|v| !v.trim().is_empty()) {
            info!(path = %path, "template store path overridden from environment");
            self.store_path = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup(ENV_CONFIRM_THRESHOLD) {
            let threshold: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CONFIRM_THRESHOLD} must be a number, got `{raw}`"))?;
            self.decision = DecisionPolicy::with_threshold(threshold);
        }
        if let Some(markup) = lookup(ENV_RICH_TEXT_BREAK) {
            self.fill.line_break_markup = markup;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.decision.confirm_threshold) {
            bail!(
                "decision.confirm_threshold must be within 0..=1, got {}",
                self.decision.confirm_threshold
            );
        }
        if self.fill.max_value_len == 0 {
            bail!("fill.max_value_len must be positive");
        }
        if self.inspect.cancel_key.trim().is_empty() {
            bail!("inspect.cancel_key must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("decision:\n  confirm_threshold: 0.8\n").unwrap();
        assert_eq!(config.decision.confirm_threshold, 0.8);
        assert_eq!(config.fill, FillPolicyView::default());
        assert_eq!(config.inspect.cancel_key, "Escape");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[
                (ENV_STORE_PATH, "/tmp/t.json"),
                (ENV_CONFIRM_THRESHOLD, "1.7"),
                (ENV_RICH_TEXT_BREAK, "<br/>"),
            ]))
            .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/t.json"));
        assert_eq!(config.decision.confirm_threshold, 1.0);
        assert_eq!(config.fill.line_break_markup, "<br/>");
    }

    #[test]
    fn unparsable_threshold_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides_from(lookup(&[(ENV_CONFIRM_THRESHOLD, "high")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_CONFIRM_THRESHOLD));
    }

    #[test]
    fn validation_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.decision.confirm_threshold = 1.5;
        assert!(config.validate().is_err());
    }
}
