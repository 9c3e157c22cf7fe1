use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::models::ALL;
use crate::upload::DEFAULT_ACCEPTED_FORMATS;

pub const CONFIG_ENV_VAR: &str = "STUDENT_RISK_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Dataset loaded in place of the built-in mock students.
    pub data: Option<PathBuf>,
    pub accepted_formats: Vec<String>,
    pub default_class: String,
    pub default_risk: String,
    pub report_out: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: None,
            accepted_formats: DEFAULT_ACCEPTED_FORMATS
                .iter()
                .map(|format| format.to_string())
                .collect(),
            default_class: ALL.to_string(),
            default_risk: ALL.to_string(),
            report_out: PathBuf::from("report.md"),
        }
    }
}

/// Config file location, in priority order:
/// 1. `--config` argument
/// 2. `STUDENT_RISK_CONFIG` environment variable
///
/// `None` means built-in defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    env_value
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

pub fn parse_config(contents: &str) -> anyhow::Result<DashboardConfig> {
    toml::from_str(contents).context("invalid dashboard config")
}

pub fn load_config(cli_arg: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    let Some(path) = resolve_config_path(cli_arg, env_value) else {
        return Ok(DashboardConfig::default());
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("in {}", path.display()))
}
