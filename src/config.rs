use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{Retry, RetryPolicy};

/// Upper bound on exponential backoff when `max_wait_millis` is not set.
const DEFAULT_MAX_WAIT_MILLIS: u64 = 30_000;

/// Settings for one retry instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Wait before the first retry, in milliseconds. Fixed unless `multiplier` is set.
    pub wait_millis: u64,
    /// Exponential backoff multiplier (>= 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    /// Cap on exponential backoff, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_millis: Option<u64>,
    /// Fail instead of returning the last result when result retries run out.
    pub fail_after_max_attempts: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            wait_millis: 500,
            multiplier: None,
            max_wait_millis: None,
            fail_after_max_attempts: false,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        let wait = Duration::from_millis(self.wait_millis);
        match self.multiplier {
            None => Ok(RetryPolicy::fixed(self.max_attempts, wait)),
            Some(m) if m.is_finite() && m >= 1.0 => {
                let max = self.max_wait_millis.unwrap_or(DEFAULT_MAX_WAIT_MILLIS);
                Ok(RetryPolicy::exponential(
                    self.max_attempts,
                    wait,
                    m,
                    Duration::from_millis(max),
                ))
            }
            Some(m) => bail!("multiplier must be a finite number >= 1.0, got {m}"),
        }
    }

    /// Build a retry instance called `name`, rejecting invalid settings.
    pub fn build(&self, name: &str) -> Result<Retry> {
        Ok(Retry::new(name, self.to_policy()?)
            .fail_after_max_attempts(self.fail_after_max_attempts))
    }
}

/// The `[retry]` section: default settings plus named instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrySection {
    /// Settings used by instances without their own section.
    #[serde(flatten)]
    pub defaults: RetryConfig,
    /// Per-instance overrides, keyed by retry name.
    #[serde(default)]
    pub instances: BTreeMap<String, RetryConfig>,
}

/// Global configuration loaded from `~/.config/flowline/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowlineConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    pub retry: RetrySection,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("flowline")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FlowlineConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FlowlineConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<FlowlineConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: FlowlineConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
