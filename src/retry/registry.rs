//! Named retry instances built from configuration.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};

use super::{Retry, RetryPolicy};
use crate::config::FlowlineConfig;

/// Hands out one shared [`Retry`] per name.
///
/// Names with a `[retry.instances.<name>]` section use it; all others use the
/// default `[retry]` settings.
#[derive(Debug)]
pub struct RetryRegistry {
    default_policy: RetryPolicy,
    default_fail_after_max_attempts: bool,
    instances: Mutex<HashMap<String, Retry>>,
}

impl RetryRegistry {
    /// Build a registry, rejecting invalid retry settings up front.
    /// Configured instances are created immediately.
    pub fn from_config(cfg: &FlowlineConfig) -> Result<Self> {
        let default_policy = cfg
            .retry
            .defaults
            .to_policy()
            .context("invalid [retry] settings")?;
        let mut instances = HashMap::new();
        for (name, instance) in &cfg.retry.instances {
            let retry = instance
                .build(name)
                .with_context(|| format!("invalid [retry.instances.{name}] settings"))?;
            instances.insert(name.clone(), retry);
        }
        Ok(Self {
            default_policy,
            default_fail_after_max_attempts: cfg.retry.defaults.fail_after_max_attempts,
            instances: Mutex::new(instances),
        })
    }

    /// Registry where every name gets the built-in defaults.
    pub fn of_defaults() -> Self {
        Self {
            default_policy: RetryPolicy::default(),
            default_fail_after_max_attempts: false,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// The instance called `name`, created with the default settings on first use.
    pub fn retry(&self, name: &str) -> Retry {
        let mut instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = instances.get(name) {
            return existing.clone();
        }
        let retry = Retry::new(name, self.default_policy)
            .fail_after_max_attempts(self.default_fail_after_max_attempts);
        tracing::debug!(retry = name, policy = ?retry.policy(), "created retry instance");
        instances.insert(name.to_string(), retry.clone());
        retry
    }

    /// Names of configured instances and of those created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let instances = self.instances.lock().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = instances.keys().cloned().collect();
        names.sort();
        names
    }
}
