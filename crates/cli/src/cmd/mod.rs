//! CLI command implementations

pub mod check;
pub mod run;
pub mod simulate;

use crate::EdgeArgs;
use anyhow::{Context, Result};
use debounce::{DebounceConfig, Options};
use std::time::Duration;
use tracing::info;

impl EdgeArgs {
    /// Resolve the config file, or else the flags, into a wait window and options
    pub fn resolve(&self) -> Result<(Duration, Options)> {
        let config = match &self.config {
            Some(path) => {
                let config = DebounceConfig::load(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                info!(path = %path.display(), "Loaded debounce settings");
                config
            }
            None => {
                let config = DebounceConfig {
                    wait_ms: self.wait,
                    leading: self.leading,
                    trailing: !self.no_trailing,
                    max_wait_ms: self.max_wait,
                    throttle: self.throttle,
                };
                config.validate().context("Invalid --wait")?;
                config
            }
        };

        Ok((config.wait(), config.options()))
    }
}
