//! File-based debounce configuration
//!
//! ```toml
//! wait_ms = 200
//! leading = false
//! trailing = true
//! max_wait_ms = 500   # 0 = no ceiling
//! throttle = false    # true forces leading + trailing + max_wait_ms = wait_ms
//! ```

use crate::options::Options;
use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Debounce settings as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Wait window in milliseconds (default: 200)
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,

    /// Invoke on the leading edge (default: false)
    #[serde(default)]
    pub leading: bool,

    /// Invoke on the trailing edge (default: true)
    #[serde(default = "default_true")]
    pub trailing: bool,

    /// Max wait in milliseconds, 0 for none (default: 0)
    #[serde(default)]
    pub max_wait_ms: u64,

    /// Use the throttle preset, overriding the edge and max-wait fields
    #[serde(default)]
    pub throttle: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            leading: false,
            trailing: true,
            max_wait_ms: 0,
            throttle: false,
        }
    }
}

impl DebounceConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the debouncer cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.wait_ms == 0 {
            return Err(ConfigError::ZeroWait);
        }
        Ok(())
    }

    /// Wait window
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    /// Edge and max-wait options
    pub fn options(&self) -> Options {
        if self.throttle {
            return Options::throttle(self.wait());
        }
        Options::default()
            .leading(self.leading)
            .trailing(self.trailing)
            .max_wait(Duration::from_millis(self.max_wait_ms))
    }
}

fn default_wait_ms() -> u64 {
    200
}

fn default_true() -> bool {
    true
}
