//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading debounce settings from a file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("invalid debounce config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `wait_ms` was zero
    #[error("wait_ms must be positive")]
    ZeroWait,
}
