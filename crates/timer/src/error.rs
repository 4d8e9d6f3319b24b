//! Timer service errors

use thiserror::Error;

/// Errors raised while setting up a timer service
#[derive(Debug, Error)]
pub enum TimerError {
    /// The background timer thread could not be started
    #[error("failed to spawn timer thread: {0}")]
    Spawn(#[source] std::io::Error),
}
