//! Clock and one-shot timer collaborators for debounced invocation
//!
//! This crate provides:
//! - A monotonic clock abstraction (real and manually driven)
//! - A one-shot timer service backed by a single background thread
//! - A virtual-time timer for deterministic tests and simulations

pub mod clock;
pub mod error;
pub mod manual;
pub mod service;
pub mod thread;

// Re-exports
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::TimerError;
pub use manual::ManualTimer;
pub use service::{Task, TimerHandle, TimerService};
pub use thread::TimerThread;

/// Result type for timer operations
pub type Result<T> = std::result::Result<T, TimerError>;
