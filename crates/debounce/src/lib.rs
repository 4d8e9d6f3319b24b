//! Debounced and throttled function invocation
//!
//! This crate provides:
//! - A thread-safe debounce state machine with leading/trailing edges
//! - A max-wait ceiling that forces progress during sustained bursts
//! - Cancel, flush, and pending controls on a shared handle
//! - Throttle and no-argument presets
//! - TOML configuration loading
//!
//! # Example
//!
//! ```no_run
//! use debounce::{Debouncer, Options};
//! use std::time::Duration;
//!
//! let save = Debouncer::new(
//!     |doc: String| doc.len(),
//!     Duration::from_millis(200),
//!     Options::default().max_wait(Duration::from_millis(500)),
//! );
//!
//! for edit in ["a", "ab", "abc"] {
//!     save.call(edit.to_string());
//! }
//! assert!(save.pending());
//! assert_eq!(save.flush(), 3);
//! ```

pub mod config;
pub mod debouncer;
pub mod error;
pub mod options;
pub mod throttle;
pub mod unit;

// Re-exports
pub use config::DebounceConfig;
pub use debouncer::{Control, Debouncer};
pub use error::ConfigError;
pub use options::Options;
pub use unit::Debounced;

pub use timer::{Clock, ManualClock, ManualTimer, MonotonicClock, TimerService, TimerThread};

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
