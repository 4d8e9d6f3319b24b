//! No-argument adapter
//!
//! Most debounced work ("sync now", "redraw", "save") takes no arguments and
//! returns nothing. [`Debounced`] wraps such a function without making callers
//! pass `()` around.

use crate::debouncer::{Control, Debouncer};
use crate::options::Options;
use std::sync::Arc;
use std::time::Duration;
use timer::{Clock, TimerService};

/// Debounced `FnMut()`
#[derive(Clone, Debug)]
pub struct Debounced {
    inner: Debouncer<(), ()>,
}

impl Debounced {
    /// Debounce `func` with the given wait window
    pub fn new<F>(mut func: F, wait: Duration, options: Options) -> Self
    where
        F: FnMut() + Send + Sync + 'static,
    {
        Self {
            inner: Debouncer::new(move |()| func(), wait, options),
        }
    }

    /// Debounce `func` using the given clock and timer service
    pub fn with_services<F>(
        mut func: F,
        wait: Duration,
        options: Options,
        clock: Arc<dyn Clock>,
        timers: Arc<dyn TimerService>,
    ) -> Self
    where
        F: FnMut() + Send + Sync + 'static,
    {
        Self {
            inner: Debouncer::with_services(move |()| func(), wait, options, clock, timers),
        }
    }

    /// Throttle `func` to one invocation per `wait`
    pub fn throttle<F>(func: F, wait: Duration) -> Self
    where
        F: FnMut() + Send + Sync + 'static,
    {
        Self::new(func, wait, Options::throttle(wait))
    }

    /// Request an invocation
    pub fn call(&self) {
        self.inner.call(())
    }

    /// Drop any pending invocation
    pub fn cancel(&self) {
        self.inner.cancel()
    }

    /// Run any pending invocation now
    pub fn flush(&self) {
        self.inner.flush()
    }

    /// Whether a re-evaluation is scheduled
    pub fn pending(&self) -> bool {
        self.inner.pending()
    }

    /// Control handle sharing this function's state
    pub fn control(&self) -> Control<(), ()> {
        self.inner.control()
    }

    /// The typed debouncer underneath
    pub fn inner(&self) -> &Debouncer<(), ()> {
        &self.inner
    }
}
