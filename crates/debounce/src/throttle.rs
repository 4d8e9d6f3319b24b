//! Throttle preset
//!
//! Throttling is debouncing with both edges enabled and the max wait pinned
//! to the wait window: at most one invocation per window, and the final
//! arguments of a burst are never lost.

use crate::debouncer::Debouncer;
use crate::options::Options;
use std::sync::Arc;
use std::time::Duration;
use timer::{Clock, TimerService};

impl<A, R> Debouncer<A, R>
where
    A: Send + Sync + 'static,
    R: Clone + Default + Send + Sync + 'static,
{
    /// Throttle `func` to one invocation per `wait`
    pub fn throttle<F>(func: F, wait: Duration) -> Self
    where
        F: FnMut(A) -> R + Send + Sync + 'static,
    {
        Self::new(func, wait, Options::throttle(wait))
    }

    /// Throttle `func` using the given clock and timer service
    pub fn throttle_with_services<F>(
        func: F,
        wait: Duration,
        clock: Arc<dyn Clock>,
        timers: Arc<dyn TimerService>,
    ) -> Self
    where
        F: FnMut(A) -> R + Send + Sync + 'static,
    {
        Self::with_services(func, wait, Options::throttle(wait), clock, timers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use timer::ManualTimer;

    #[test]
    fn test_throttle_invokes_leading_and_trailing() {
        let timer = Arc::new(ManualTimer::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let throttled = Debouncer::throttle_with_services(
            move |arg: &'static str| {
                sink.lock().push(arg);
                arg.len()
            },
            Duration::from_millis(100),
            timer.clone(),
            timer.clone(),
        );

        assert_eq!(throttled.call("a"), 1);
        assert_eq!(throttled.call("bb"), 1);
        assert_eq!(throttled.call("ccc"), 1);

        timer.advance(Duration::from_millis(100));
        assert_eq!(*seen.lock(), vec!["a", "ccc"]);
        assert_eq!(throttled.flush(), 3);
    }

    #[test]
    fn test_throttle_options() {
        let wait = Duration::from_millis(40);
        let timer = Arc::new(ManualTimer::new());
        let throttled: Debouncer<(), ()> =
            Debouncer::throttle_with_services(|_| (), wait, timer.clone(), timer.clone());

        let options = throttled.options();
        assert!(options.leading);
        assert!(options.trailing);
        assert_eq!(options.max_wait, Some(wait));
        assert_eq!(throttled.wait(), wait);
    }
}
