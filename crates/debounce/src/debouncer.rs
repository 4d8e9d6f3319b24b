//! Debounced invocation state machine
//!
//! A [`Debouncer`] wraps a function so that bursts of calls collapse into a
//! bounded number of invocations. Each call is classified under one write
//! lock: it either invokes right away (leading edge, or a burst that reached
//! the max wait), arms a timer, or just replaces the pending arguments. When
//! the timer elapses the state is re-evaluated and the function runs with the
//! latest arguments (trailing edge), or the timer is re-armed for whatever is
//! left of the window.
//!
//! Every invocation of the wrapped function happens while the write lock is
//! held, so invocations never overlap and never race a state transition. The
//! flip side is that the wrapped function must not call back into the same
//! debouncer: that would deadlock.

use crate::options::{Options, Settings};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use timer::{Clock, MonotonicClock, TimerHandle, TimerService, TimerThread};
use tracing::{debug, trace};

type Func<A, R> = Box<dyn FnMut(A) -> R + Send + Sync>;

/// Debounced function handle
///
/// Cloning is cheap; clones share the same state, so a burst spread over
/// several clones (or threads) is still coalesced.
///
/// The wrapped function and the argument type must be `Send + Sync`. Both are
/// stored in the state behind an `RwLock`, and [`pending`](Debouncer::pending)
/// reads that state through a shared read lock from any thread, which makes
/// the lock `Sync` only when its contents are. An argument type that is `Send`
/// but not `Sync` can be wrapped in a `Mutex` first.
pub struct Debouncer<A, R> {
    shared: Arc<Shared<A, R>>,
}

/// Control handle for a debounced function
///
/// Exposes [`cancel`](Control::cancel), [`flush`](Control::flush) and
/// [`pending`](Control::pending) without the ability to call the function.
pub struct Control<A, R> {
    shared: Arc<Shared<A, R>>,
}

struct Shared<A, R> {
    settings: Settings,
    clock: Arc<dyn Clock>,
    timers: Arc<dyn TimerService>,
    state: RwLock<State<A, R>>,
}

struct State<A, R> {
    func: Func<A, R>,
    /// Time of the most recent call
    last_call: Option<Instant>,
    /// Time of the most recent invocation (or leading-edge window reset)
    last_invoke: Option<Instant>,
    /// Arguments of the latest call not yet passed to an invocation
    pending: Option<A>,
    /// Outstanding re-evaluation, if any
    timer: Option<Armed>,
    /// Token source for armed timers
    generation: u64,
    /// Value returned by the most recent invocation
    result: R,
}

struct Armed {
    token: u64,
    handle: TimerHandle,
}

impl<A, R> Debouncer<A, R>
where
    A: Send + Sync + 'static,
    R: Clone + Default + Send + Sync + 'static,
{
    /// Debounce `func` with the given wait window
    ///
    /// Uses the monotonic clock and the process-wide timer thread. The wait
    /// should be positive.
    pub fn new<F>(func: F, wait: Duration, options: Options) -> Self
    where
        F: FnMut(A) -> R + Send + Sync + 'static,
    {
        Self::with_services(
            func,
            wait,
            options,
            Arc::new(MonotonicClock),
            TimerThread::shared(),
        )
    }

    /// Debounce `func` using the given clock and timer service
    pub fn with_services<F>(
        func: F,
        wait: Duration,
        options: Options,
        clock: Arc<dyn Clock>,
        timers: Arc<dyn TimerService>,
    ) -> Self
    where
        F: FnMut(A) -> R + Send + Sync + 'static,
    {
        let settings = Settings::new(wait, options);
        debug!(?settings, "Debouncer created");

        Self {
            shared: Arc::new(Shared {
                settings,
                clock,
                timers,
                state: RwLock::new(State {
                    func: Box::new(func),
                    last_call: None,
                    last_invoke: None,
                    pending: None,
                    timer: None,
                    generation: 0,
                    result: R::default(),
                }),
            }),
        }
    }
}

impl<A, R> Debouncer<A, R>
where
    A: Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Request an invocation with `args`
    ///
    /// Returns the result of the invocation if this call triggered one,
    /// otherwise the result of the most recent invocation.
    pub fn call(&self, args: A) -> R {
        self.shared.call(args)
    }

    /// Drop any pending invocation and forget call history
    ///
    /// The next call behaves like the very first one. The cached result is
    /// kept.
    pub fn cancel(&self) {
        self.shared.cancel()
    }

    /// Run any pending invocation now
    ///
    /// Returns the cached result when nothing is pending.
    pub fn flush(&self) -> R {
        self.shared.flush()
    }

    /// Whether a re-evaluation is scheduled
    pub fn pending(&self) -> bool {
        self.shared.pending()
    }

    /// Control handle sharing this debouncer's state
    pub fn control(&self) -> Control<A, R> {
        Control {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, R> Debouncer<A, R> {
    /// The wait window
    pub fn wait(&self) -> Duration {
        self.shared.settings.wait
    }

    /// Effective options; `max_wait` is already raised to at least `wait`
    pub fn options(&self) -> Options {
        self.shared.settings.options()
    }
}

impl<A, R> Control<A, R>
where
    A: Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// See [`Debouncer::cancel`]
    pub fn cancel(&self) {
        self.shared.cancel()
    }

    /// See [`Debouncer::flush`]
    pub fn flush(&self) -> R {
        self.shared.flush()
    }

    /// See [`Debouncer::pending`]
    pub fn pending(&self) -> bool {
        self.shared.pending()
    }
}

impl<A, R> Clone for Debouncer<A, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, R> Clone for Control<A, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A, R> fmt::Debug for Debouncer<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl<A, R> fmt::Debug for Control<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl<A, R> Shared<A, R>
where
    A: Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    fn call(self: &Arc<Self>, args: A) -> R {
        let mut state = self.state.write();
        let now = self.clock.now();
        let invoking = self.should_invoke(&state, now);
        state.last_call = Some(now);

        if invoking {
            if state.timer.is_none() {
                return self.leading_edge(&mut state, now, args);
            }
            if self.settings.max_wait.is_some() {
                // Calls arriving faster than the timer can re-check
                self.arm(&mut state, self.settings.wait);
                debug!("Max wait reached inside a burst; invoking");
                return self.invoke(&mut state, now, args);
            }
        }

        state.pending = Some(args);
        if state.timer.is_none() {
            self.arm(&mut state, self.settings.wait);
        }
        state.result.clone()
    }

    fn timer_expired(self: &Arc<Self>, token: u64) {
        let mut state = self.state.write();

        let current = state.timer.as_ref().map_or(false, |armed| armed.token == token);
        if !current {
            trace!(token, "Ignoring stale timer");
            return;
        }

        let now = self.clock.now();
        if self.should_invoke(&state, now) {
            self.trailing_edge(&mut state, now);
            return;
        }

        let remaining = self.remaining_wait(&state, now);
        self.arm(&mut state, remaining);
    }

    fn cancel(&self) {
        let mut state = self.state.write();
        if let Some(armed) = state.timer.take() {
            armed.handle.cancel();
            trace!(token = armed.token, "Timer cancelled");
        }
        state.last_call = None;
        state.last_invoke = None;
        state.pending = None;
    }

    fn flush(&self) -> R {
        let mut state = self.state.write();
        if state.timer.is_none() {
            return state.result.clone();
        }
        let now = self.clock.now();
        self.trailing_edge(&mut state, now)
    }

    fn pending(&self) -> bool {
        self.state.read().timer.is_some()
    }

    fn leading_edge(self: &Arc<Self>, state: &mut State<A, R>, now: Instant, args: A) -> R {
        // Starts a new max-wait window even when nothing is invoked
        state.last_invoke = Some(now);
        self.arm(state, self.settings.wait);

        if self.settings.leading {
            debug!("Leading edge; invoking");
            return self.invoke(state, now, args);
        }

        state.pending = Some(args);
        state.result.clone()
    }

    fn trailing_edge(&self, state: &mut State<A, R>, now: Instant) -> R {
        if let Some(armed) = state.timer.take() {
            armed.handle.cancel();
        }

        // Only invoke if the function was called since the last invocation
        match state.pending.take() {
            Some(args) if self.settings.trailing => {
                debug!("Trailing edge; invoking");
                self.invoke(state, now, args)
            }
            _ => state.result.clone(),
        }
    }

    // Bookkeeping happens before the call so a panicking function leaves
    // nothing half-updated.
    fn invoke(&self, state: &mut State<A, R>, now: Instant, args: A) -> R {
        state.pending = None;
        state.last_invoke = Some(now);
        let result = (state.func)(args);
        state.result = result.clone();
        result
    }

    fn arm(self: &Arc<Self>, state: &mut State<A, R>, delay: Duration) {
        if let Some(previous) = state.timer.take() {
            previous.handle.cancel();
        }

        state.generation = state.generation.wrapping_add(1);
        let token = state.generation;

        let shared: Weak<Self> = Arc::downgrade(self);
        let handle = self.timers.schedule(
            delay,
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.timer_expired(token);
                }
            }),
        );

        trace!(token, ?delay, "Timer armed");
        state.timer = Some(Armed { token, handle });
    }

    fn should_invoke(&self, state: &State<A, R>, now: Instant) -> bool {
        let Some(last_call) = state.last_call else {
            return true;
        };

        // A negative elapsed time means the clock went backwards; treat it as
        // the trailing edge.
        let Some(since_call) = now.checked_duration_since(last_call) else {
            return true;
        };

        if since_call >= self.settings.wait {
            return true;
        }

        match self.settings.max_wait {
            Some(max_wait) => elapsed_since(state.last_invoke, now).map_or(false, |d| d >= max_wait),
            None => false,
        }
    }

    fn remaining_wait(&self, state: &State<A, R>, now: Instant) -> Duration {
        let since_call = state
            .last_call
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        let waiting = self.settings.wait.saturating_sub(since_call);

        match self.settings.max_wait {
            Some(max_wait) => {
                let since_invoke = elapsed_since(state.last_invoke, now).unwrap_or(Duration::ZERO);
                waiting.min(max_wait.saturating_sub(since_invoke))
            }
            None => waiting,
        }
    }
}

impl<A, R> Drop for Shared<A, R> {
    fn drop(&mut self) {
        if let Some(armed) = self.state.get_mut().timer.take() {
            armed.handle.cancel();
        }
    }
}

/// Time since `earlier`; an unset timestamp counts as infinitely long ago.
/// `None` if `earlier` is in the future.
fn elapsed_since(earlier: Option<Instant>, now: Instant) -> Option<Duration> {
    match earlier {
        None => Some(Duration::MAX),
        Some(earlier) => now.checked_duration_since(earlier),
    }
}
