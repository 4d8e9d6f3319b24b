//! Virtual-time timer service
//!
//! Nothing fires on its own: time moves only through [`ManualTimer::advance`],
//! which runs every task that falls due at its exact deadline. This makes
//! timing-dependent logic reproducible in tests and simulations.

use crate::clock::{Clock, ManualClock};
use crate::service::{Scheduled, Task, TimerHandle, TimerQueue, TimerService};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Timer service and clock driven by explicit time steps
pub struct ManualTimer {
    clock: Arc<ManualClock>,
    queue: Mutex<TimerQueue>,
    next_id: AtomicU64,
}

impl ManualTimer {
    /// Create a timer with its own clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(ManualClock::new()))
    }

    /// Create a timer driving an existing clock
    pub fn with_clock(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            queue: Mutex::new(TimerQueue::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The underlying clock
    pub fn clock(&self) -> &Arc<ManualClock> {
        &self.clock
    }

    /// Virtual time elapsed since the clock origin
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Number of scheduled tasks that are still live
    pub fn scheduled(&self) -> usize {
        self.queue.lock().iter().filter(|e| !e.is_cancelled()).count()
    }

    /// Offset from the clock origin of the earliest live deadline
    pub fn next_due(&self) -> Option<Duration> {
        let origin = self.clock.origin();
        self.queue
            .lock()
            .iter()
            .filter(|e| !e.is_cancelled())
            .map(|e| e.deadline.saturating_duration_since(origin))
            .min()
    }

    /// Move time forward by `by`, running due tasks in deadline order
    ///
    /// Before each task runs the clock is set to that task's deadline, so the
    /// task observes the instant it was scheduled for. Tasks scheduled by a
    /// running task are honored within the same step. Returns the number of
    /// tasks run. Panics raised by a task propagate to the caller.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.clock.now() + by;
        let mut fired = 0;

        while let Some(entry) = self.pop_due(target) {
            if entry.deadline > self.clock.now() {
                self.set_now(entry.deadline);
            }
            trace!(id = entry.id, elapsed = ?self.clock.elapsed(), "Manual timer firing");
            (entry.task)();
            fired += 1;
        }

        if target > self.clock.now() {
            self.set_now(target);
        }

        fired
    }

    /// Run tasks already due at the current instant
    pub fn run_due(&self) -> usize {
        self.advance(Duration::ZERO)
    }

    fn set_now(&self, instant: Instant) {
        self.clock
            .set_elapsed(instant.saturating_duration_since(self.clock.origin()));
    }

    // The queue lock is released before the task runs; tasks schedule more work.
    fn pop_due(&self, target: Instant) -> Option<Scheduled> {
        let mut queue = self.queue.lock();
        loop {
            if queue.peek()?.deadline > target {
                return None;
            }
            let entry = queue.pop()?;
            if !entry.is_cancelled() {
                return Some(entry);
            }
        }
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualTimer {
    fn now(&self) -> Instant {
        self.clock.now()
    }
}

impl TimerService for ManualTimer {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let Some(deadline) = self.clock.now().checked_add(delay) else {
            return TimerHandle::inert(id);
        };

        let handle = TimerHandle::new(id);
        self.queue.lock().push(Scheduled {
            deadline,
            id,
            cancelled: handle.flag(),
            task,
        });
        handle
    }
}
