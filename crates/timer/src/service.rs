//! One-shot timer service abstraction

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Callback run once when a timer elapses
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Schedules callbacks to run once after a delay
///
/// Implementations run tasks on their own execution context, never inline
/// inside [`TimerService::schedule`]; callers may hold locks while scheduling.
pub trait TimerService: Send + Sync {
    /// Run `task` once after `delay` unless the returned handle is cancelled first
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

impl<T: TimerService + ?Sized> TimerService for Arc<T> {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        (**self).schedule(delay, task)
    }
}

/// Queue length below which cancelled entries are left for the pop path
const PURGE_FLOOR: usize = 64;

/// Handle to a scheduled timer
///
/// Stopping is best-effort: a task that has already been picked up for
/// execution still runs.
#[derive(Clone)]
pub struct TimerHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for a timer that will never fire
    pub(crate) fn inert(id: u64) -> Self {
        let handle = Self::new(id);
        handle.cancel();
        handle
    }

    /// Service-assigned identifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the timer
    ///
    /// Returns true if this call performed the cancellation, false if the
    /// handle was already cancelled.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Whether the timer has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Queue entry shared by the timer implementations
///
/// Ordered so that a max-heap pops the earliest deadline first, ties broken
/// by schedule order.
pub(crate) struct Scheduled {
    pub deadline: Instant,
    pub id: u64,
    pub cancelled: Arc<AtomicBool>,
    pub task: Task,
}

impl Scheduled {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.id == other.id
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Deadline heap shared by the timer implementations
///
/// Cancelled entries are dropped lazily when popped, and in bulk whenever the
/// heap doubles past its last purged size, so a schedule/cancel loop with long
/// delays keeps memory bounded by the live timer count.
pub(crate) struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    purge_at: usize,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            purge_at: PURGE_FLOOR,
        }
    }

    pub fn push(&mut self, entry: Scheduled) {
        if self.heap.len() >= self.purge_at {
            self.purge();
        }
        self.heap.push(entry);
    }

    /// Drop every cancelled entry, returning how many were removed
    pub fn purge(&mut self) -> usize {
        let before = self.heap.len();
        self.heap.retain(|entry| !entry.is_cancelled());
        self.purge_at = (self.heap.len() * 2).max(PURGE_FLOOR);
        before - self.heap.len()
    }

    pub fn peek(&self) -> Option<&Scheduled> {
        self.heap.peek()
    }

    pub fn pop(&mut self) -> Option<Scheduled> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.heap.iter()
    }
}
