//! Background-thread timer service
//!
//! A single thread owns a deadline queue and only watches for deadlines.
//! Each due task is handed to its own short-lived worker thread, so a slow
//! task never delays timers belonging to anyone else. Requests reach the
//! timer thread over an unbounded channel, so scheduling never blocks and is
//! safe while the caller holds its own locks.

use crate::service::{Scheduled, Task, TimerHandle, TimerQueue, TimerService};
use crate::{Result, TimerError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace, warn};

const THREAD_NAME: &str = "debounce-timer";
const TASK_THREAD_NAME: &str = "debounce-timer-task";

enum Command {
    Schedule(Scheduled),
    Shutdown,
}

/// Timer service backed by one dedicated thread
pub struct TimerThread {
    tx: Sender<Command>,
    next_id: AtomicU64,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TimerThread {
    /// Start a new timer thread
    pub fn spawn() -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();

        let worker = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(rx))
            .map_err(TimerError::Spawn)?;

        debug!("Timer thread started");

        Ok(Self {
            tx,
            next_id: AtomicU64::new(1),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Process-wide timer thread, started on first use
    ///
    /// # Panics
    ///
    /// Panics if the operating system refuses to create the thread, the same
    /// way [`std::thread::spawn`] does.
    pub fn shared() -> Arc<TimerThread> {
        static SHARED: OnceLock<Arc<TimerThread>> = OnceLock::new();

        let shared = SHARED.get_or_init(|| {
            Arc::new(Self::spawn().expect("failed to spawn shared timer thread"))
        });
        Arc::clone(shared)
    }

    /// Whether the worker thread is still alive
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .map_or(false, |worker| !worker.is_finished())
    }

    /// Stop the timer thread, dropping any timers that have not fired
    ///
    /// Tasks already handed to a worker run to completion.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Command::Shutdown);

        let Some(worker) = self.worker.lock().take() else {
            return;
        };

        // Unfired tasks are dropped on the timer thread and may own the last
        // reference to this service
        if worker.thread().id() == thread::current().id() {
            return;
        }

        if worker.join().is_err() {
            warn!("Timer thread exited with a panic");
        }
    }
}

impl TimerService for TimerThread {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let Some(deadline) = Instant::now().checked_add(delay) else {
            warn!(id, ?delay, "Timer delay out of range; it will never fire");
            return TimerHandle::inert(id);
        };

        let handle = TimerHandle::new(id);
        let entry = Scheduled {
            deadline,
            id,
            cancelled: handle.flag(),
            task,
        };

        if self.tx.send(Command::Schedule(entry)).is_err() {
            warn!(id, "Timer thread is stopped; dropping scheduled task");
            handle.cancel();
        } else {
            trace!(id, ?delay, "Timer scheduled");
        }

        handle
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(rx: Receiver<Command>) {
    let mut queue = TimerQueue::new();

    loop {
        fire_due(&mut queue);

        let received = match queue.peek() {
            Some(next) => rx.recv_deadline(next.deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Command::Schedule(entry)) => queue.push(entry),
            Ok(Command::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(dropped = queue.len(), "Timer thread stopped");
}

fn fire_due(queue: &mut TimerQueue) {
    while queue
        .peek()
        .map_or(false, |next| next.deadline <= Instant::now())
    {
        let Some(entry) = queue.pop() else {
            break;
        };

        if entry.is_cancelled() {
            trace!(id = entry.id, "Skipping cancelled timer");
            continue;
        }

        dispatch(entry);
    }
}

fn dispatch(entry: Scheduled) {
    let id = entry.id;
    let slot = Arc::new(Mutex::new(Some(entry.task)));
    let worker_slot = Arc::clone(&slot);

    let spawned = thread::Builder::new()
        .name(TASK_THREAD_NAME.to_string())
        .spawn(move || {
            if let Some(task) = worker_slot.lock().take() {
                run_task(id, task);
            }
        });

    // Without a worker the task still has to run; do it here
    if let Err(err) = spawned {
        warn!(id, %err, "Failed to spawn timer task thread; running inline");
        if let Some(task) = slot.lock().take() {
            run_task(id, task);
        }
    }
}

fn run_task(id: u64, task: Task) {
    trace!(id, "Timer firing");
    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
        error!(id, "Timer task panicked");
    }
}
