#![forbid(unsafe_code)]

//! Virtual-clock timer queue.
//!
//! [`TimerQueue`] implements [`Timers`](lightbox_core::Timers) on a clock
//! that only moves when the host calls [`TimerQueue::advance`]. Hosts driven
//! by a real event loop advance it by the frame delta; tests advance it by
//! exact amounts.
//!
//! # Invariants
//!
//! 1. Tasks run in deadline order; ties run in scheduling order.
//! 2. During a task, [`TimerQueue::now`] reports that task's deadline.
//! 3. A task scheduled while advancing runs in the same advance if its
//!    deadline falls inside the window.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use lightbox_core::{Task, Timers};

#[derive(Default)]
struct TimerInner {
    now: Duration,
    seq: u64,
    pending: BTreeMap<(Duration, u64), Task>,
}

/// Deadline-ordered queue of deferred tasks.
#[derive(Default)]
pub struct TimerQueue {
    inner: RefCell<TimerInner>,
}

impl TimerQueue {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Whether no tasks are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().pending.is_empty()
    }

    /// Time until the earliest pending task, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        inner
            .pending
            .keys()
            .next()
            .map(|(deadline, _)| deadline.saturating_sub(inner.now))
    }

    /// Move the clock forward by `dt`, running every task that comes due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now() + dt;
        let mut ran = 0;
        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }
        self.inner.borrow_mut().now = target;
        ran
    }

    /// Run everything, advancing the clock to the last deadline.
    ///
    /// Tasks that keep rescheduling themselves would loop forever; `limit`
    /// caps the number of tasks run.
    pub fn run_all(&self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit {
            let Some(wait) = self.next_deadline() else {
                break;
            };
            let target = self.now() + wait;
            let Some(task) = self.pop_due(target) else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut inner = self.inner.borrow_mut();
        let key = *inner.pending.keys().next()?;
        if key.0 > target {
            return None;
        }
        let task = inner.pending.remove(&key)?;
        inner.now = key.0;
        tracing::trace!(at_ms = key.0.as_millis() as u64, "timer fired");
        Some(task)
    }
}

impl Timers for TimerQueue {
    fn set_timeout(&self, delay: Duration, task: Task) {
        let mut inner = self.inner.borrow_mut();
        let deadline = inner.now + delay;
        inner.seq += 1;
        let seq = inner.seq;
        inner.pending.insert((deadline, seq), task);
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &inner.now)
            .field("pending", &inner.pending.len())
            .finish()
    }
}
