//! Frame scheduling: "run this once before the next refresh", cancellable.
//!
//! The animator never owns a display loop. It asks a [`FrameScheduler`] for a
//! frame, and whoever drives the scheduler hands due requests back to it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifies one animation run. Frame requests carry the id of the run
/// that issued them so a stale request can be recognised when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub(crate) u64);

/// Opaque handle for cancelling a pending frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub handle: FrameHandle,
    pub run: RunId,
}

pub trait FrameScheduler {
    /// Monotonic time since the scheduler's origin.
    fn now(&self) -> Duration;

    /// Queues one frame for `run`.
    fn request_frame(&mut self, run: RunId) -> FrameHandle;

    /// Drops a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Removes and returns the next request that is due, if any.
    fn next_frame(&mut self) -> Option<FrameRequest>;
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_handle: u64,
    pending: VecDeque<FrameRequest>,
}

impl FrameQueue {
    fn push(&mut self, run: RunId) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push_back(FrameRequest { handle, run });
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|req| req.handle != handle);
    }

    fn pop(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }
}

/// Deterministic scheduler for tests and offline rendering.
///
/// Time only moves when [`advance`](Self::advance) is called, and every
/// queued request is due immediately. Clones share state, so a test can keep
/// one handle while the animator owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    queue: FrameQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.inner.borrow_mut().now += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn pending(&self) -> Vec<FrameRequest> {
        self.inner.borrow().queue.pending.iter().copied().collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    fn request_frame(&mut self, run: RunId) -> FrameHandle {
        self.inner.borrow_mut().queue.push(run)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.inner.borrow_mut().queue.cancel(handle);
    }

    fn next_frame(&mut self) -> Option<FrameRequest> {
        self.inner.borrow_mut().queue.pop()
    }
}

/// Wall-clock scheduler releasing at most one request per refresh interval.
#[derive(Debug)]
pub struct IntervalScheduler {
    origin: Instant,
    interval: Duration,
    last_release: Option<Instant>,
    queue: FrameQueue,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            last_release: None,
            queue: FrameQueue::default(),
        }
    }

    /// Time until the next request may be released; zero when one is due.
    /// With nothing queued this is a full interval.
    pub fn until_next_frame(&self) -> Duration {
        if self.queue.pending.is_empty() {
            return self.interval;
        }

        match self.last_release {
            Some(last) => self.interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }
}

impl FrameScheduler for IntervalScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn request_frame(&mut self, run: RunId) -> FrameHandle {
        self.queue.push(run)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }

    fn next_frame(&mut self) -> Option<FrameRequest> {
        if !self.until_next_frame().is_zero() {
            return None;
        }

        self.last_release = Some(Instant::now());
        self.queue.pop()
    }
}
