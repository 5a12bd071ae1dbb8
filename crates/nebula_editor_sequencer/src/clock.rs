// SPDX-License-Identifier: MIT OR Apache-2.0
//! Monotonic time sources and host frame scheduling.
//!
//! The timeline never reads process-wide time directly. It asks a
//! [`MonotonicClock`] for "now" and a [`FrameScheduler`] for the next
//! frame callback, so hosts can plug in their own display-link and tests
//! can drive ticks by hand.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonically non-decreasing timestamps
pub trait MonotonicClock {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock.
///
/// Clones share the same reading, so a test can keep one copy and advance
/// it while the timeline owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock reading zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        *self.now.lock() += delta;
    }

    /// Move the clock forward by fractional seconds
    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds));
    }

    /// Set the reading. Values earlier than the current reading are ignored.
    pub fn set(&self, now: Duration) {
        let mut current = self.now.lock();
        if now > *current {
            *current = now;
        }
    }
}

impl MonotonicClock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

/// Identifier of a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(u64);

impl FrameRequestId {
    /// Create a request ID from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Host primitive that runs a callback "before the next paint"
pub trait FrameScheduler {
    /// Queue one frame callback
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a queued callback. Hosts may still deliver it if it was
    /// already in flight; the receiver must ignore such deliveries.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    requested: Vec<FrameRequestId>,
    cancelled: Vec<FrameRequestId>,
}

/// Frame scheduler the host polls once per frame.
///
/// Clones share one queue. The host loop calls [`FrameQueue::take_due`] and
/// delivers each returned id back to the timeline.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    state: Arc<Mutex<QueueState>>,
}

impl FrameQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every request that has not been cancelled
    pub fn take_due(&self) -> Vec<FrameRequestId> {
        let mut state = self.state.lock();
        let requested = std::mem::take(&mut state.requested);
        let cancelled = std::mem::take(&mut state.cancelled);
        requested
            .into_iter()
            .filter(|id| !cancelled.contains(id))
            .collect()
    }

    /// Remove and return every request, cancelled or not.
    ///
    /// Lets tests deliver callbacks that were already dispatched when the
    /// cancellation arrived.
    #[cfg(test)]
    pub(crate) fn take_all(&self) -> Vec<FrameRequestId> {
        let mut state = self.state.lock();
        state.cancelled.clear();
        std::mem::take(&mut state.requested)
    }

    /// Number of live (requested and not cancelled) callbacks
    pub fn pending_count(&self) -> usize {
        let state = self.state.lock();
        state
            .requested
            .iter()
            .filter(|id| !state.cancelled.contains(id))
            .count()
    }

    /// Id of the newest queued callback, if any.
    ///
    /// Hosts that only run one callback per frame deliver this id and
    /// discard the rest.
    pub fn last_requested(&self) -> Option<FrameRequestId> {
        self.state.lock().requested.last().copied()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameRequestId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = FrameRequestId(state.next_id);
        state.requested.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let mut state = self.state.lock();
        if state.requested.contains(&id) && !state.cancelled.contains(&id) {
            state.cancelled.push(id);
        }
    }
}
