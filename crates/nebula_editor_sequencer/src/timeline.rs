// SPDX-License-Identifier: MIT OR Apache-2.0
//! Looping playhead clock.
//!
//! While playing, every delivered frame advances the playhead by the
//! wall-clock time since the previous frame and wraps it at the cycle
//! length. Pausing withdraws the queued frame; a frame that still arrives
//! afterwards is recognised by its request id and ignored.

use crate::clock::{FrameRequestId, FrameScheduler, MonotonicClock};
use crate::keyframe::{Keyframe, KeyframeStore};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Length of one timeline cycle in seconds
pub const DEFAULT_CYCLE_LENGTH: f64 = 10.0;

/// Spacing of the ruler marks drawn under the viewport, in seconds
pub const RULER_STEP: f64 = 0.5;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Playhead holds its position
    #[default]
    Paused,
    /// Playhead follows the wall clock
    Playing,
}

impl PlaybackState {
    /// Label for the transport button
    pub fn toggle_label(&self) -> &'static str {
        match self {
            PlaybackState::Paused => "Play",
            PlaybackState::Playing => "Pause",
        }
    }
}

/// What a delivered frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The playhead moved
    Advanced {
        /// Wall-clock seconds since the previous frame
        delta: f64,
        /// Playhead after wrapping
        time: f64,
    },
    /// The frame was requested before the latest pause or was superseded
    Stale,
    /// The timeline is paused
    Paused,
}

impl TickOutcome {
    /// Check if the frame moved the playhead
    pub fn advanced(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }
}

/// Advance `time` by `delta` seconds, wrapping into `[0, cycle_length)`
pub fn wrap_time(time: f64, delta: f64, cycle_length: f64) -> f64 {
    let wrapped = (time + delta).rem_euclid(cycle_length);
    // rem_euclid may round up to the modulus itself
    if wrapped >= cycle_length {
        0.0
    } else {
        wrapped
    }
}

/// Ruler mark positions from 0 to `cycle_length` inclusive
pub fn ruler_marks(cycle_length: f64) -> Vec<f64> {
    let count = (cycle_length / RULER_STEP).floor() as usize;
    (0..=count).map(|i| i as f64 * RULER_STEP).collect()
}

/// Playhead readout, e.g. `t=3.00s`
pub fn format_playhead(time: f64) -> String {
    format!("t={time:.2}s")
}

/// Clock-synchronized playhead
pub struct TimelineClock {
    state: PlaybackState,
    time: f64,
    cycle_length: f64,
    last_tick: Duration,
    pending: Option<FrameRequestId>,
    frames_applied: u64,
    clock: Box<dyn MonotonicClock>,
    scheduler: Box<dyn FrameScheduler>,
}

impl TimelineClock {
    /// Create a paused clock at time zero
    pub fn new(
        cycle_length: f64,
        clock: Box<dyn MonotonicClock>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> Self {
        Self {
            state: PlaybackState::Paused,
            time: 0.0,
            cycle_length,
            last_tick: Duration::ZERO,
            pending: None,
            frames_applied: 0,
            clock,
            scheduler,
        }
    }

    /// Start following the wall clock from the current position
    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            return false;
        }

        self.state = PlaybackState::Playing;
        self.last_tick = self.clock.now();
        self.pending = Some(self.scheduler.request_frame());
        tracing::info!(time = self.time, "Timeline playing");
        true
    }

    /// Stop at the current position and withdraw the queued frame
    pub fn pause(&mut self) -> bool {
        if self.state == PlaybackState::Paused {
            return false;
        }

        self.state = PlaybackState::Paused;
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        tracing::info!(time = self.time, "Timeline paused");
        true
    }

    /// Toggle play/pause, returning the new state
    pub fn toggle(&mut self) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.play(),
        };
        self.state
    }

    /// Handle a frame callback delivered by the host
    pub fn tick(&mut self, id: FrameRequestId) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            tracing::trace!(frame = id.value(), "Ignoring frame while paused");
            return TickOutcome::Paused;
        }
        if self.pending != Some(id) {
            tracing::trace!(frame = id.value(), "Ignoring stale frame");
            return TickOutcome::Stale;
        }

        let now = self.clock.now();
        let delta = now.saturating_sub(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.time = wrap_time(self.time, delta, self.cycle_length);
        self.frames_applied += 1;
        self.pending = Some(self.scheduler.request_frame());

        tracing::trace!(delta, time = self.time, "Timeline tick");
        TickOutcome::Advanced {
            delta,
            time: self.time,
        }
    }

    /// Current playhead time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is the playhead following the wall clock
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Cycle length in seconds
    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// The frame the clock is waiting for, if playing
    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Frames that advanced the playhead since creation
    pub fn frames_applied(&self) -> u64 {
        self.frames_applied
    }

    /// Ruler marks for this clock's cycle
    pub fn ruler_marks(&self) -> Vec<f64> {
        ruler_marks(self.cycle_length)
    }
}

impl std::fmt::Debug for TimelineClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineClock")
            .field("state", &self.state)
            .field("time", &self.time)
            .field("cycle_length", &self.cycle_length)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Read-only view of the timeline handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    /// Whether playback is running
    pub playing: bool,
    /// Playhead time in seconds
    pub time: f64,
    /// Keyframes sorted by time
    pub keyframes: Vec<Keyframe>,
}

impl TimelineSnapshot {
    /// Capture the clock and store
    pub fn capture(clock: &TimelineClock, store: &KeyframeStore) -> Self {
        Self {
            playing: clock.is_playing(),
            time: clock.time(),
            keyframes: store.list_sorted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FrameQueue, ManualClock};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-9;

    fn manual_timeline() -> (TimelineClock, ManualClock, FrameQueue) {
        let clock = ManualClock::new();
        let queue = FrameQueue::new();
        let timeline = TimelineClock::new(
            DEFAULT_CYCLE_LENGTH,
            Box::new(clock.clone()),
            Box::new(queue.clone()),
        );
        (timeline, clock, queue)
    }

    fn deliver(timeline: &mut TimelineClock, queue: &FrameQueue) -> Vec<TickOutcome> {
        queue
            .take_due()
            .into_iter()
            .map(|id| timeline.tick(id))
            .collect()
    }

    #[test]
    fn test_starts_paused_at_zero() {
        let (timeline, _, queue) = manual_timeline();
        assert_eq!(timeline.state(), PlaybackState::Paused);
        assert_eq!(timeline.time(), 0.0);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_play_requests_frame_and_ticks_advance() {
        let (mut timeline, clock, queue) = manual_timeline();
        assert_eq!(timeline.toggle(), PlaybackState::Playing);
        assert_eq!(queue.pending_count(), 1);

        clock.advance_secs(0.25);
        let outcomes = deliver(&mut timeline, &queue);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].advanced());
        assert!((timeline.time() - 0.25).abs() < EPSILON);

        // Each tick requests the next
        assert_eq!(queue.pending_count(), 1);
        clock.advance_secs(0.5);
        deliver(&mut timeline, &queue);
        assert!((timeline.time() - 0.75).abs() < EPSILON);
        assert_eq!(timeline.frames_applied(), 2);
    }

    #[test]
    fn test_wraparound_across_cycle_boundary() {
        assert!((wrap_time(9.95, 0.1, 10.0) - 0.05).abs() < EPSILON);

        let (mut timeline, clock, queue) = manual_timeline();
        timeline.play();
        clock.advance_secs(9.95);
        deliver(&mut timeline, &queue);
        clock.advance_secs(0.1);
        deliver(&mut timeline, &queue);
        assert!((timeline.time() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_tick_sequence_matches_modulo_arithmetic() {
        let (mut timeline, clock, queue) = manual_timeline();
        let mut rng = StdRng::seed_from_u64(5);
        timeline.play();

        for _ in 0..500 {
            let before = timeline.time();
            let millis: u64 = rng.gen_range(0..4_000);
            clock.advance(Duration::from_millis(millis));
            deliver(&mut timeline, &queue);

            let expected = (before + millis as f64 / 1000.0) % DEFAULT_CYCLE_LENGTH;
            // Compare on the circle so 9.9999.. and 0.0 count as equal
            let diff = (timeline.time() - expected).abs();
            assert!(diff.min(DEFAULT_CYCLE_LENGTH - diff) < 1e-6);
            assert!(timeline.time() >= 0.0 && timeline.time() < DEFAULT_CYCLE_LENGTH);
        }
    }

    #[test]
    fn test_zero_delta_tick_keeps_time() {
        let (mut timeline, _, queue) = manual_timeline();
        timeline.play();
        let outcomes = deliver(&mut timeline, &queue);
        assert_eq!(
            outcomes,
            vec![TickOutcome::Advanced {
                delta: 0.0,
                time: 0.0
            }]
        );
    }

    #[test]
    fn test_pause_retains_time_and_cancels_frame() {
        let (mut timeline, clock, queue) = manual_timeline();
        timeline.play();
        clock.advance_secs(2.0);
        deliver(&mut timeline, &queue);

        assert_eq!(timeline.toggle(), PlaybackState::Paused);
        assert_eq!(queue.pending_count(), 0);
        assert!(timeline.pending_frame().is_none());
        assert!((timeline.time() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_frame_scheduled_before_pause_is_ignored() {
        let (mut timeline, clock, queue) = manual_timeline();
        timeline.play();
        clock.advance_secs(1.0);
        deliver(&mut timeline, &queue);
        let before = timeline.time();

        timeline.pause();
        clock.advance_secs(3.0);

        // The host had already dispatched the callback
        let in_flight = queue.take_all();
        assert_eq!(in_flight.len(), 1);
        assert_eq!(timeline.tick(in_flight[0]), TickOutcome::Paused);
        assert_eq!(timeline.time(), before);
    }

    #[test]
    fn test_frame_from_previous_play_session_is_stale() {
        let (mut timeline, clock, queue) = manual_timeline();
        timeline.play();
        let old = queue.take_all();

        timeline.pause();
        timeline.play();
        clock.advance_secs(1.0);

        assert_eq!(timeline.tick(old[0]), TickOutcome::Stale);
        assert_eq!(timeline.time(), 0.0);

        // The current request still works
        deliver(&mut timeline, &queue);
        assert!((timeline.time() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_resume_does_not_count_paused_time() {
        let (mut timeline, clock, queue) = manual_timeline();
        timeline.play();
        clock.advance_secs(1.0);
        deliver(&mut timeline, &queue);
        timeline.pause();

        clock.advance_secs(30.0);
        timeline.play();
        clock.advance_secs(0.5);
        deliver(&mut timeline, &queue);
        assert!((timeline.time() - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_play_and_pause_are_idempotent() {
        let (mut timeline, _, queue) = manual_timeline();
        assert!(timeline.play());
        assert!(!timeline.play());
        assert_eq!(queue.pending_count(), 1);
        assert!(timeline.pause());
        assert!(!timeline.pause());
    }

    #[test]
    fn test_ruler_marks() {
        let marks = ruler_marks(DEFAULT_CYCLE_LENGTH);
        assert_eq!(marks.len(), 21);
        assert_eq!(marks[0], 0.0);
        assert_eq!(marks[1], 0.5);
        assert_eq!(marks[20], 10.0);
    }

    #[test]
    fn test_format_playhead() {
        assert_eq!(format_playhead(3.0), "t=3.00s");
        assert_eq!(format_playhead(0.046), "t=0.05s");
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(PlaybackState::Paused.toggle_label(), "Play");
        assert_eq!(PlaybackState::Playing.toggle_label(), "Pause");
    }
}
