// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline for Nebula Studio.
//!
//! This crate provides the looping preview timeline:
//! - Keyframe store with a time-sorted view
//! - Playhead clock that follows the wall clock and wraps every cycle
//! - Injectable monotonic clock and frame scheduler
//!
//! ## Architecture
//!
//! The host owns the frame loop. [`TimelineClock::play`] requests one frame
//! from a [`FrameScheduler`]; the host hands that frame back through
//! [`TimelineClock::tick`], which advances the playhead and requests the
//! next one. Pausing cancels the outstanding request, and any frame that
//! still arrives is dropped by id.

pub mod clock;
pub mod keyframe;
pub mod timeline;

pub use clock::{FrameQueue, FrameRequestId, FrameScheduler, ManualClock, MonotonicClock, SystemClock};
pub use keyframe::{
    round_to_centis, sample_pose_value, Keyframe, KeyframeId, KeyframeStore, DEFAULT_PROPERTY_PATH,
};
pub use timeline::{
    format_playhead, ruler_marks, wrap_time, PlaybackState, TickOutcome, TimelineClock,
    TimelineSnapshot, DEFAULT_CYCLE_LENGTH, RULER_STEP,
};
