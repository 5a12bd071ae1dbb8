// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions and the keyframe store.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Property path targeted by auto-animated keyframes (spine roll of the rig)
pub const DEFAULT_PROPERTY_PATH: &str = "armature.spine.rotateZ";

/// Width of the pose sample distribution, in degrees
const POSE_SPAN_DEGREES: f64 = 45.0;

/// Offset applied so samples straddle zero
const POSE_OFFSET_DEGREES: f64 = 22.0;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A recorded (time, target, value) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in seconds within the timeline cycle
    pub time: f64,
    /// Dotted path of the animated property
    pub property_path: String,
    /// Value at this keyframe
    pub value: f32,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(time: f64, property_path: impl Into<String>, value: f32) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            property_path: property_path.into(),
            value,
        }
    }

    /// Timeline row label, e.g. `t=3s armature.spine.rotateZ → 5`
    pub fn label(&self) -> String {
        format!("t={}s {} → {}", self.time, self.property_path, self.value)
    }
}

/// Round a playhead time to hundredths of a second
pub fn round_to_centis(time: f64) -> f64 {
    (time * 100.0).round() / 100.0
}

/// Draw an integer pose angle in `[-22, 22]` degrees.
///
/// Halves round toward positive infinity.
pub fn sample_pose_value(rng: &mut dyn RngCore) -> f32 {
    let unit: f64 = rng.gen();
    (unit * POSE_SPAN_DEGREES - POSE_OFFSET_DEGREES + 0.5).floor() as f32
}

/// Insertion-ordered keyframe storage with a time-sorted view
pub struct KeyframeStore {
    keyframes: Vec<Keyframe>,
    property_path: String,
    cycle_length: f64,
    rng: Box<dyn RngCore>,
}

impl KeyframeStore {
    /// Create a store targeting `property_path`, seeded from OS entropy
    pub fn new(property_path: impl Into<String>, cycle_length: f64) -> Self {
        Self::with_rng(property_path, cycle_length, Box::new(StdRng::from_entropy()))
    }

    /// Create a store with an explicit random source
    pub fn with_rng(
        property_path: impl Into<String>,
        cycle_length: f64,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            keyframes: Vec::new(),
            property_path: property_path.into(),
            cycle_length,
            rng,
        }
    }

    /// Record an auto-animated pose keyframe at the playhead
    pub fn add_keyframe(&mut self, current_time: f64) -> Keyframe {
        let mut time = round_to_centis(current_time);
        // 9.996 rounds up to the cycle length, which is the start of the next cycle
        if time >= self.cycle_length {
            time = 0.0;
        }
        let value = sample_pose_value(self.rng.as_mut());
        let keyframe = Keyframe::new(time, self.property_path.clone(), value);

        tracing::debug!(
            time,
            value,
            property = %keyframe.property_path,
            "Added keyframe"
        );

        self.keyframes.push(keyframe.clone());
        keyframe
    }

    /// All keyframes by ascending time; equal times keep insertion order
    pub fn list_sorted(&self) -> Vec<Keyframe> {
        let mut sorted = self.keyframes.clone();
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
        sorted
    }

    /// Keyframes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.keyframes.iter()
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Check if no keyframes were recorded
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Property path new keyframes target
    pub fn property_path(&self) -> &str {
        &self.property_path
    }
}

impl std::fmt::Debug for KeyframeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyframeStore")
            .field("keyframes", &self.keyframes)
            .field("property_path", &self.property_path)
            .field("cycle_length", &self.cycle_length)
            .finish_non_exhaustive()
    }
}
