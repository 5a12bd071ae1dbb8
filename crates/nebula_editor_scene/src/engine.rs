// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene state and timeline engine.
//!
//! [`SceneEngine`] owns every piece of scene state and is the only way to
//! change it. Each operation takes `&mut self` and runs to completion, so a
//! frame callback can never observe half of a user edit.

use crate::background::{BackgroundLayer, BackgroundRegistry};
use crate::camera::{CameraConfig, CameraPatch, Projection};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::ingest::{
    DisplayHandleProvider, DragOverResponse, DropOutcome, DropPayload, DroppedFile,
    IngestionAdapter, ObjectUrlRegistry,
};
use crate::lighting::{LightingConfig, LightingPatch};
use crate::parameters::SceneParameters;
use crate::subscription::{SubscriptionId, Subscribers};
use nebula_editor_sequencer::{
    format_playhead, FrameQueue, FrameRequestId, FrameScheduler, Keyframe, KeyframeStore,
    MonotonicClock, PlaybackState, SystemClock, TickOutcome, TimelineClock, TimelineSnapshot,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Host services the engine depends on
pub struct EngineServices {
    /// Monotonic time source
    pub clock: Box<dyn MonotonicClock>,
    /// Frame callback scheduler
    pub scheduler: Box<dyn FrameScheduler>,
    /// Random source for auto-animated keyframes
    pub rng: Box<dyn RngCore>,
    /// Converts dropped files into display handles
    pub handles: Box<dyn DisplayHandleProvider>,
}

impl EngineServices {
    /// Replace the clock
    pub fn with_clock(mut self, clock: impl MonotonicClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the frame scheduler
    pub fn with_scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the display handle provider
    pub fn with_handles(mut self, handles: impl DisplayHandleProvider + 'static) -> Self {
        self.handles = Box::new(handles);
        self
    }
}

impl Default for EngineServices {
    fn default() -> Self {
        Self {
            clock: Box::new(SystemClock::new()),
            scheduler: Box::new(FrameQueue::new()),
            rng: Box::new(StdRng::from_entropy()),
            handles: Box::new(ObjectUrlRegistry::new()),
        }
    }
}

/// Everything the viewport renderer reads for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Camera
    pub camera: CameraConfig,
    /// Lighting
    pub lighting: LightingConfig,
    /// Backgrounds to draw (capped)
    pub backgrounds: Vec<BackgroundLayer>,
    /// Timeline state with sorted keyframes
    pub timeline: TimelineSnapshot,
}

/// Scene browser counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSummary {
    /// Active projection name
    pub camera: String,
    /// Number of lights
    pub lights: usize,
    /// Number of ingested backgrounds
    pub backgrounds: usize,
    /// Number of recorded keyframes
    pub keyframes: usize,
}

/// Owner of all scene and timeline state
pub struct SceneEngine {
    config: EngineConfig,
    parameters: SceneParameters,
    backgrounds: BackgroundRegistry,
    ingestion: IngestionAdapter,
    handles: Box<dyn DisplayHandleProvider>,
    keyframes: KeyframeStore,
    timeline: TimelineClock,
    timeline_subscribers: Subscribers<TimelineSnapshot>,
    torn_down: bool,
}

impl SceneEngine {
    /// Build an engine from a validated config.
    pub fn try_new(config: EngineConfig, services: EngineServices) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config, services))
    }

    /// Build an engine with the given host services.
    ///
    /// `config` must pass [`EngineConfig::validate`]; use
    /// [`SceneEngine::try_new`] for configs from untrusted sources.
    pub fn new(config: EngineConfig, services: EngineServices) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid engine config: {config:?}"
        );
        let EngineServices {
            clock,
            scheduler,
            rng,
            handles,
        } = services;

        tracing::debug!(
            cycle_length = config.cycle_length,
            preview_limit = config.preview_limit,
            "Creating scene engine"
        );

        Self {
            parameters: SceneParameters::new(config.initial_camera, config.initial_lighting),
            backgrounds: BackgroundRegistry::new(config.preview_limit),
            ingestion: IngestionAdapter::new(),
            handles,
            keyframes: KeyframeStore::with_rng(
                config.keyframe_property.clone(),
                config.cycle_length,
                rng,
            ),
            timeline: TimelineClock::new(config.cycle_length, clock, scheduler),
            timeline_subscribers: Subscribers::new(),
            torn_down: false,
            config,
        }
    }

    /// Engine with default config and system services
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), EngineServices::default())
    }

    /// Config the engine was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Scene parameters

    /// Current camera
    pub fn camera(&self) -> CameraConfig {
        self.parameters.camera()
    }

    /// Current lighting
    pub fn lighting(&self) -> LightingConfig {
        self.parameters.lighting()
    }

    /// Merge a camera patch
    pub fn set_camera(&mut self, patch: &CameraPatch) -> CameraConfig {
        self.parameters.set_camera(patch)
    }

    /// Switch the projection mode
    pub fn set_projection(&mut self, projection: Projection) -> CameraConfig {
        self.parameters.set_projection(projection)
    }

    /// Merge a lighting patch
    pub fn set_lighting(&mut self, patch: &LightingPatch) -> LightingConfig {
        self.parameters.set_lighting(patch)
    }

    // Backgrounds

    /// Append the images among `files`
    pub fn ingest(&mut self, files: &[DroppedFile]) -> Vec<BackgroundLayer> {
        if self.torn_down {
            tracing::debug!(offered = files.len(), "Ignoring ingest after teardown");
            return Vec::new();
        }
        self.backgrounds.ingest(files, self.handles.as_mut())
    }

    /// Handle a drop or file-picker event
    pub fn on_drop(&mut self, payload: &DropPayload) -> DropOutcome {
        if self.torn_down {
            tracing::debug!(offered = payload.files.len(), "Ignoring drop after teardown");
            return DropOutcome::default();
        }
        self.ingestion
            .on_drop(payload, &mut self.backgrounds, self.handles.as_mut())
    }

    /// Handle a drag-over event
    pub fn on_drag_over(&self) -> DragOverResponse {
        self.ingestion.on_drag_over()
    }

    /// All background layers in insertion order
    pub fn backgrounds(&self) -> &[BackgroundLayer] {
        self.backgrounds.layers()
    }

    /// Background layers the renderer draws
    pub fn preview_backgrounds(&self) -> &[BackgroundLayer] {
        self.backgrounds.preview()
    }

    // Timeline

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) -> PlaybackState {
        if self.torn_down {
            tracing::debug!("Ignoring playback toggle after teardown");
            return self.timeline.state();
        }
        let state = self.timeline.toggle();
        self.publish_timeline();
        state
    }

    /// Start playback. Returns false if already playing or torn down.
    pub fn play(&mut self) -> bool {
        if self.torn_down {
            tracing::debug!("Ignoring play after teardown");
            return false;
        }
        let changed = self.timeline.play();
        if changed {
            self.publish_timeline();
        }
        changed
    }

    /// Pause playback. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        let changed = self.timeline.pause();
        if changed {
            self.publish_timeline();
        }
        changed
    }

    /// Deliver a frame callback from the host
    pub fn on_frame(&mut self, id: FrameRequestId) -> TickOutcome {
        let outcome = self.timeline.tick(id);
        if outcome.advanced() {
            self.publish_timeline();
        }
        outcome
    }

    /// Record an auto-animated keyframe at the playhead
    pub fn add_keyframe(&mut self) -> Keyframe {
        let keyframe = self.keyframes.add_keyframe(self.timeline.time());
        self.publish_timeline();
        keyframe
    }

    /// Keyframes sorted by time
    pub fn sorted_keyframes(&self) -> Vec<Keyframe> {
        self.keyframes.list_sorted()
    }

    /// Playhead time in seconds
    pub fn time(&self) -> f64 {
        self.timeline.time()
    }

    /// Current playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.timeline.state()
    }

    /// Is the timeline playing
    pub fn is_playing(&self) -> bool {
        self.timeline.is_playing()
    }

    /// The frame the timeline is waiting for
    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.timeline.pending_frame()
    }

    /// Ruler marks under the viewport
    pub fn ruler_marks(&self) -> Vec<f64> {
        self.timeline.ruler_marks()
    }

    /// Snapshot of the timeline
    pub fn timeline_snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot::capture(&self.timeline, &self.keyframes)
    }

    fn publish_timeline(&mut self) {
        if self.timeline_subscribers.is_empty() {
            return;
        }
        let snapshot = TimelineSnapshot::capture(&self.timeline, &self.keyframes);
        self.timeline_subscribers.publish(&snapshot);
    }

    // Subscriptions

    /// Receive camera snapshots
    pub fn subscribe_camera(
        &mut self,
        callback: impl FnMut(&CameraConfig) + 'static,
    ) -> SubscriptionId {
        self.parameters.subscribe_camera(callback)
    }

    /// Receive lighting snapshots
    pub fn subscribe_lighting(
        &mut self,
        callback: impl FnMut(&LightingConfig) + 'static,
    ) -> SubscriptionId {
        self.parameters.subscribe_lighting(callback)
    }

    /// Receive the background preview after each ingest
    pub fn subscribe_backgrounds(
        &mut self,
        callback: impl FnMut(&[BackgroundLayer]) + 'static,
    ) -> SubscriptionId {
        self.backgrounds.subscribe(callback)
    }

    /// Receive timeline snapshots on play/pause, ticks and new keyframes
    pub fn subscribe_timeline(
        &mut self,
        callback: impl FnMut(&TimelineSnapshot) + 'static,
    ) -> SubscriptionId {
        self.timeline_subscribers.subscribe(callback)
    }

    /// Remove any subscription. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.parameters.unsubscribe(id)
            || self.backgrounds.unsubscribe(id)
            || self.timeline_subscribers.unsubscribe(id)
    }

    // Presentation

    /// Everything the renderer needs for one frame
    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            camera: self.camera(),
            lighting: self.lighting(),
            backgrounds: self.preview_backgrounds().to_vec(),
            timeline: self.timeline_snapshot(),
        }
    }

    /// Status bar text, e.g. `Lighting: A 0.30 | D 0.80 | P 0.60 • Camera: FOV 60`
    pub fn status_line(&self) -> String {
        format!(
            "Lighting: {} • Camera: {}",
            self.lighting().readout(),
            self.camera().readout()
        )
    }

    /// Playhead readout, e.g. `t=3.00s`
    pub fn playhead_label(&self) -> String {
        format_playhead(self.time())
    }

    /// Scene browser counters
    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            camera: self.camera().projection.name().to_string(),
            lights: self.lighting().light_count(),
            backgrounds: self.backgrounds.len(),
            keyframes: self.keyframes.len(),
        }
    }

    // Lifetime

    /// Stop playback and release host resources. Safe to call twice.
    ///
    /// Afterwards ingestion and playback requests are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let released = self.release_host_resources();
        self.parameters.clear_subscribers();
        self.timeline_subscribers.clear();
        tracing::info!(released, "Scene engine torn down");
    }

    fn release_host_resources(&mut self) -> usize {
        self.timeline.pause();
        self.backgrounds.release(self.handles.as_mut())
    }

    /// Check if [`SceneEngine::teardown`] already ran
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for SceneEngine {
    fn drop(&mut self) {
        self.teardown();
        // Handles and frames must not outlive the engine, whatever ran after teardown
        self.release_host_resources();
    }
}

impl std::fmt::Debug for SceneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneEngine")
            .field("config", &self.config)
            .field("parameters", &self.parameters)
            .field("backgrounds", &self.backgrounds)
            .field("keyframes", &self.keyframes)
            .field("timeline", &self.timeline)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}
