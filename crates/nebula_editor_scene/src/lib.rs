// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene state engine for Nebula Studio.
//!
//! This crate owns the state behind the scene-authoring workspace:
//! - Camera projection and the three-light rig
//! - Background layers ingested from drag-and-drop
//! - The looping keyframe timeline (via `nebula_editor_sequencer`)
//! - Snapshot subscriptions for the viewport renderer
//!
//! ## Architecture
//!
//! [`SceneEngine`] is the single owner of all state. The presentation layer
//! calls its operations and reads snapshots; it never holds references into
//! the stores. Host services (clock, frame scheduler, random source, display
//! handles) are injected through [`EngineServices`].

pub mod background;
pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod lighting;
pub mod parameters;
pub mod subscription;

pub use background::{BackgroundLayer, BackgroundRegistry, DisplayHandle, DisplayHandleId, DEFAULT_PREVIEW_LIMIT};
pub use camera::{CameraConfig, CameraPatch, Projection};
pub use config::EngineConfig;
pub use engine::{EngineServices, RenderSnapshot, SceneEngine, SceneSummary};
pub use error::{ConfigError, Result};
pub use ingest::{
    DisplayHandleProvider, DragOverResponse, DropOutcome, DropPayload, DroppedFile,
    IngestionAdapter, ObjectUrlRegistry,
};
pub use lighting::{
    DirectionalLight, DirectionalPatch, LightingConfig, LightingPatch, PointLight, PointPatch,
    LIGHT_COUNT,
};
pub use parameters::SceneParameters;
pub use subscription::{SubscriptionId, Subscribers};

pub use nebula_editor_sequencer as sequencer;
