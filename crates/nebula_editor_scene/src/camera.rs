// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewport camera projection.

use serde::{Deserialize, Serialize};

/// Camera projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Perspective projection driven by `fov`
    #[default]
    Perspective,
    /// Orthographic projection driven by `ortho_size`
    Orthographic,
}

impl Projection {
    /// Lowercase name used by the scene browser
    pub fn name(&self) -> &'static str {
        match self {
            Projection::Perspective => "perspective",
            Projection::Orthographic => "orthographic",
        }
    }
}

/// Camera settings.
///
/// Both projection parameters are kept; only the one matching
/// `projection` is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Active projection mode
    pub projection: Projection,
    /// Vertical field of view in degrees, nominally 20..100
    pub fov: f32,
    /// Orthographic half-height, nominally 1..20
    pub ortho_size: f32,
}

impl CameraConfig {
    /// Parameter shown for the active projection
    pub fn active_parameter(&self) -> f32 {
        match self.projection {
            Projection::Perspective => self.fov,
            Projection::Orthographic => self.ortho_size,
        }
    }

    /// Status-bar readout, e.g. `FOV 60` or `Ortho 5`
    pub fn readout(&self) -> String {
        match self.projection {
            Projection::Perspective => format!("FOV {}", self.fov),
            Projection::Orthographic => format!("Ortho {}", self.ortho_size),
        }
    }

    /// Copy of `self` with the patch applied
    pub fn merged(mut self, patch: &CameraPatch) -> Self {
        self.apply(patch);
        self
    }

    /// Overwrite every field the patch sets
    pub fn apply(&mut self, patch: &CameraPatch) {
        if let Some(projection) = patch.projection {
            self.projection = projection;
        }
        if let Some(fov) = patch.fov {
            self.fov = fov;
        }
        if let Some(ortho_size) = patch.ortho_size {
            self.ortho_size = ortho_size;
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            fov: 60.0,
            ortho_size: 5.0,
        }
    }
}

/// Partial camera update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPatch {
    /// New projection mode
    pub projection: Option<Projection>,
    /// New field of view
    pub fov: Option<f32>,
    /// New orthographic size
    pub ortho_size: Option<f32>,
}

impl CameraPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projection mode
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the field of view
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = Some(fov);
        self
    }

    /// Set the orthographic size
    pub fn with_ortho_size(mut self, ortho_size: f32) -> Self {
        self.ortho_size = Some(ortho_size);
        self
    }

    /// Check if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.projection.is_none() && self.fov.is_none() && self.ortho_size.is_none()
    }
}
