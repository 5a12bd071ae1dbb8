// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene lighting: one ambient term, one directional light, one point light.

use serde::{Deserialize, Serialize};

/// Number of light sources in every scene
pub const LIGHT_COUNT: usize = 3;

/// Sun-style light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Intensity, nominally 0..2
    pub intensity: f32,
    /// Compass angle in degrees, nominally 0..360
    pub azimuth: f32,
    /// Angle above the horizon in degrees, nominally 0..90
    pub elevation: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            intensity: 0.8,
            azimuth: 45.0,
            elevation: 45.0,
        }
    }
}

/// Omni light with a falloff distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    /// Intensity, nominally 0..2
    pub intensity: f32,
    /// Falloff distance, nominally 1..20
    pub distance: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            intensity: 0.6,
            distance: 8.0,
        }
    }
}

/// Full lighting rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    /// Ambient intensity, nominally 0..1
    pub ambient: f32,
    /// Directional light
    pub directional: DirectionalLight,
    /// Point light
    pub point: PointLight,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: 0.3,
            directional: DirectionalLight::default(),
            point: PointLight::default(),
        }
    }
}

impl LightingConfig {
    /// Status-bar readout, e.g. `A 0.30 | D 0.80 | P 0.60`
    pub fn readout(&self) -> String {
        format!(
            "A {:.2} | D {:.2} | P {:.2}",
            self.ambient, self.directional.intensity, self.point.intensity
        )
    }

    /// Number of light sources
    pub fn light_count(&self) -> usize {
        LIGHT_COUNT
    }

    /// Copy of `self` with the patch applied
    pub fn merged(mut self, patch: &LightingPatch) -> Self {
        self.apply(patch);
        self
    }

    /// Overwrite every field the patch sets
    pub fn apply(&mut self, patch: &LightingPatch) {
        if let Some(ambient) = patch.ambient {
            self.ambient = ambient;
        }
        if let Some(directional) = &patch.directional {
            directional.apply_to(&mut self.directional);
        }
        if let Some(point) = &patch.point {
            point.apply_to(&mut self.point);
        }
    }
}

/// Partial directional light update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionalPatch {
    /// New intensity
    pub intensity: Option<f32>,
    /// New azimuth
    pub azimuth: Option<f32>,
    /// New elevation
    pub elevation: Option<f32>,
}

impl DirectionalPatch {
    fn apply_to(&self, light: &mut DirectionalLight) {
        if let Some(intensity) = self.intensity {
            light.intensity = intensity;
        }
        if let Some(azimuth) = self.azimuth {
            light.azimuth = azimuth;
        }
        if let Some(elevation) = self.elevation {
            light.elevation = elevation;
        }
    }
}

impl From<DirectionalLight> for DirectionalPatch {
    fn from(light: DirectionalLight) -> Self {
        Self {
            intensity: Some(light.intensity),
            azimuth: Some(light.azimuth),
            elevation: Some(light.elevation),
        }
    }
}

/// Partial point light update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointPatch {
    /// New intensity
    pub intensity: Option<f32>,
    /// New distance
    pub distance: Option<f32>,
}

impl PointPatch {
    fn apply_to(&self, light: &mut PointLight) {
        if let Some(intensity) = self.intensity {
            light.intensity = intensity;
        }
        if let Some(distance) = self.distance {
            light.distance = distance;
        }
    }
}

impl From<PointLight> for PointPatch {
    fn from(light: PointLight) -> Self {
        Self {
            intensity: Some(light.intensity),
            distance: Some(light.distance),
        }
    }
}

/// Partial lighting update
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LightingPatch {
    /// New ambient intensity
    pub ambient: Option<f32>,
    /// Directional light fields to change
    pub directional: Option<DirectionalPatch>,
    /// Point light fields to change
    pub point: Option<PointPatch>,
}

impl LightingPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ambient intensity
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = Some(ambient);
        self
    }

    /// Change directional light fields
    pub fn with_directional(mut self, directional: impl Into<DirectionalPatch>) -> Self {
        self.directional = Some(directional.into());
        self
    }

    /// Change point light fields
    pub fn with_point(mut self, point: impl Into<PointPatch>) -> Self {
        self.point = Some(point.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambient_patch_leaves_lights_untouched() {
        let before = LightingConfig::default();
        let after = before.merged(&LightingPatch::new().with_ambient(0.7));

        assert_eq!(after.ambient, 0.7);
        assert_eq!(after.directional, before.directional);
        assert_eq!(after.point, before.point);
    }

    #[test]
    fn test_directional_field_patch() {
        let patch = LightingPatch::new().with_directional(DirectionalPatch {
            azimuth: Some(270.0),
            ..Default::default()
        });
        let after = LightingConfig::default().merged(&patch);

        assert_eq!(after.directional.azimuth, 270.0);
        assert_eq!(after.directional.intensity, 0.8);
        assert_eq!(after.directional.elevation, 45.0);
        assert_eq!(after.ambient, 0.3);
    }

    #[test]
    fn test_whole_light_replacement() {
        let point = PointLight {
            intensity: 1.5,
            distance: 12.0,
        };
        let after = LightingConfig::default().merged(&LightingPatch::new().with_point(point));
        assert_eq!(after.point, point);
    }

    #[test]
    fn test_readout_and_count() {
        let lighting = LightingConfig::default();
        assert_eq!(lighting.readout(), "A 0.30 | D 0.80 | P 0.60");
        assert_eq!(lighting.light_count(), 3);
    }
}
