// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene parameter store for camera and lighting.

use crate::camera::{CameraConfig, CameraPatch, Projection};
use crate::lighting::{LightingConfig, LightingPatch};
use crate::subscription::{SubscriptionId, Subscribers};

/// Owns the current camera and lighting and publishes every change
#[derive(Debug, Default)]
pub struct SceneParameters {
    camera: CameraConfig,
    lighting: LightingConfig,
    camera_subscribers: Subscribers<CameraConfig>,
    lighting_subscribers: Subscribers<LightingConfig>,
}

impl SceneParameters {
    /// Create a store with the given starting values
    pub fn new(camera: CameraConfig, lighting: LightingConfig) -> Self {
        Self {
            camera,
            lighting,
            camera_subscribers: Subscribers::new(),
            lighting_subscribers: Subscribers::new(),
        }
    }

    /// Current camera
    pub fn camera(&self) -> CameraConfig {
        self.camera
    }

    /// Current lighting
    pub fn lighting(&self) -> LightingConfig {
        self.lighting
    }

    /// Merge a camera patch and publish the result
    pub fn set_camera(&mut self, patch: &CameraPatch) -> CameraConfig {
        self.camera.apply(patch);
        tracing::debug!(?patch, "Camera updated");
        self.camera_subscribers.publish(&self.camera);
        self.camera
    }

    /// Switch the projection mode
    pub fn set_projection(&mut self, projection: Projection) -> CameraConfig {
        self.set_camera(&CameraPatch::new().with_projection(projection))
    }

    /// Merge a lighting patch and publish the result
    pub fn set_lighting(&mut self, patch: &LightingPatch) -> LightingConfig {
        self.lighting.apply(patch);
        tracing::debug!(?patch, "Lighting updated");
        self.lighting_subscribers.publish(&self.lighting);
        self.lighting
    }

    /// Receive every new camera snapshot
    pub fn subscribe_camera(
        &mut self,
        callback: impl FnMut(&CameraConfig) + 'static,
    ) -> SubscriptionId {
        self.camera_subscribers.subscribe(callback)
    }

    /// Receive every new lighting snapshot
    pub fn subscribe_lighting(
        &mut self,
        callback: impl FnMut(&LightingConfig) + 'static,
    ) -> SubscriptionId {
        self.lighting_subscribers.subscribe(callback)
    }

    /// Remove a camera or lighting subscription
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.camera_subscribers.unsubscribe(id) || self.lighting_subscribers.unsubscribe(id)
    }

    /// Drop all subscriptions
    pub fn clear_subscribers(&mut self) {
        self.camera_subscribers.clear();
        self.lighting_subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::PointPatch;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_camera_publishes_snapshot() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut params = SceneParameters::default();
        let sink = Rc::clone(&seen);
        params.subscribe_camera(move |camera| sink.borrow_mut().push(*camera));

        let camera = params.set_camera(&CameraPatch::new().with_fov(90.0));
        assert_eq!(camera.fov, 90.0);
        assert_eq!(params.camera(), camera);
        assert_eq!(*seen.borrow(), vec![camera]);
    }

    #[test]
    fn test_set_lighting_only_touches_named_fields() {
        let mut params = SceneParameters::default();
        let before = params.lighting();

        let after = params.set_lighting(&LightingPatch::new().with_point(PointPatch {
            distance: Some(15.0),
            ..Default::default()
        }));

        assert_eq!(after.point.distance, 15.0);
        assert_eq!(after.point.intensity, before.point.intensity);
        assert_eq!(after.directional, before.directional);
        assert_eq!(after.ambient, before.ambient);
    }

    #[test]
    fn test_set_projection() {
        let mut params = SceneParameters::default();
        let camera = params.set_projection(Projection::Orthographic);
        assert_eq!(camera.projection, Projection::Orthographic);
        assert_eq!(camera.fov, 60.0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut params = SceneParameters::default();
        let counter = Rc::clone(&count);
        let id = params.subscribe_lighting(move |_| *counter.borrow_mut() += 1);

        params.set_lighting(&LightingPatch::new().with_ambient(0.5));
        assert!(params.unsubscribe(id));
        params.set_lighting(&LightingPatch::new().with_ambient(0.6));

        assert_eq!(*count.borrow(), 1);
    }
}
