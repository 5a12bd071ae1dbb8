// SPDX-License-Identifier: MIT OR Apache-2.0
//! Background layer registry.
//!
//! Layers are appended in drop order and never removed while the view
//! lives. The renderer only draws the first [`DEFAULT_PREVIEW_LIMIT`].

use crate::ingest::{DisplayHandleProvider, DroppedFile};
use crate::subscription::{SubscriptionId, Subscribers};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Layers drawn on the viewport canvas
pub const DEFAULT_PREVIEW_LIMIT: usize = 6;

/// Unique identifier for a display handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayHandleId(pub Uuid);

impl DisplayHandleId {
    /// Create a new random handle ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DisplayHandleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Revocable reference the renderer uses to draw an image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayHandle {
    /// Handle ID
    pub id: DisplayHandleId,
    /// URL the renderer loads
    pub url: String,
}

/// An ingested background image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundLayer {
    /// Original file name
    pub name: String,
    /// Display handle
    pub handle: DisplayHandle,
}

/// Append-only list of background layers
#[derive(Debug)]
pub struct BackgroundRegistry {
    layers: Vec<BackgroundLayer>,
    preview_limit: usize,
    subscribers: Subscribers<[BackgroundLayer]>,
}

impl BackgroundRegistry {
    /// Create an empty registry
    pub fn new(preview_limit: usize) -> Self {
        Self {
            layers: Vec::new(),
            preview_limit,
            subscribers: Subscribers::new(),
        }
    }

    /// Append every image among `files`, in order, and return the new layers.
    ///
    /// Files whose media type is not an image are skipped.
    pub fn ingest(
        &mut self,
        files: &[DroppedFile],
        provider: &mut dyn DisplayHandleProvider,
    ) -> Vec<BackgroundLayer> {
        let added: Vec<BackgroundLayer> = files
            .iter()
            .filter(|file| file.is_image())
            .map(|file| BackgroundLayer {
                name: file.name.clone(),
                handle: provider.create_handle(file),
            })
            .collect();

        if added.is_empty() {
            tracing::debug!(offered = files.len(), "No images to ingest");
            return added;
        }

        self.layers.extend(added.iter().cloned());
        tracing::info!(
            added = added.len(),
            skipped = files.len() - added.len(),
            total = self.layers.len(),
            "Ingested background layers"
        );
        let end = self.layers.len().min(self.preview_limit);
        self.subscribers.publish(&self.layers[..end]);
        added
    }

    /// All layers in insertion order
    pub fn layers(&self) -> &[BackgroundLayer] {
        &self.layers
    }

    /// The layers the renderer draws
    pub fn preview(&self) -> &[BackgroundLayer] {
        let end = self.layers.len().min(self.preview_limit);
        &self.layers[..end]
    }

    /// Get layer count
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if no layers were ingested
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Receive the preview slice after each successful ingest
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&[BackgroundLayer]) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    /// Remove a subscription
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Revoke every display handle and forget all layers.
    ///
    /// Called when the owning view is torn down.
    pub fn release(&mut self, provider: &mut dyn DisplayHandleProvider) -> usize {
        let released = self.layers.len();
        for layer in self.layers.drain(..) {
            provider.revoke_handle(&layer.handle);
        }
        self.subscribers.clear();
        if released > 0 {
            tracing::debug!(released, "Released background handles");
        }
        released
    }
}

impl Default for BackgroundRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_LIMIT)
    }
}
