// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag-and-drop ingestion of background images.
//!
//! The adapter sits between the host's drop events and the
//! [`BackgroundRegistry`]. It does no I/O: turning a file into something
//! drawable is the job of a [`DisplayHandleProvider`].

use crate::background::{BackgroundLayer, BackgroundRegistry, DisplayHandle, DisplayHandleId};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A file handle offered by a drop or file-picker event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedFile {
    /// File name as reported by the host
    pub name: String,
    /// Declared media type, e.g. `image/png`
    pub media_type: String,
}

impl DroppedFile {
    /// Create a file handle
    pub fn new(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
        }
    }

    /// Check if the declared media type is an image
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Files carried by one drop or selection event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPayload {
    /// Offered files in host order
    pub files: Vec<DroppedFile>,
}

impl DropPayload {
    /// Create a payload from files
    pub fn new(files: impl Into<Vec<DroppedFile>>) -> Self {
        Self {
            files: files.into(),
        }
    }
}

/// How the host should treat a drag-over event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOverResponse {
    /// Suppress the host's default handling (navigating to the file)
    PreventDefault,
}

/// Result of handling a drop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    /// Layers appended to the registry
    pub accepted: Vec<BackgroundLayer>,
    /// Names of files that were not images
    pub skipped: Vec<String>,
}

/// Host service that turns files into drawable handles
pub trait DisplayHandleProvider {
    /// Create a handle for an accepted file
    fn create_handle(&mut self, file: &DroppedFile) -> DisplayHandle;

    /// Release a handle; it must not be drawn afterwards
    fn revoke_handle(&mut self, handle: &DisplayHandle);
}

/// In-process object URL table.
///
/// Clones share one table, so a host can keep a copy to inspect which
/// handles are still live.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    live: Arc<Mutex<IndexMap<DisplayHandleId, String>>>,
}

impl ObjectUrlRegistry {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Check if a handle is still live
    pub fn is_live(&self, id: DisplayHandleId) -> bool {
        self.live.lock().contains_key(&id)
    }
}

impl DisplayHandleProvider for ObjectUrlRegistry {
    fn create_handle(&mut self, file: &DroppedFile) -> DisplayHandle {
        let id = DisplayHandleId::new();
        let url = format!("blob:nebula/{}", id.0);
        self.live.lock().insert(id, file.name.clone());
        DisplayHandle { id, url }
    }

    fn revoke_handle(&mut self, handle: &DisplayHandle) {
        if self.live.lock().shift_remove(&handle.id).is_none() {
            tracing::warn!(url = %handle.url, "Revoking unknown display handle");
        }
    }
}

/// Routes host drop events into the background registry
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestionAdapter;

impl IngestionAdapter {
    /// Create an adapter
    pub fn new() -> Self {
        Self
    }

    /// Every drag-over must be claimed so the host does not navigate away
    pub fn on_drag_over(&self) -> DragOverResponse {
        DragOverResponse::PreventDefault
    }

    /// Hand the images in `payload` to the registry
    pub fn on_drop(
        &self,
        payload: &DropPayload,
        registry: &mut BackgroundRegistry,
        provider: &mut dyn DisplayHandleProvider,
    ) -> DropOutcome {
        let skipped: Vec<String> = payload
            .files
            .iter()
            .filter(|file| !file.is_image())
            .map(|file| file.name.clone())
            .collect();
        for name in &skipped {
            tracing::debug!(file = %name, "Skipping non-image drop");
        }

        let accepted = registry.ingest(&payload.files, provider);
        DropOutcome { accepted, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(DroppedFile::new("a.png", "image/png").is_image());
        assert!(DroppedFile::new("a.svg", "image/svg+xml").is_image());
        assert!(!DroppedFile::new("a.pdf", "application/pdf").is_image());
        assert!(!DroppedFile::new("a.png", "").is_image());
    }

    #[test]
    fn test_drag_over_is_prevented() {
        assert_eq!(
            IngestionAdapter::new().on_drag_over(),
            DragOverResponse::PreventDefault
        );
    }

    #[test]
    fn test_on_drop_reports_skipped_files() {
        let mut urls = ObjectUrlRegistry::new();
        let mut registry = BackgroundRegistry::default();
        let payload = DropPayload::new(vec![
            DroppedFile::new("image.png", "image/png"),
            DroppedFile::new("doc.pdf", "application/pdf"),
            DroppedFile::new("photo.jpg", "image/jpeg"),
        ]);

        let outcome = IngestionAdapter::new().on_drop(&payload, &mut registry, &mut urls);
        assert_eq!(outcome.accepted.len(), 2);
        assert_eq!(outcome.skipped, vec!["doc.pdf".to_string()]);
    }

    #[test]
    fn test_empty_drop() {
        let mut urls = ObjectUrlRegistry::new();
        let mut registry = BackgroundRegistry::default();
        let outcome =
            IngestionAdapter::new().on_drop(&DropPayload::default(), &mut registry, &mut urls);
        assert_eq!(outcome, DropOutcome::default());
    }

    #[test]
    fn test_object_urls_are_unique_and_revocable() {
        let mut urls = ObjectUrlRegistry::new();
        let file = DroppedFile::new("a.png", "image/png");
        let first = urls.create_handle(&file);
        let second = urls.create_handle(&file);

        assert_ne!(first.url, second.url);
        assert!(first.url.starts_with("blob:nebula/"));
        assert_eq!(urls.live_count(), 2);

        urls.revoke_handle(&first);
        assert!(!urls.is_live(first.id));
        assert!(urls.is_live(second.id));
    }
}
