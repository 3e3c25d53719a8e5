//! File-to-data-URL conversion for upload previews.

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use crate::storage::StateStorage;

/// Storage key for the persisted preview.
pub(crate) const MEDIA_KEY: &str = "media";

/// Holds the staged media file as a `data:<mime>;base64,<payload>` string
/// the UI can hand straight to an image element.
pub struct MediaStore {
    inner: RwLock<Option<String>>,
    storage: Arc<dyn StateStorage>,
}

impl MediaStore {
    /// Create the store, rehydrating any persisted preview.
    pub fn load(storage: Arc<dyn StateStorage>) -> Self {
        let preview = if storage.available() {
            storage.read(MEDIA_KEY)
        } else {
            None
        };

        Self {
            inner: RwLock::new(preview),
            storage,
        }
    }

    /// Read a local file and stage it as the preview.
    ///
    /// Unlike the session operations this does surface the error: the user
    /// just picked the file, so a failed read must reach the UI.
    pub fn set_file(&self, path: &Path) -> anyhow::Result<String> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading media file {}", path.display()))?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let data_url = format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(&bytes));

        *self.inner.write() = Some(data_url.clone());
        if self.storage.available() {
            self.storage.write(MEDIA_KEY, &data_url);
        }
        Ok(data_url)
    }

    /// The staged preview, if any.
    pub fn preview(&self) -> Option<String> {
        self.inner.read().clone()
    }

    /// Drop the staged preview and its persisted copy.
    pub fn clear(&self) {
        *self.inner.write() = None;
        if self.storage.available() {
            self.storage.remove(MEDIA_KEY);
        }
    }
}
