//! Draft state for the post composer.

use crate::storage::StateStorage;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key for the persisted draft.
pub(crate) const CONTENT_KEY: &str = "content";

/// Fields of a post being composed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// Draft store that mirrors every mutation to durable storage so a reload
/// restores the half-written post.
pub struct ContentStore {
    inner: RwLock<ContentDraft>,
    storage: Arc<dyn StateStorage>,
}

impl ContentStore {
    /// Create the store, rehydrating any persisted draft.
    ///
    /// An unreadable persisted draft is discarded rather than surfaced; the
    /// composer simply starts empty.
    pub fn load(storage: Arc<dyn StateStorage>) -> Self {
        let draft = if storage.available() {
            storage
                .read(CONTENT_KEY)
                .and_then(|raw| match serde_json::from_str(&raw) {
                    Ok(draft) => Some(draft),
                    Err(err) => {
                        tracing::warn!(error = %err, "discarding unreadable content draft");
                        None
                    }
                })
                .unwrap_or_default()
        } else {
            ContentDraft::default()
        };

        Self {
            inner: RwLock::new(draft),
            storage,
        }
    }

    /// Owned copy of the current draft.
    pub fn draft(&self) -> ContentDraft {
        self.inner.read().clone()
    }

    pub fn set_description(&self, description: &str) {
        let mut draft = self.inner.write();
        draft.description = description.to_string();
        self.persist(&draft);
    }

    pub fn set_media_url(&self, url: Option<String>) {
        let mut draft = self.inner.write();
        draft.media_url = url;
        self.persist(&draft);
    }

    pub fn set_scheduled_date(&self, date: Option<DateTime<Utc>>) {
        let mut draft = self.inner.write();
        draft.scheduled_date = date;
        self.persist(&draft);
    }

    /// Empty the draft and drop the persisted copy.
    pub fn reset(&self) {
        *self.inner.write() = ContentDraft::default();
        if self.storage.available() {
            self.storage.remove(CONTENT_KEY);
        }
    }

    fn persist(&self, draft: &ContentDraft) {
        if !self.storage.available() {
            return;
        }
        match serde_json::to_string(draft) {
            Ok(raw) => self.storage.write(CONTENT_KEY, &raw),
            Err(err) => tracing::warn!(error = %err, "content draft serialization failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStateStorage, NoopStateStorage};
    use chrono::TimeZone;

    #[test]
    fn draft_survives_a_reload() {
        let storage = Arc::new(MemoryStateStorage::new());
        let when = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        let store = ContentStore::load(storage.clone());
        store.set_description("Fresh sourdough every morning");
        store.set_media_url(Some("https://cdn.example/bread.jpg".into()));
        store.set_scheduled_date(Some(when));

        let reloaded = ContentStore::load(storage);
        assert_eq!(
            reloaded.draft(),
            ContentDraft {
                description: "Fresh sourdough every morning".into(),
                media_url: Some("https://cdn.example/bread.jpg".into()),
                scheduled_date: Some(when),
            }
        );
    }

    #[test]
    fn reset_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStateStorage::new());
        let store = ContentStore::load(storage.clone());
        store.set_description("half-written");

        store.reset();
        assert_eq!(store.draft(), ContentDraft::default());
        assert_eq!(storage.read(CONTENT_KEY), None);
    }

    #[test]
    fn unreadable_persisted_draft_is_discarded() {
        let storage = Arc::new(MemoryStateStorage::with_entry(CONTENT_KEY, "{not json"));
        let store = ContentStore::load(storage);
        assert_eq!(store.draft(), ContentDraft::default());
    }

    #[test]
    fn noop_storage_keeps_draft_in_memory_only() {
        let store = ContentStore::load(Arc::new(NoopStateStorage));
        store.set_description("ephemeral");
        assert_eq!(store.draft().description, "ephemeral");

        let fresh = ContentStore::load(Arc::new(NoopStateStorage));
        assert_eq!(fresh.draft(), ContentDraft::default());
    }
}
