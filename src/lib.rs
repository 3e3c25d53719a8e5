//! CMPanel client core — session lifecycle, backend API client, and
//! persisted draft state for the multi-tenant content-management console.
//!
//! Provides:
//! - Session store + manager (login, register, verify, create-tenant,
//!   logout) over the backend's JSON envelope
//! - Bearer-token persistence and payload decoding for rehydration
//! - Typed HTTP client covering the full backend surface
//! - Route guard gating navigation on the derived authentication flag
//! - Persisted drafts for the post composer and media previews
//!
//! ## Design Decisions
//! - Session state is an explicit injectable object shared via `Arc`, not a
//!   process global; hosts decide its lifetime.
//! - Durable storage is a capability trait with a no-op implementation for
//!   contexts that have no medium (server-side pre-render, headless runs).
//! - Session operations return outcome values instead of `Result`; only the
//!   typed API client and local file reads expose real errors.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;
pub mod stores;

pub use api::{ApiClient, ApiResponse, BackendApi, Credentials, PostDraft, RegisterProfile, TenantFields};
pub use config::Config;
pub use error::{ApiError, TokenDecodeError};
pub use guard::{GuardDecision, RouteGuard};
pub use session::{OpOutcome, Session, SessionManager, SessionStore};
pub use storage::{FileStateStorage, MemoryStateStorage, NoopStateStorage, StateStorage};
pub use stores::{ContentDraft, ContentStore, MediaStore};

use std::sync::Arc;

/// The fully wired client core.
pub struct Core {
    pub storage: Arc<dyn StateStorage>,
    pub session: Arc<SessionStore>,
    pub manager: SessionManager,
    pub content: ContentStore,
    pub media: MediaStore,
}

/// Wire the default stack for `config`: file-backed storage when a data
/// directory resolves (no-op storage otherwise), the HTTP client, and a
/// rehydrated session.
pub async fn bootstrap(config: &Config) -> anyhow::Result<Core> {
    let storage: Arc<dyn StateStorage> = match config.resolve_storage_dir() {
        Some(dir) => Arc::new(FileStateStorage::new(dir)?),
        None => {
            tracing::warn!("no data directory resolved; running without durable state");
            Arc::new(NoopStateStorage)
        }
    };

    let api = Arc::new(ApiClient::new(config)?);
    let session = Arc::new(SessionStore::new(storage.clone()));
    let manager = SessionManager::start(api, session.clone()).await;

    Ok(Core {
        content: ContentStore::load(storage.clone()),
        media: MediaStore::load(storage.clone()),
        storage,
        session,
        manager,
    })
}
