//! Session lifecycle operations over the backend API.
//!
//! The manager owns the flow `Anonymous → Registered-Unverified →
//! Verified-PendingTenant → Tenant-Created` (registration path) and
//! `Anonymous → Authenticated` (login path). Tenant creation is a one-time
//! provisioning step, so its success retires the provisional session back
//! toward anonymous.
//!
//! Every operation wraps exactly one API call and returns an [`OpOutcome`];
//! nothing here returns `Err` or panics on a bad backend. Transport failures
//! become a fixed connection-error outcome, domain failures pass the server
//! message through verbatim.

use crate::api::{BackendApi, Credentials, RegisterProfile, TenantFields};
use crate::session::store::SessionStore;
use crate::session::token::decode_identity;
use serde_json::Value;
use std::sync::Arc;

/// Message shown when the backend could not be reached at all.
const CONNECTION_ERROR: &str = "connection error";

/// Uniform value returned by every session operation.
#[derive(Debug, Clone, Default)]
pub struct OpOutcome {
    pub success: bool,
    pub message: Option<String>,
    /// Fresh registration token — populated by `register` only.
    pub token: Option<String>,
    /// Email awaiting verification — populated by `register` only.
    pub email: Option<String>,
    /// Endpoint payload — populated by `create_tenant` only.
    pub data: Option<Value>,
}

impl OpOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    fn failure(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
            ..Default::default()
        }
    }

    fn connection_error() -> Self {
        Self::failure(Some(CONNECTION_ERROR.into()))
    }
}

/// Guarded mutation surface over the shared [`SessionStore`].
pub struct SessionManager {
    api: Arc<dyn BackendApi>,
    store: Arc<SessionStore>,
}

impl SessionManager {
    /// Create a manager without touching storage. Call [`Self::load_token`]
    /// to rehydrate, or use [`Self::start`] which bundles both.
    pub fn new(api: Arc<dyn BackendApi>, store: Arc<SessionStore>) -> Self {
        Self { api, store }
    }

    /// Create a manager and immediately rehydrate the persisted session.
    pub async fn start(api: Arc<dyn BackendApi>, store: Arc<SessionStore>) -> Self {
        let manager = Self::new(api, store);
        manager.load_token().await;
        manager
    }

    /// The shared session state this manager mutates.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Authenticate with username/password and adopt the issued token.
    pub async fn login(&self, username: &str, password: &str) -> OpOutcome {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&credentials).await {
            Ok(response) if response.success => {
                let Some(token) = response.extract_token() else {
                    tracing::warn!("login succeeded but the response carried no token");
                    return OpOutcome::failure(Some("login response carried no token".into()));
                };
                self.store.save_token(&token);
                self.load_token().await;
                OpOutcome::ok()
            }
            Ok(response) => OpOutcome::failure(response.message),
            Err(err) => {
                tracing::warn!(error = %err, "login request failed");
                OpOutcome::connection_error()
            }
        }
    }

    /// Register an administrator account.
    ///
    /// On success the issued token is adopted immediately and also stashed,
    /// together with the email, as the provisional registration state the
    /// verify step consumes.
    pub async fn register(&self, profile: &RegisterProfile) -> OpOutcome {
        match self.api.admin_register(profile).await {
            Ok(response) if response.success => {
                let Some(token) = response.extract_token() else {
                    tracing::warn!("registration succeeded but the response carried no token");
                    return OpOutcome::failure(Some(
                        "registration response carried no token".into(),
                    ));
                };
                self.store.save_token(&token);
                self.store
                    .set_temp_registration(Some(token.clone()), Some(profile.email.clone()));

                OpOutcome {
                    success: true,
                    message: response.message,
                    token: Some(token),
                    email: Some(profile.email.clone()),
                    data: None,
                }
            }
            Ok(response) => OpOutcome::failure(response.message),
            Err(err) => {
                tracing::warn!(error = %err, "registration request failed");
                OpOutcome::connection_error()
            }
        }
    }

    /// Confirm the one-time code sent after registration.
    pub async fn verify(&self, token: &str, code: &str) -> OpOutcome {
        match self.api.verification_response(token, code).await {
            Ok(response) if response.success => {
                self.store.clear_temp_email();
                OpOutcome {
                    success: true,
                    message: response.message,
                    ..Default::default()
                }
            }
            Ok(response) => OpOutcome::failure(response.message),
            Err(err) => {
                tracing::warn!(error = %err, "verification request failed");
                OpOutcome::connection_error()
            }
        }
    }

    /// Provision the tenant for a verified account.
    ///
    /// Success retires the provisional session: the onboarding identity has
    /// done its job once the tenant exists.
    pub async fn create_tenant(&self, token: &str, fields: &TenantFields) -> OpOutcome {
        match self.api.create_tenant(token, fields).await {
            Ok(response) if response.success => {
                self.store.clear();
                OpOutcome {
                    success: true,
                    message: response.message,
                    data: response.data,
                    ..Default::default()
                }
            }
            Ok(response) => OpOutcome::failure(response.message),
            Err(err) => {
                tracing::warn!(error = %err, "tenant creation request failed");
                OpOutcome::connection_error()
            }
        }
    }

    /// Drop the session.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// Restore session state from durable storage.
    ///
    /// With a persisted token present the account counts as authenticated
    /// regardless of what follows: the token payload is decoded for the `id`
    /// claim and the matching user record fetched to learn the tenant. Any
    /// failure along that chain — malformed token, undecodable payload,
    /// unreachable backend — is logged and collapses to "tenant unknown";
    /// a well-formed lookup that answers `success:false` leaves the tenant
    /// field as it was.
    pub async fn load_token(&self) {
        let Some(token) = self.store.rehydrate() else {
            return;
        };

        let identity = match decode_identity(&token) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "stored token payload is undecodable");
                self.store.set_tenant_id(None);
                return;
            }
        };

        match self.api.get_user(&token, &identity.id).await {
            Ok(response) if response.success => {
                if let Some(tenant_id) = response.tenant_id() {
                    self.store.set_tenant_id(Some(tenant_id));
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, user_id = %identity.id, "user lookup during rehydration failed");
                self.store.set_tenant_id(None);
            }
        }
    }
}
