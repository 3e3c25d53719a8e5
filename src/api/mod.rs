//! Typed HTTP client for the CMPanel backend.
//!
//! Every endpoint speaks the same JSON envelope (`success` / `message` /
//! `data`), and every token-carrying call authenticates with an
//! `Authorization: Bearer <token>` header.
//!
//! ## Design
//! - [`BackendApi`] is the narrow seam the session manager consumes; tests
//!   substitute a scripted implementation.
//! - [`ApiClient`] implements that seam plus the rest of the backend surface
//!   (comments, jobs, posts, description generation) as inherent methods.
//! - A response is an error only at the transport layer; a parseable
//!   envelope is handed back as-is even on non-2xx statuses, and its
//!   `success` flag decides domain success or failure.

pub mod types;

pub use types::{ApiResponse, Credentials, PostDraft, RegisterProfile, TenantFields};

use crate::config::Config;
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use types::TenantBody;

/// Cap on how much of an unparseable body is kept in the error.
const BODY_SNIPPET_LEN: usize = 256;

/// Backend surface consumed by the session manager.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ApiError>;
    async fn admin_register(&self, profile: &RegisterProfile) -> Result<ApiResponse, ApiError>;
    async fn verification_response(&self, token: &str, code: &str)
        -> Result<ApiResponse, ApiError>;
    async fn create_tenant(&self, token: &str, fields: &TenantFields)
        -> Result<ApiResponse, ApiError>;
    async fn get_user(&self, token: &str, user_id: &str) -> Result<ApiResponse, ApiError>;
}

/// HTTP client bound to one backend origin.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client from the runtime configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Send the request and parse the uniform envelope.
    ///
    /// Any status code with a parseable envelope body is an `Ok`; callers
    /// inspect `success` to tell domain failures apart. Everything else is a
    /// transport error.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        serde_json::from_str::<ApiResponse>(&body).map_err(|_| ApiError::InvalidBody {
            status: status.as_u16(),
            body: snippet(&body),
        })
    }

    // ── Comments ─────────────────────────────────────────────

    /// Fetch the comment feed for a tenant.
    pub async fn get_comments(
        &self,
        token: &str,
        tenant_id: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.http.get(self.url(&format!("/api/v1/comments/{tenant_id}")));
        self.execute(Self::bearer(request, token)).await
    }

    // ── Scheduled jobs ───────────────────────────────────────

    /// Queue a scheduled action for the caller's tenant.
    pub async fn schedule_job(
        &self,
        token: &str,
        action: &str,
        data: Value,
        scheduled_at: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.http.post(self.url("/api/v1/jobs/")).json(&json!({
            "action": action,
            "data": data,
            "scheduledAt": scheduled_at,
        }));
        self.execute(Self::bearer(request, token)).await
    }

    /// List the scheduled jobs belonging to the caller's tenant.
    pub async fn get_jobs(&self, token: &str) -> Result<ApiResponse, ApiError> {
        let request = self.http.get(self.url("/api/v1/jobs/"));
        self.execute(Self::bearer(request, token)).await
    }

    /// Move a scheduled job to a new time.
    pub async fn update_job(
        &self,
        token: &str,
        job_id: &str,
        scheduled_at: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/api/v1/jobs/{job_id}")))
            .json(&json!({ "scheduledAt": scheduled_at }));
        self.execute(Self::bearer(request, token)).await
    }

    /// Cancel a scheduled job.
    pub async fn delete_job(&self, token: &str, job_id: &str) -> Result<ApiResponse, ApiError> {
        let request = self.http.delete(self.url(&format!("/api/v1/jobs/{job_id}")));
        self.execute(Self::bearer(request, token)).await
    }

    // ── Content ──────────────────────────────────────────────

    /// Ask the backend to draft a post description for an image.
    pub async fn generate_description(
        &self,
        tenant_id: &str,
        image_url: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/v1/generate-description"))
            .json(&json!({ "tenantId": tenant_id, "imageUrl": image_url }));
        self.execute(request).await
    }

    /// Publish a post draft.
    pub async fn create_post(
        &self,
        token: &str,
        draft: &PostDraft,
    ) -> Result<ApiResponse, ApiError> {
        let request = self.http.post(self.url("/api/v1/posts/")).json(draft);
        self.execute(Self::bearer(request, token)).await
    }

    /// Free-form model prompt, unauthenticated.
    pub async fn gemini_request(&self, prompt: &str) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/v1/geminiRequest"))
            .json(&json!({ "prompt": prompt }));
        self.execute(request).await
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ApiError> {
        let request = self.http.post(self.url("/api/v1/login")).json(credentials);
        self.execute(request).await
    }

    async fn admin_register(&self, profile: &RegisterProfile) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/v1/admin-register"))
            .json(profile);
        self.execute(request).await
    }

    async fn verification_response(
        &self,
        token: &str,
        code: &str,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/v1/verification-response"))
            .json(&json!({ "code": code }));
        self.execute(Self::bearer(request, token)).await
    }

    async fn create_tenant(
        &self,
        token: &str,
        fields: &TenantFields,
    ) -> Result<ApiResponse, ApiError> {
        let request = self
            .http
            .post(self.url("/api/v1/tenants"))
            .json(&TenantBody::from(fields));
        self.execute(Self::bearer(request, token)).await
    }

    async fn get_user(&self, token: &str, user_id: &str) -> Result<ApiResponse, ApiError> {
        let request = self.http.get(self.url(&format!("/api/v1/users/{user_id}")));
        self.execute(Self::bearer(request, token)).await
    }
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        body.to_string()
    } else {
        let mut end = BODY_SNIPPET_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let config = Config {
            api_base_url: server.uri(),
            ..Default::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn login_posts_credentials_and_parses_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .and(body_json(json!({"username": "alice", "password": "s3cret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"token": "tok-1"},
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credentials = Credentials {
            username: "alice".into(),
            password: "s3cret".into(),
        };
        let response = client.login(&credentials).await.unwrap();
        assert!(response.success);
        assert_eq!(response.extract_token(), Some("tok-1".into()));
    }

    #[tokio::test]
    async fn verification_sends_bearer_header_and_code_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/verification-response"))
            .and(header("Authorization", "Bearer tok-1"))
            .and(body_json(json!({"code": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "verified",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.verification_response("tok-1", "123456").await.unwrap();
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("verified"));
    }

    #[tokio::test]
    async fn create_tenant_maps_fields_to_backend_casing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/tenants"))
            .and(header("Authorization", "Bearer tok-1"))
            .and(body_json(json!({
                "Name": "Bakery",
                "Description": "Sourdough daily",
                "Slug": "bakery",
                "Category": "food",
                "AgentPrompt": "Friendly tone",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "t1"},
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let fields = TenantFields {
            name: "Bakery".into(),
            slug: "bakery".into(),
            category: "food".into(),
            business_info: "Sourdough daily".into(),
            agent_prompt: "Friendly tone".into(),
        };
        let response = client.create_tenant("tok-1", &fields).await.unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn get_user_hits_user_path_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/u1"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"tenantID": "t1"},
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.get_user("tok-1", "u1").await.unwrap();
        assert_eq!(response.tenant_id(), Some("t1".into()));
    }

    #[tokio::test]
    async fn structured_failure_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "message": "invalid credentials",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credentials = Credentials {
            username: "alice".into(),
            password: "wrong".into(),
        };
        let response = client.login(&credentials).await.unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("invalid credentials"));
    }

    #[tokio::test]
    async fn unstructured_body_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/jobs/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_jobs("tok-1").await.unwrap_err();
        match err {
            ApiError::InvalidBody { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "Bad Gateway");
            }
            other => panic!("expected InvalidBody, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn schedule_job_sends_scheduled_at_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/jobs/"))
            .and(header("Authorization", "Bearer tok-1"))
            .and(body_json(json!({
                "action": "publish_post",
                "data": {"postId": "p1"},
                "scheduledAt": "2026-03-01T09:00:00Z",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .schedule_job(
                "tok-1",
                "publish_post",
                json!({"postId": "p1"}),
                "2026-03-01T09:00:00Z",
            )
            .await
            .unwrap();
        assert!(response.success);
    }

    #[test]
    fn snippet_truncates_long_bodies() {
        let long = "x".repeat(BODY_SNIPPET_LEN * 2);
        let cut = snippet(&long);
        assert!(cut.chars().count() == BODY_SNIPPET_LEN + 1);
        assert!(cut.ends_with('…'));
    }
}
