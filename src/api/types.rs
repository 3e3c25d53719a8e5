//! Wire models for the backend's JSON envelope and request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response envelope returned by every backend endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    /// Some backend builds return the bearer token at the top level instead
    /// of inside `data`; kept so [`ApiResponse::extract_token`] can fall back
    /// to it.
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiResponse {
    /// Resolve the bearer token from the envelope.
    ///
    /// Deployed backends have answered with three shapes over time:
    /// `data.token`, a top-level `token`, and a bare string `data`. Callers
    /// do not control which shape they get, so the fallback order is
    /// load-bearing and must stay exactly this way.
    pub fn extract_token(&self) -> Option<String> {
        if let Some(Value::Object(map)) = &self.data {
            if let Some(Value::String(token)) = map.get("token") {
                return Some(token.clone());
            }
        }
        if let Some(token) = &self.token {
            return Some(token.clone());
        }
        if let Some(Value::String(token)) = &self.data {
            return Some(token.clone());
        }
        None
    }

    /// Tenant identifier attached to a user record, if the payload has one.
    pub fn tenant_id(&self) -> Option<String> {
        self.data
            .as_ref()
            .and_then(|data| data.get("tenantID"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Administrator registration profile.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterProfile {
    pub names: String,
    pub lastnames: String,
    /// National ID number, digits only.
    pub rut: String,
    /// ID verification digit.
    pub dv: String,
    pub email: String,
}

/// Tenant descriptor collected by the provisioning form.
#[derive(Debug, Clone)]
pub struct TenantFields {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub business_info: String,
    pub agent_prompt: String,
}

/// The tenant-creation endpoint takes PascalCase keys and files
/// `business_info` under `Description`.
#[derive(Debug, Serialize)]
pub(crate) struct TenantBody<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Slug")]
    slug: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "AgentPrompt")]
    agent_prompt: &'a str,
}

impl<'a> From<&'a TenantFields> for TenantBody<'a> {
    fn from(fields: &'a TenantFields) -> Self {
        Self {
            name: &fields.name,
            description: &fields.business_info,
            slug: &fields.slug,
            category: &fields.category,
            agent_prompt: &fields.agent_prompt,
        }
    }
}

/// A post draft submitted to the publishing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PostDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
