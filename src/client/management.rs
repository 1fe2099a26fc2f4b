//! HTTP client for the RBAC policy endpoints of the management API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::{ClientError, ClientResult, RbacPolicyClient};
use crate::config::Config;
use crate::domain::Policy;

/// Management API connection settings.
#[derive(Clone)]
pub struct ManagementClientConfig {
    /// Base URL, without a trailing path.
    pub base_url: String,
    /// Workspace key id, sent as the basic-auth user.
    pub key_id: String,
    /// Workspace key secret, sent as the basic-auth password.
    pub key_secret: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl From<&Config> for ManagementClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            key_id: config.workspace_key_id.clone(),
            key_secret: config.workspace_key_secret.clone(),
            timeout: config.request_timeout,
        }
    }
}

impl fmt::Debug for ManagementClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementClientConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SetPolicyRequest<'a> {
    policy: &'a Policy,
}

#[derive(Debug, Deserialize)]
struct PolicyResponse {
    #[serde(default)]
    request_id: String,
    #[serde(default)]
    policy: Policy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    request_id: String,
    error_type: String,
    error_message: String,
}

/// [`RbacPolicyClient`] backed by the management API.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    config: ManagementClientConfig,
    client: Client,
}

impl ManagementClient {
    pub fn new(config: ManagementClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("rbacpolicy-adapter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, client })
    }

    fn policy_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/rbac_policy",
            self.config.base_url.trim_end_matches('/'),
            project_id
        )
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<Policy> {
        let response = request
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let body: PolicyResponse = response.json().await?;
        tracing::debug!(request_id = %body.request_id, "Management API call succeeded");

        Ok(body.policy)
    }
}

#[async_trait]
impl RbacPolicyClient for ManagementClient {
    async fn get(&self, project_id: &str) -> ClientResult<Policy> {
        let request = self.client.get(self.policy_url(project_id));
        self.execute(request).await
    }

    async fn set(&self, project_id: &str, policy: Policy) -> ClientResult<Policy> {
        let request = self
            .client
            .put(self.policy_url(project_id))
            .json(&SetPolicyRequest { policy: &policy });
        self.execute(request).await
    }
}

/// Builds an API error from a non-success response, falling back to the
/// raw body when it is not the usual error document.
fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error_message.is_empty() => {
            tracing::debug!(
                request_id = %parsed.request_id,
                status = status.as_u16(),
                "Management API returned an error"
            );
            ClientError::api(status.as_u16(), parsed.error_type, parsed.error_message)
        }
        _ => {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            };
            ClientError::api(status.as_u16(), "unknown", message)
        }
    }
}
