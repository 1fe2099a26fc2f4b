//! Target-group request handler.
//!
//! Routes one load-balancer request to the remote policy client and shapes
//! the answer. Never fails: every error becomes a response.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde::Serialize;

use crate::client::RbacPolicyClient;
use crate::domain::{Policy, TargetGroupRequest, TargetGroupResponse};
use crate::error::{AdapterError, AdapterResult};

/// Paths answered locally without touching the management API.
const HEALTH_PATHS: [&str; 2] = ["/health", "/rbacpolicy/health"];

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handles RBAC policy requests for a single project.
#[derive(Clone)]
pub struct PolicyHandler {
    client: Arc<dyn RbacPolicyClient>,
    project_id: String,
}

impl PolicyHandler {
    pub fn new(client: Arc<dyn RbacPolicyClient>, project_id: impl Into<String>) -> Self {
        Self {
            client,
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Handle one request.
    ///
    /// - `GET /health`, `GET /rbacpolicy/health`: fixed healthy payload
    /// - `GET`: current policy
    /// - `PUT`, `POST`: replace the policy with the body
    /// - `DELETE`: clear custom roles and resources
    /// - anything else: 405
    pub async fn handle(&self, request: TargetGroupRequest) -> TargetGroupResponse {
        tracing::info!(
            method = %request.http_method,
            path = %request.path,
            target_group = request.request_context.elb.target_group_arn.as_deref().unwrap_or("-"),
            "Processing request"
        );

        let method = Method::from_bytes(request.http_method.as_bytes()).ok();

        if method == Some(Method::GET) && HEALTH_PATHS.contains(&request.path.as_str()) {
            return health_check();
        }

        let result = match method {
            Some(Method::GET) => self.get_policy().await,
            Some(Method::PUT) | Some(Method::POST) => self.put_policy(&request).await,
            Some(Method::DELETE) => self.delete_policy().await,
            _ => Err(AdapterError::MethodNotAllowed),
        };

        result.unwrap_or_else(AdapterError::into_response)
    }

    async fn get_policy(&self) -> AdapterResult<TargetGroupResponse> {
        let policy = self
            .client
            .get(&self.project_id)
            .await
            .map_err(AdapterError::GetPolicy)?;

        json_ok(&policy)
    }

    async fn put_policy(&self, request: &TargetGroupRequest) -> AdapterResult<TargetGroupResponse> {
        let body = request.decoded_body()?;
        let policy: Policy = serde_json::from_str(&body)?;

        tracing::debug!(
            custom_roles = policy.custom_roles.len(),
            custom_resources = policy.custom_resources.len(),
            "Setting RBAC policy"
        );

        let stored = self
            .client
            .set(&self.project_id, policy)
            .await
            .map_err(AdapterError::SetPolicy)?;

        json_ok(&stored)
    }

    /// Read-modify-write: the management API only offers full replacement.
    /// Nothing guards against a concurrent writer between the two calls.
    async fn delete_policy(&self) -> AdapterResult<TargetGroupResponse> {
        let current = self
            .client
            .get(&self.project_id)
            .await
            .map_err(AdapterError::GetCurrentPolicy)?;

        tracing::debug!(
            had_custom_entries = current.has_custom_entries(),
            "Clearing custom RBAC entries"
        );
        let cleared = current.without_custom_entries();

        self.client
            .set(&self.project_id, cleared)
            .await
            .map_err(AdapterError::ClearPolicy)?;

        tracing::info!(project_id = %self.project_id, "Cleared custom RBAC entries");

        Ok(TargetGroupResponse::no_content())
    }
}

fn health_check() -> TargetGroupResponse {
    let body = serde_json::to_string(&HealthResponse { status: "healthy" })
        .unwrap_or_else(|_| r#"{"status":"healthy"}"#.to_string());

    TargetGroupResponse::json(StatusCode::OK, body)
}

fn json_ok<T: Serialize>(value: &T) -> AdapterResult<TargetGroupResponse> {
    let body = serde_json::to_string(value).map_err(AdapterError::Serialization)?;
    Ok(TargetGroupResponse::json(StatusCode::OK, body))
}
