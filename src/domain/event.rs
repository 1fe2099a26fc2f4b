//! Load-balancer target-group envelope.
//!
//! The event runtime hands the adapter one [`TargetGroupRequest`] per
//! invocation and returns the [`TargetGroupResponse`] to the load balancer
//! verbatim.

use std::collections::HashMap;
use std::string::FromUtf8Error;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::null_as_default;

/// Content type carried by every response.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Inbound request forwarded by the load balancer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetGroupRequest {
    pub http_method: String,
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    pub request_context: RequestContext,
    pub is_base64_encoded: bool,
    pub body: Option<String>,
}

/// Origin of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub elb: ElbContext,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElbContext {
    pub target_group_arn: Option<String>,
}

/// Body could not be turned into text.
#[derive(Debug, Error)]
pub enum BodyDecodeError {
    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl TargetGroupRequest {
    /// Create a request with the given method and path and no body.
    pub fn new(http_method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Attach a plain-text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Attach a base64-encoded body.
    pub fn with_base64_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = true;
        self
    }

    /// The request body as text, decoding base64 when the load balancer
    /// flagged it. A missing body is the empty string.
    pub fn decoded_body(&self) -> Result<String, BodyDecodeError> {
        let raw = self.body.as_deref().unwrap_or_default();
        if !self.is_base64_encoded {
            return Ok(raw.to_string());
        }

        let bytes = STANDARD.decode(raw)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Outbound response returned to the load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl TargetGroupResponse {
    /// A JSON response with the given status.
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());

        Self {
            status_code: status.as_u16(),
            status_description: status_description(status),
            headers,
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    /// An empty 204 response. Still carries the JSON content type.
    pub fn no_content() -> Self {
        Self::json(StatusCode::NO_CONTENT, String::new())
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }).to_string())
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn status_description(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_alb_event() {
        let event = r#"{
            "requestContext": {
                "elb": {
                    "targetGroupArn": "arn:aws:elasticloadbalancing:us-east-1:123456789012:targetgroup/rbac/abc"
                }
            },
            "httpMethod": "PUT",
            "path": "/rbacpolicy",
            "queryStringParameters": {},
            "headers": {"content-type": "application/json"},
            "body": "{\"custom_roles\": []}",
            "isBase64Encoded": false
        }"#;

        let request: TargetGroupRequest = serde_json::from_str(event).unwrap();
        assert_eq!(request.http_method, "PUT");
        assert_eq!(request.path, "/rbacpolicy");
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some(CONTENT_TYPE_JSON)
        );
        assert!(request
            .request_context
            .elb
            .target_group_arn
            .as_deref()
            .unwrap()
            .ends_with("targetgroup/rbac/abc"));
        assert_eq!(request.decoded_body().unwrap(), "{\"custom_roles\": []}");
    }

    #[test]
    fn test_null_maps_accepted() {
        let request: TargetGroupRequest = serde_json::from_str(
            r#"{"httpMethod": "GET", "path": "/", "headers": null, "queryStringParameters": null}"#,
        )
        .unwrap();
        assert!(request.headers.is_empty());
        assert!(request.query_string_parameters.is_empty());
        assert_eq!(request.decoded_body().unwrap(), "");
    }

    #[test]
    fn test_base64_body_decoded() {
        let request = TargetGroupRequest::new("POST", "/rbacpolicy")
            .with_base64_body(STANDARD.encode(r#"{"custom_roles":[]}"#));

        assert_eq!(request.decoded_body().unwrap(), r#"{"custom_roles":[]}"#);
    }

    #[test]
    fn test_invalid_base64_body_rejected() {
        let request =
            TargetGroupRequest::new("POST", "/rbacpolicy").with_base64_body("not base64!!");

        assert!(matches!(
            request.decoded_body(),
            Err(BodyDecodeError::Base64(_))
        ));
    }

    #[test]
    fn test_json_response_shape() {
        let response = TargetGroupResponse::json(StatusCode::OK, "{}");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["statusDescription"], "200 OK");
        assert_eq!(value["headers"]["Content-Type"], CONTENT_TYPE_JSON);
        assert_eq!(value["isBase64Encoded"], false);
    }

    #[test]
    fn test_error_response_body() {
        let response = TargetGroupResponse::error(StatusCode::NOT_FOUND, "Resource not found");
        let body: HashMap<String, String> = serde_json::from_str(&response.body).unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Resource not found");
    }

    #[test]
    fn test_no_content_keeps_content_type() {
        let response = TargetGroupResponse::no_content();
        assert_eq!(response.status_code, 204);
        assert_eq!(response.status_description, "204 No Content");
        assert!(response.body.is_empty());
        assert_eq!(response.headers["Content-Type"], CONTENT_TYPE_JSON);
    }
}
