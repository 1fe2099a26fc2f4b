//! Local development server.
//!
//! Serves the same handler over plain HTTP so the adapter can be exercised
//! without the event runtime. Every request is translated into the
//! target-group envelope the load balancer would have produced.

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    extract::{Query, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower_http::trace::TraceLayer;

use crate::api::PolicyHandler;
use crate::domain::{TargetGroupRequest, TargetGroupResponse};

/// Load balancers reject Lambda-target bodies above 1 MB.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the local router: every method and path goes to the handler.
pub fn build_router(handler: PolicyHandler) -> Router {
    Router::new()
        .fallback(forward)
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}

async fn forward(State(handler): State<PolicyHandler>, request: Request) -> Response {
    let request = match into_target_group_request(request).await {
        Ok(request) => request,
        Err(response) => return into_http_response(response),
    };

    into_http_response(handler.handle(request).await)
}

/// Translate an HTTP request into the load-balancer envelope.
async fn into_target_group_request(
    request: Request,
) -> Result<TargetGroupRequest, TargetGroupResponse> {
    let (parts, body) = request.into_parts();

    let query_string_parameters = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .unwrap_or_default();

    let mut headers = HashMap::new();
    for (name, value) in parts.headers.iter() {
        if let Ok(value) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read request body");
        TargetGroupResponse::error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    })?;

    let mut request = TargetGroupRequest::new(parts.method.as_str(), parts.uri.path());
    request.query_string_parameters = query_string_parameters;
    request.headers = headers;

    if bytes.is_empty() {
        return Ok(request);
    }

    Ok(match String::from_utf8(bytes.to_vec()) {
        Ok(text) => request.with_body(text),
        Err(_) => request.with_base64_body(STANDARD.encode(&bytes)),
    })
}

fn into_http_response(response: TargetGroupResponse) -> Response {
    let status = response.status();
    let mut http_response = (status, Body::from(response.body)).into_response();

    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                http_response.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }

    http_response
}
