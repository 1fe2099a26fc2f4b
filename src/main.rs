//! RBAC Policy Adapter
//!
//! Exposes a project's RBAC policy behind a load-balancer target group:
//! GET reads it, PUT/POST replace it, DELETE clears the custom entries.

use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tokio::net::TcpListener;

mod api;
mod client;
mod config;
mod domain;
mod error;
mod logging;

use crate::api::{build_router, PolicyHandler};
use crate::client::{ManagementClient, ManagementClientConfig};
use crate::config::Config;
use crate::domain::TargetGroupRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("Starting RBAC policy adapter v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        project_id = %config.project_id,
        workspace_key_id = %config.workspace_key_id,
        api_base_url = %config.api_base_url,
        "Initializing management client"
    );

    let client = ManagementClient::new(ManagementClientConfig::from(&config)).map_err(|e| {
        tracing::error!(error = %e, "Failed to build management client");
        anyhow::anyhow!("Client initialization error: {}", e)
    })?;

    let handler = PolicyHandler::new(Arc::new(client), config.project_id.clone());

    match config.listen_addr.as_deref() {
        Some(addr) => serve_local(handler, addr).await,
        None => run_event_loop(handler).await,
    }
}

/// Register the handler with the event runtime; one call per target-group event.
async fn run_event_loop(handler: PolicyHandler) -> anyhow::Result<()> {
    tracing::info!(project_id = %handler.project_id(), "Waiting for target-group events");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<TargetGroupRequest>| {
        let handler = handler.clone();
        async move { Ok::<_, lambda_runtime::Error>(handler.handle(event.payload).await) }
    }))
    .await
    .map_err(|e| anyhow::anyhow!("Event runtime error: {}", e))
}

/// Serve the handler over plain HTTP for local development.
async fn serve_local(handler: PolicyHandler, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;

    tracing::warn!(
        address = %addr,
        project_id = %handler.project_id(),
        "Serving over local HTTP listener - not for production"
    );

    axum::serve(listener, build_router(handler)).await?;

    Ok(())
}
