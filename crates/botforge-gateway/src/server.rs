// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, permissive CORS, and shared state for request handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get, post};
use axum::Router;
use botforge_config::model::ServerConfig;
use botforge_core::BotforgeError;
use botforge_orchestrator::Orchestrator;
use botforge_services::TelegramClient;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers;
use crate::webhook;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Orchestrator,
    pub telegram: Arc<TelegramClient>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(orchestrator: Orchestrator, telegram: Arc<TelegramClient>) -> Self {
        Self {
            orchestrator,
            telegram,
            start_time: Instant::now(),
        }
    }
}

/// Build the gateway router.
///
/// Every route answers CORS pre-flight with open (`*`) headers; the
/// consuming dashboard is served from a different origin.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/generate", post(handlers::post_generate))
        .route("/v1/bots/{id}/deploy", post(handlers::post_deploy))
        .route("/v1/bots/{id}/monitor", post(handlers::post_monitor))
        .route("/v1/bots/{id}/scale-down", post(handlers::post_scale_down))
        .route("/v1/bots/{id}/cleanup", post(handlers::post_cleanup))
        .route("/v1/bots/{id}/files", get(handlers::get_files))
        .route("/v1/bots/{id}/logs", get(handlers::get_logs))
        .route("/v1/bots/{id}", delete(handlers::delete_bot))
        .route("/webhook/{bot_id}", post(webhook::post_webhook))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), BotforgeError> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BotforgeError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| BotforgeError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;
    Ok(())
}
