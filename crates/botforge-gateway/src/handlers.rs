// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the lifecycle REST API.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::server::GatewayState;

const DEFAULT_LOG_LIMIT: u32 = 100;

/// Request body for the per-bot lifecycle endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRequest {
    pub user_id: String,
}

/// Request body for POST /v1/generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub bot_id: String,
    pub user_id: String,
    pub prompt: String,
    pub token: String,
}

/// Query string for GET /v1/bots/{id}/files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesQuery {
    pub user_id: String,
}

/// Query string for GET /v1/bots/{id}/logs.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /v1/bots/{id}/deploy
pub async fn post_deploy(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(body): Json<LifecycleRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.orchestrator.deploy(&bot_id, &body.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "deployment": outcome.deployment,
        "logs": outcome.logs,
    })))
}

/// POST /v1/bots/{id}/monitor
pub async fn post_monitor(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(body): Json<LifecycleRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state.orchestrator.monitor(&bot_id, &body.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "metrics": outcome.metrics,
        "isInactive": outcome.is_inactive,
        "logs": outcome.logs,
    })))
}

/// POST /v1/bots/{id}/scale-down
pub async fn post_scale_down(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(body): Json<LifecycleRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .orchestrator
        .scale_down_if_idle(&bot_id, &body.user_id)
        .await?;
    Ok(Json(json!({
        "success": true,
        "isInactive": outcome.is_inactive,
        "scaledDown": outcome.scaled_down,
        "logs": outcome.logs,
    })))
}

/// POST /v1/bots/{id}/cleanup
pub async fn post_cleanup(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(body): Json<LifecycleRequest>,
) -> Result<Json<Value>, ApiError> {
    let report = state.orchestrator.cleanup(&bot_id, &body.user_id).await?;
    Ok(Json(json!({
        "success": true,
        "logs": report.logs,
    })))
}

/// DELETE /v1/bots/{id}
pub async fn delete_bot(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(body): Json<LifecycleRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .orchestrator
        .delete_bot(&bot_id, &body.user_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /v1/generate
pub async fn post_generate(
    State(state): State<GatewayState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .orchestrator
        .generate_bot(&body.bot_id, &body.user_id, &body.prompt, &body.token)
        .await?;
    Ok(Json(json!({
        "success": true,
        "botCode": {
            "files": outcome.files,
            "explanation": outcome.explanation,
        },
        "deployment": { "started": false },
        "filesUploaded": outcome.files_uploaded,
    })))
}

/// GET /v1/bots/{id}/files
///
/// Returns the stored generated file set as a name-to-content map.
pub async fn get_files(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Query(query): Query<FilesQuery>,
) -> Result<Json<Value>, ApiError> {
    if query.user_id.trim().is_empty() {
        return Err(botforge_core::BotforgeError::Validation(
            "userId must not be empty".to_string(),
        )
        .into());
    }
    let store = state.orchestrator.store();
    store.require_bot(&bot_id).await?;
    let files = store.list_files(&bot_id).await?;
    let map: Map<String, Value> = files
        .into_iter()
        .map(|f| (f.name, Value::String(f.content)))
        .collect();
    Ok(Json(json!({
        "success": true,
        "files": map,
    })))
}

/// GET /v1/bots/{id}/logs
///
/// Returns the newest runtime log lines, oldest first.
pub async fn get_logs(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.orchestrator.store();
    store.require_bot(&bot_id).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
    let lines = store.recent_log_lines(&bot_id, limit).await?;
    let logs: Vec<String> = lines.into_iter().map(|l| l.line).collect();
    Ok(Json(json!({
        "success": true,
        "logs": logs,
    })))
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
