// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook receiver for inbound messaging-platform updates.
//!
//! Invoked by the platform once per inbound message. The reply is a
//! hard-coded stand-in for executing the generated code; when no generated
//! file is stored yet, a default greeting is sent instead of failing the
//! request.

use axum::extract::{Path, State};
use axum::Json;
use botforge_core::types::now_rfc3339;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::WebhookError;
use crate::server::GatewayState;

/// The subset of a platform update the receiver cares about.
#[derive(Debug, Deserialize)]
pub struct WebhookUpdate {
    #[serde(default)]
    pub message: Option<UpdateMessage>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessage {
    pub chat: UpdateChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChat {
    pub id: i64,
}

/// POST /webhook/{bot_id}
///
/// Replies `{ok: true}` on every handled path; only a missing bot record
/// fails the request.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Json(update): Json<WebhookUpdate>,
) -> Result<Json<Value>, WebhookError> {
    let store = state.orchestrator.store();
    let bot = store.require_bot(&bot_id).await?;

    let Some(message) = update.message else {
        // Non-message updates (edits, callbacks) are acknowledged and dropped.
        debug!(bot_id, "update without message; ignoring");
        return Ok(Json(json!({ "ok": true })));
    };
    let text = message.text.unwrap_or_default();

    let reply = match store.get_file(&bot_id, "main.py").await? {
        Some(_) => format!("[{}] received: {text}", bot.name),
        None => format!(
            "Hello! I'm {}. My code isn't ready yet, please try again soon.",
            bot.name
        ),
    };

    state
        .telegram
        .send_message(&bot.token, message.chat.id, &reply)
        .await
        .map_err(|e| {
            warn!(bot_id, error = %e, "reply delivery failed");
            e
        })?;

    let line = format!("[{}] message handled, replied {} chars", now_rfc3339(), reply.len());
    store
        .append_log_lines(&bot_id, std::slice::from_ref(&line))
        .await?;
    store.touch_activity(&bot_id).await?;

    Ok(Json(json!({ "ok": true })))
}
