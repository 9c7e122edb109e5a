// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API client.
//!
//! Covers the three methods the platform needs: `sendMessage` for webhook
//! replies, and `setWebhook`/`deleteWebhook` to point Telegram's update
//! delivery at (or away from) the gateway's per-bot webhook endpoint. The
//! bot token is supplied per call because every bot has its own token.

use std::time::Duration;

use async_trait::async_trait;
use botforge_config::model::TelegramConfig;
use botforge_core::types::ServiceCall;
use botforge_core::{BotforgeError, WebhookRegistrar};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    allowed_updates: &'a [&'a str],
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    description: Option<String>,
}

/// Client for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    webhook_base: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, BotforgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BotforgeError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            webhook_base: config.webhook_base.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the API base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_api_base(mut self, url: String) -> Self {
        self.api_base = url.trim_end_matches('/').to_string();
        self
    }

    /// Send a text reply to a chat on behalf of the bot owning `token`.
    pub async fn send_message(
        &self,
        token: &str,
        chat_id: i64,
        text: &str,
    ) -> Result<(), BotforgeError> {
        let url = format!("{}/bot{token}/sendMessage", self.api_base);
        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| BotforgeError::Channel {
                message: format!("sendMessage request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(%status, chat_id, "sendMessage response received");
        let body: TelegramResponse =
            response.json().await.map_err(|e| BotforgeError::Channel {
                message: format!("malformed sendMessage response: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !body.ok {
            let detail = body
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(BotforgeError::Channel {
                message: format!("sendMessage rejected: {detail}"),
                source: None,
            });
        }
        Ok(())
    }

    /// Tell Telegram to deliver the bot's updates to `url`.
    pub async fn set_webhook(&self, token: &str, url: &str) -> Result<(), BotforgeError> {
        let body = SetWebhookRequest {
            url,
            allowed_updates: &["message", "callback_query"],
        };
        self.call_method(token, "setWebhook", ServiceCall::RegisterWebhook, Some(&body))
            .await
    }

    /// Remove the bot's webhook; Telegram stops delivering updates.
    pub async fn delete_webhook(&self, token: &str) -> Result<(), BotforgeError> {
        self.call_method::<()>(token, "deleteWebhook", ServiceCall::UnregisterWebhook, None)
            .await
    }

    async fn call_method<B: Serialize + Sync>(
        &self,
        token: &str,
        method: &str,
        call: ServiceCall,
        body: Option<&B>,
    ) -> Result<(), BotforgeError> {
        let url = format!("{}/bot{token}/{method}", self.api_base);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| BotforgeError::Upstream {
            call,
            message: format!("{method} request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        let parsed: TelegramResponse =
            response.json().await.map_err(|e| BotforgeError::Upstream {
                call,
                message: format!("malformed {method} response: {e}"),
                source: Some(Box::new(e)),
            })?;
        if !parsed.ok {
            let detail = parsed
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(BotforgeError::upstream(
                call,
                format!("{method} rejected: {detail}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WebhookRegistrar for TelegramClient {
    async fn register_webhook(&self, token: &str, bot_id: &str) -> Result<(), BotforgeError> {
        let url = format!("{}/webhook/{bot_id}", self.webhook_base);
        self.set_webhook(token, &url).await?;
        info!(bot_id, %url, "webhook registered");
        Ok(())
    }

    async fn unregister_webhook(&self, token: &str, bot_id: &str) -> Result<(), BotforgeError> {
        self.delete_webhook(token).await?;
        info!(bot_id, "webhook unregistered");
        Ok(())
    }
}
