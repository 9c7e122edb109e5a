// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook registration contract.

use async_trait::async_trait;

use crate::error::BotforgeError;

/// Points the messaging platform's update delivery at (or away from) a bot's
/// webhook endpoint.
///
/// The implementation knows the public URL the receiver is served from; the
/// orchestrator only supplies the bot identity.
#[async_trait]
pub trait WebhookRegistrar: Send + Sync + 'static {
    /// Register the bot's webhook endpoint so the platform delivers updates.
    async fn register_webhook(&self, token: &str, bot_id: &str) -> Result<(), BotforgeError>;

    /// Remove the bot's webhook registration; update delivery stops.
    async fn unregister_webhook(&self, token: &str, bot_id: &str) -> Result<(), BotforgeError>;
}
