// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Container build service contract.

use async_trait::async_trait;

use crate::error::BotforgeError;
use crate::types::{BuildOutput, CleanupOutput, PushOutput};

/// Builds container images from a bot's stored file set and manages them
/// in the registry.
///
/// All calls are synchronous request/response. A non-success response and a
/// transport error are treated identically by callers: the current pipeline
/// phase aborts.
#[async_trait]
pub trait BuildService: Send + Sync + 'static {
    /// Build a container image from the bot's uploaded files.
    async fn build(&self, bot_id: &str, user_id: &str) -> Result<BuildOutput, BotforgeError>;

    /// Push the most recently built image to the registry.
    async fn push(&self, bot_id: &str) -> Result<PushOutput, BotforgeError>;

    /// Remove the bot's images from the registry.
    async fn cleanup_images(&self, bot_id: &str) -> Result<CleanupOutput, BotforgeError>;
}
