// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deployment manager contract.

use async_trait::async_trait;

use crate::error::BotforgeError;
use crate::types::{DeployOutput, RuntimeSnapshot, ShutdownOutput};

/// Creates, observes, scales, and tears down running bot deployments.
#[async_trait]
pub trait DeployManager: Send + Sync + 'static {
    /// Create or update the bot's deployment from the given image tag.
    async fn deploy(
        &self,
        bot_id: &str,
        user_id: &str,
        image_tag: &str,
    ) -> Result<DeployOutput, BotforgeError>;

    /// Query the current deployment status.
    async fn status(&self, bot_id: &str, user_id: &str) -> Result<RuntimeSnapshot, BotforgeError>;

    /// Scale the deployment to zero replicas.
    async fn scale_to_zero(&self, bot_id: &str, user_id: &str) -> Result<(), BotforgeError>;

    /// Tear the deployment down completely.
    async fn shutdown(&self, bot_id: &str, user_id: &str)
        -> Result<ShutdownOutput, BotforgeError>;
}
