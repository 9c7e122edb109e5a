// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code generation service contract.

use async_trait::async_trait;

use crate::error::BotforgeError;
use crate::types::{ConversationTurn, GeneratedBot};

/// Produces a named set of bot source files from a natural-language prompt.
///
/// Prior conversation turns are replayed oldest-first as generation context.
#[async_trait]
pub trait CodeGenerator: Send + Sync + 'static {
    async fn generate(
        &self,
        prompt: &str,
        bot_token: &str,
        history: &[ConversationTurn],
    ) -> Result<GeneratedBot, BotforgeError>;
}
