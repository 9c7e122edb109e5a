// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation flow: prompt in, persisted file set out.
//!
//! The bot record is created lazily on the first generation request. Each
//! cycle appends exactly one user turn and one assistant turn to the
//! conversation history.

use botforge_core::types::{now_rfc3339, BotRecord};
use botforge_core::{BotStatus, BotforgeError, RuntimeStatus, TurnRole};
use tracing::{error, info};

use crate::orchestrator::Orchestrator;
use crate::outcome::GenerateOutcome;

impl Orchestrator {
    /// Generate (or regenerate) a bot's source files from a prompt.
    ///
    /// On generator failure the record is marked `status = error` and the
    /// error propagates; prior files and history are left untouched.
    pub async fn generate_bot(
        &self,
        bot_id: &str,
        user_id: &str,
        prompt: &str,
        token: &str,
    ) -> Result<GenerateOutcome, BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        if prompt.trim().is_empty() {
            return Err(BotforgeError::Validation("prompt must not be empty".into()));
        }
        if token.trim().is_empty() {
            return Err(BotforgeError::Validation("token must not be empty".into()));
        }

        let _guard = self.locks.acquire(bot_id).await;

        if self.store.get_bot(bot_id).await?.is_none() {
            let now = now_rfc3339();
            self.store
                .create_bot(&BotRecord {
                    id: bot_id.to_string(),
                    user_id: user_id.to_string(),
                    name: format!("bot-{bot_id}"),
                    token: token.to_string(),
                    status: BotStatus::Creating,
                    runtime_status: RuntimeStatus::Stopped,
                    container_id: None,
                    image_tag: None,
                    files_stored: false,
                    pipeline_generation: 0,
                    last_restart: None,
                    last_activity: None,
                    created_at: now.clone(),
                    updated_at: now,
                })
                .await?;
            info!(bot_id, user_id, "bot record created");
        }

        let history = self.store.list_turns(bot_id).await?;
        let generated = match self.codegen.generate(prompt, token, &history).await {
            Ok(generated) => generated,
            Err(e) => {
                error!(bot_id, error = %e, "code generation failed");
                self.store.update_status(bot_id, BotStatus::Error).await?;
                return Err(e);
            }
        };

        self.store
            .upsert_files(bot_id, user_id, &generated.files)
            .await?;
        self.store.set_files_stored(bot_id, true).await?;
        self.store
            .append_turn(bot_id, TurnRole::User, prompt)
            .await?;
        self.store
            .append_turn(bot_id, TurnRole::Assistant, &generated.explanation)
            .await?;
        self.store.update_status(bot_id, BotStatus::Active).await?;
        info!(bot_id, files = generated.files.len(), "bot code generated");

        let files_uploaded = generated.files.len();
        Ok(GenerateOutcome {
            files: generated.files,
            explanation: generated.explanation,
            files_uploaded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::rig;

    #[tokio::test]
    async fn first_generation_creates_the_record() {
        let rig = rig().await;

        let outcome = rig
            .orch
            .generate_bot("b1", "u1", "make an echo bot", "123:tok")
            .await
            .unwrap();
        assert_eq!(outcome.files_uploaded, 3);
        assert_eq!(outcome.explanation, "A canned test bot");

        let bot = rig.store.get_bot("b1").await.unwrap().unwrap();
        assert_eq!(bot.status, BotStatus::Active);
        assert_eq!(bot.runtime_status, RuntimeStatus::Stopped);
        assert!(bot.files_stored);

        let main = rig.store.get_file("b1", "main.py").await.unwrap();
        assert!(main.unwrap().contains("BOT_TOKEN"));
    }

    #[tokio::test]
    async fn each_cycle_appends_one_user_and_one_assistant_turn() {
        let rig = rig().await;
        rig.orch
            .generate_bot("b1", "u1", "make an echo bot", "123:tok")
            .await
            .unwrap();
        rig.orch
            .generate_bot("b1", "u1", "add a /start command", "123:tok")
            .await
            .unwrap();

        let turns = rig.store.list_turns("b1").await.unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "make an echo bot");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[2].content, "add a /start command");

        // The second call replayed the first cycle's history.
        let entries = rig.log.entries();
        assert!(entries[0].ends_with("(history=0)"));
        assert!(entries[1].ends_with("(history=2)"));
    }

    #[tokio::test]
    async fn generator_failure_marks_the_record() {
        let rig = rig().await;
        rig.orch
            .generate_bot("b1", "u1", "make an echo bot", "123:tok")
            .await
            .unwrap();
        rig.codegen.fail("model overloaded");

        let err = rig
            .orch
            .generate_bot("b1", "u1", "break it", "123:tok")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model overloaded"));

        let bot = rig.store.get_bot("b1").await.unwrap().unwrap();
        assert_eq!(bot.status, BotStatus::Error);
        // Previous files survive a failed regeneration.
        assert!(rig.store.get_file("b1", "main.py").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_call() {
        let rig = rig().await;
        let err = rig
            .orch
            .generate_bot("b1", "u1", "   ", "123:tok")
            .await
            .unwrap_err();
        assert!(matches!(err, BotforgeError::Validation(_)));
        assert!(rig.log.entries().is_empty());
        assert!(rig.store.get_bot("b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let rig = rig().await;
        let err = rig
            .orch
            .generate_bot("b1", "u1", "make a bot", "")
            .await
            .unwrap_err();
        assert!(matches!(err, BotforgeError::Validation(_)));
    }
}
