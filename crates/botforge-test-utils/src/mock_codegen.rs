// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock code generator returning a canned file set.

use std::sync::Mutex;

use async_trait::async_trait;
use botforge_core::types::{ConversationTurn, GeneratedBot, GeneratedFile, ServiceCall};
use botforge_core::{BotforgeError, CodeGenerator};

use crate::CallLog;

/// A mock [`CodeGenerator`] for deterministic testing.
///
/// Records each prompt and the history length it was called with.
pub struct MockCodeGenerator {
    log: CallLog,
    failure: Mutex<Option<String>>,
}

impl MockCodeGenerator {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failure: Mutex::new(None),
        }
    }

    pub fn fail(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// The file set every successful call returns.
    pub fn canned_bot(bot_token: &str) -> GeneratedBot {
        GeneratedBot {
            files: vec![
                GeneratedFile {
                    name: "main.py".to_string(),
                    content: "import os\nBOT_TOKEN = os.getenv('BOT_TOKEN')\n".to_string(),
                },
                GeneratedFile {
                    name: "requirements.txt".to_string(),
                    content: "python-telegram-bot>=20.0\n".to_string(),
                },
                GeneratedFile {
                    name: ".env".to_string(),
                    content: format!("BOT_TOKEN={bot_token}"),
                },
            ],
            explanation: "A canned test bot".to_string(),
        }
    }
}

impl Default for MockCodeGenerator {
    fn default() -> Self {
        Self::new(CallLog::new())
    }
}

#[async_trait]
impl CodeGenerator for MockCodeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        bot_token: &str,
        history: &[ConversationTurn],
    ) -> Result<GeneratedBot, BotforgeError> {
        self.log
            .record(format!("generate {prompt} (history={})", history.len()));
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Generate, message));
        }
        Ok(Self::canned_bot(bot_token))
    }
}
