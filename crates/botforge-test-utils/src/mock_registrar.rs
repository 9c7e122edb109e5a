// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock webhook registrar with scriptable failures.

use std::sync::Mutex;

use async_trait::async_trait;
use botforge_core::types::ServiceCall;
use botforge_core::{BotforgeError, WebhookRegistrar};

use crate::CallLog;

/// A mock [`WebhookRegistrar`] for deterministic testing.
pub struct MockWebhookRegistrar {
    log: CallLog,
    register_failure: Mutex<Option<String>>,
    unregister_failure: Mutex<Option<String>>,
}

impl MockWebhookRegistrar {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            register_failure: Mutex::new(None),
            unregister_failure: Mutex::new(None),
        }
    }

    pub fn fail_register(&self, message: impl Into<String>) {
        *self.register_failure.lock().unwrap() = Some(message.into());
    }

    pub fn fail_unregister(&self, message: impl Into<String>) {
        *self.unregister_failure.lock().unwrap() = Some(message.into());
    }
}

impl Default for MockWebhookRegistrar {
    fn default() -> Self {
        Self::new(CallLog::new())
    }
}

#[async_trait]
impl WebhookRegistrar for MockWebhookRegistrar {
    async fn register_webhook(&self, _token: &str, bot_id: &str) -> Result<(), BotforgeError> {
        self.log.record(format!("register-webhook {bot_id}"));
        if let Some(message) = self.register_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(
                ServiceCall::RegisterWebhook,
                message,
            ));
        }
        Ok(())
    }

    async fn unregister_webhook(&self, _token: &str, bot_id: &str) -> Result<(), BotforgeError> {
        self.log.record(format!("unregister-webhook {bot_id}"));
        if let Some(message) = self.unregister_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(
                ServiceCall::UnregisterWebhook,
                message,
            ));
        }
        Ok(())
    }
}
