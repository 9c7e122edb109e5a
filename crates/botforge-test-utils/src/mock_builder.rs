// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock build service with scriptable per-operation failures.

use std::sync::Mutex;

use async_trait::async_trait;
use botforge_core::types::{BuildOutput, CleanupOutput, PushOutput, ServiceCall};
use botforge_core::{BotforgeError, BuildService};

use crate::CallLog;

/// A mock [`BuildService`] for deterministic testing.
///
/// By default every operation succeeds with canned logs; individual
/// operations can be scripted to fail with a given message.
pub struct MockBuildService {
    log: CallLog,
    build_output: Mutex<BuildOutput>,
    build_failure: Mutex<Option<String>>,
    push_failure: Mutex<Option<String>>,
    cleanup_failure: Mutex<Option<String>>,
}

impl MockBuildService {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            build_output: Mutex::new(BuildOutput {
                image_tag: "img:1".to_string(),
                logs: vec!["built".to_string()],
            }),
            build_failure: Mutex::new(None),
            push_failure: Mutex::new(None),
            cleanup_failure: Mutex::new(None),
        }
    }

    pub fn set_build_output(&self, output: BuildOutput) {
        *self.build_output.lock().unwrap() = output;
    }

    pub fn fail_build(&self, message: impl Into<String>) {
        *self.build_failure.lock().unwrap() = Some(message.into());
    }

    pub fn fail_push(&self, message: impl Into<String>) {
        *self.push_failure.lock().unwrap() = Some(message.into());
    }

    pub fn fail_cleanup(&self, message: impl Into<String>) {
        *self.cleanup_failure.lock().unwrap() = Some(message.into());
    }
}

impl Default for MockBuildService {
    fn default() -> Self {
        Self::new(CallLog::new())
    }
}

#[async_trait]
impl BuildService for MockBuildService {
    async fn build(&self, bot_id: &str, user_id: &str) -> Result<BuildOutput, BotforgeError> {
        self.log.record(format!("build {bot_id} {user_id}"));
        if let Some(message) = self.build_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Build, message));
        }
        Ok(self.build_output.lock().unwrap().clone())
    }

    async fn push(&self, bot_id: &str) -> Result<PushOutput, BotforgeError> {
        self.log.record(format!("push {bot_id}"));
        if let Some(message) = self.push_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Push, message));
        }
        Ok(PushOutput {
            logs: vec!["pushed".to_string()],
        })
    }

    async fn cleanup_images(&self, bot_id: &str) -> Result<CleanupOutput, BotforgeError> {
        self.log.record(format!("cleanup-images {bot_id}"));
        if let Some(message) = self.cleanup_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::CleanupImages, message));
        }
        Ok(CleanupOutput {
            logs: vec!["images removed".to_string()],
        })
    }
}
