// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock deploy manager with scriptable status and failures.

use std::sync::Mutex;

use async_trait::async_trait;
use botforge_core::types::{DeployOutput, RuntimeSnapshot, ServiceCall, ShutdownOutput};
use botforge_core::{BotforgeError, DeployManager, RuntimeStatus};

use crate::CallLog;

/// A mock [`DeployManager`] for deterministic testing.
pub struct MockDeployManager {
    log: CallLog,
    status: Mutex<RuntimeSnapshot>,
    deploy_failure: Mutex<Option<String>>,
    scale_failure: Mutex<Option<String>>,
    shutdown_failure: Mutex<Option<String>>,
}

impl MockDeployManager {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            status: Mutex::new(RuntimeSnapshot {
                runtime_status: RuntimeStatus::Running,
                deployment_type: "kubernetes".to_string(),
            }),
            deploy_failure: Mutex::new(None),
            scale_failure: Mutex::new(None),
            shutdown_failure: Mutex::new(None),
        }
    }

    pub fn set_status(&self, snapshot: RuntimeSnapshot) {
        *self.status.lock().unwrap() = snapshot;
    }

    pub fn fail_deploy(&self, message: impl Into<String>) {
        *self.deploy_failure.lock().unwrap() = Some(message.into());
    }

    pub fn fail_scale(&self, message: impl Into<String>) {
        *self.scale_failure.lock().unwrap() = Some(message.into());
    }

    pub fn fail_shutdown(&self, message: impl Into<String>) {
        *self.shutdown_failure.lock().unwrap() = Some(message.into());
    }
}

impl Default for MockDeployManager {
    fn default() -> Self {
        Self::new(CallLog::new())
    }
}

#[async_trait]
impl DeployManager for MockDeployManager {
    async fn deploy(
        &self,
        bot_id: &str,
        user_id: &str,
        image_tag: &str,
    ) -> Result<DeployOutput, BotforgeError> {
        self.log.record(format!("deploy {bot_id} {user_id} {image_tag}"));
        if let Some(message) = self.deploy_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Deploy, message));
        }
        Ok(DeployOutput {
            logs: vec!["deployed".to_string()],
            namespace: "ns".to_string(),
            deployment_name: "dep".to_string(),
        })
    }

    async fn status(&self, bot_id: &str, user_id: &str) -> Result<RuntimeSnapshot, BotforgeError> {
        self.log.record(format!("status {bot_id} {user_id}"));
        Ok(self.status.lock().unwrap().clone())
    }

    async fn scale_to_zero(&self, bot_id: &str, user_id: &str) -> Result<(), BotforgeError> {
        self.log.record(format!("scale {bot_id} {user_id}"));
        if let Some(message) = self.scale_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Scale, message));
        }
        Ok(())
    }

    async fn shutdown(
        &self,
        bot_id: &str,
        user_id: &str,
    ) -> Result<ShutdownOutput, BotforgeError> {
        self.log.record(format!("shutdown {bot_id} {user_id}"));
        if let Some(message) = self.shutdown_failure.lock().unwrap().clone() {
            return Err(BotforgeError::upstream(ServiceCall::Shutdown, message));
        }
        Ok(ShutdownOutput {
            logs: vec!["deployment removed".to_string()],
        })
    }
}
