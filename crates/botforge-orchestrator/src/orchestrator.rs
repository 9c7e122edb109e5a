// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The orchestrator: owns the remote service handles, the bot record store,
//! and the per-bot advisory locks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use botforge_config::model::OrchestratorConfig;
use botforge_core::types::ServiceCall;
use botforge_core::{BotforgeError, BuildService, CodeGenerator, DeployManager, WebhookRegistrar};
use botforge_storage::BotStore;

use crate::locks::BotLocks;

/// Drives a bot from "no deployment" to "running", keeps it observed,
/// demotes it when idle, and tears it down on request.
///
/// All collaborators are injected; there is no global client state. Clones
/// share the same locks and store.
#[derive(Clone)]
pub struct Orchestrator {
    pub(crate) builder: Arc<dyn BuildService>,
    pub(crate) deployer: Arc<dyn DeployManager>,
    pub(crate) codegen: Arc<dyn CodeGenerator>,
    pub(crate) registrar: Arc<dyn WebhookRegistrar>,
    pub(crate) store: BotStore,
    pub(crate) config: OrchestratorConfig,
    pub(crate) locks: Arc<BotLocks>,
}

impl Orchestrator {
    pub fn new(
        builder: Arc<dyn BuildService>,
        deployer: Arc<dyn DeployManager>,
        codegen: Arc<dyn CodeGenerator>,
        registrar: Arc<dyn WebhookRegistrar>,
        store: BotStore,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            builder,
            deployer,
            codegen,
            registrar,
            store,
            config,
            locks: Arc::new(BotLocks::new()),
        }
    }

    pub fn store(&self) -> &BotStore {
        &self.store
    }

    /// Run one remote call under the per-phase deadline.
    pub(crate) async fn with_deadline<T, F>(
        &self,
        call: ServiceCall,
        fut: F,
    ) -> Result<T, BotforgeError>
    where
        F: Future<Output = Result<T, BotforgeError>>,
    {
        let duration = Duration::from_secs(self.config.phase_timeout_secs);
        match tokio::time::timeout(duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(BotforgeError::Timeout { call, duration }),
        }
    }

    /// Reject blank identifiers before any remote call.
    pub(crate) fn validate_target(bot_id: &str, user_id: &str) -> Result<(), BotforgeError> {
        if bot_id.trim().is_empty() {
            return Err(BotforgeError::Validation("bot_id must not be empty".into()));
        }
        if user_id.trim().is_empty() {
            return Err(BotforgeError::Validation("user_id must not be empty".into()));
        }
        Ok(())
    }
}

/// Seconds elapsed since an RFC 3339 timestamp, saturating at zero.
///
/// Returns `None` for absent or unparseable input.
pub(crate) fn secs_since(timestamp: Option<&str>) -> Option<u64> {
    let ts = timestamp?;
    let parsed = chrono::DateTime::parse_from_rfc3339(ts).ok()?;
    let elapsed = chrono::Utc::now().signed_duration_since(parsed);
    Some(elapsed.num_seconds().max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identifiers_are_validation_errors() {
        assert!(matches!(
            Orchestrator::validate_target("", "u1"),
            Err(BotforgeError::Validation(_))
        ));
        assert!(matches!(
            Orchestrator::validate_target("b1", "  "),
            Err(BotforgeError::Validation(_))
        ));
        assert!(Orchestrator::validate_target("b1", "u1").is_ok());
    }

    #[test]
    fn secs_since_handles_missing_and_garbage() {
        assert_eq!(secs_since(None), None);
        assert_eq!(secs_since(Some("not a timestamp")), None);
        let recent = botforge_core::types::now_rfc3339();
        assert!(secs_since(Some(&recent)).unwrap() < 5);
        assert!(secs_since(Some("2020-01-01T00:00:00.000Z")).unwrap() > 100_000);
    }
}
