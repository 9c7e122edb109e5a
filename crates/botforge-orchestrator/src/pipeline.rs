// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The three-phase deploy pipeline: build, push, deploy.
//!
//! Phases run strictly in order and fail fast -- a phase failure aborts the
//! pipeline with no automatic retry (retry is a caller decision). Each phase
//! is bounded by the configured per-phase deadline. After a successful
//! rollout the bot's Telegram webhook is registered so updates start
//! flowing. The final status write is guarded by the pipeline generation
//! acquired at the start of the run, so a superseded run cannot clobber a
//! newer one.

use botforge_core::types::{now_rfc3339, ServiceCall};
use botforge_core::{BotforgeError, RuntimeStatus};
use tracing::{error, info, warn};

use crate::orchestrator::Orchestrator;
use crate::outcome::{DeployOutcome, DeploymentInfo};

const DEPLOYMENT_TYPE: &str = "kubernetes";

impl Orchestrator {
    /// Build, push, and deploy the bot's stored file set.
    ///
    /// On success the bot record ends with `runtime_status = running`, the
    /// new image tag, the deployment name, and a refreshed `last_restart`.
    /// On failure it ends with `runtime_status = error` and the logs
    /// accumulated up to and including the failure line.
    pub async fn deploy(&self, bot_id: &str, user_id: &str) -> Result<DeployOutcome, BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        let _guard = self.locks.acquire(bot_id).await;
        let bot = self.store.require_bot(bot_id).await?;

        let generation = self.store.bump_pipeline_generation(bot_id).await?;
        self.store
            .update_runtime_status(bot_id, RuntimeStatus::Starting)
            .await?;
        info!(bot_id, user_id, generation, "deploy pipeline started");

        let mut logs = Vec::new();

        logs.push("[PIPELINE] Phase 1: Building container image".to_string());
        let build = match self
            .with_deadline(ServiceCall::Build, self.builder.build(bot_id, user_id))
            .await
        {
            Ok(out) => {
                logs.extend(out.logs.iter().cloned());
                out
            }
            Err(e) => return self.abort_pipeline(bot_id, generation, logs, e).await,
        };

        logs.push("[PIPELINE] Phase 2: Pushing image to registry".to_string());
        match self
            .with_deadline(ServiceCall::Push, self.builder.push(bot_id))
            .await
        {
            Ok(out) => logs.extend(out.logs),
            Err(e) => return self.abort_pipeline(bot_id, generation, logs, e).await,
        }

        logs.push("[PIPELINE] Phase 3: Deploying to Kubernetes".to_string());
        let deploy = match self
            .with_deadline(
                ServiceCall::Deploy,
                self.deployer.deploy(bot_id, user_id, &build.image_tag),
            )
            .await
        {
            Ok(out) => {
                logs.extend(out.logs.iter().cloned());
                out
            }
            Err(e) => return self.abort_pipeline(bot_id, generation, logs, e).await,
        };

        logs.push("[PIPELINE] Registering Telegram webhook".to_string());
        if let Err(e) = self
            .with_deadline(
                ServiceCall::RegisterWebhook,
                self.registrar.register_webhook(&bot.token, bot_id),
            )
            .await
        {
            return self.abort_pipeline(bot_id, generation, logs, e).await;
        }

        logs.push("[PIPELINE] Deployment completed successfully".to_string());
        self.store.append_log_lines(bot_id, &logs).await?;
        let committed = self
            .store
            .finish_pipeline_if_current(
                bot_id,
                generation,
                RuntimeStatus::Running,
                Some(build.image_tag.clone()),
                Some(deploy.deployment_name.clone()),
                Some(now_rfc3339()),
            )
            .await?;
        if !committed {
            warn!(bot_id, generation, "pipeline superseded; final status not committed");
        }
        info!(bot_id, image_tag = %build.image_tag, "deploy pipeline finished");

        Ok(DeployOutcome {
            deployment: DeploymentInfo {
                deployment_type: DEPLOYMENT_TYPE.to_string(),
                image_tag: build.image_tag,
                namespace: deploy.namespace,
                deployment_name: deploy.deployment_name,
            },
            logs,
        })
    }

    async fn abort_pipeline<T>(
        &self,
        bot_id: &str,
        generation: i64,
        mut logs: Vec<String>,
        err: BotforgeError,
    ) -> Result<T, BotforgeError> {
        logs.push(format!("[PIPELINE] Failed: {err}"));
        error!(bot_id, error = %err, "deploy pipeline aborted");
        self.store.append_log_lines(bot_id, &logs).await?;
        self.store
            .finish_pipeline_if_current(bot_id, generation, RuntimeStatus::Error, None, None, None)
            .await?;
        Err(err)
    }
}
