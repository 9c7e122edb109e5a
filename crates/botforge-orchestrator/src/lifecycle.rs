// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deploy lifecycle: monitor, scale-down-on-idle, cleanup, delete.

use botforge_core::types::ServiceCall;
use botforge_core::{BotforgeError, RuntimeStatus};
use tracing::{info, warn};

use crate::orchestrator::{secs_since, Orchestrator};
use crate::outcome::{BotMetrics, CleanupReport, MonitorOutcome, ScaleDownOutcome};

const MONITOR_LOG_LIMIT: u32 = 20;

impl Orchestrator {
    /// Observe the bot's deployment and derive a metrics snapshot.
    ///
    /// Read-only: never mutates the bot record. The caller (a scheduler)
    /// acts on the returned inactivity verdict.
    pub async fn monitor(
        &self,
        bot_id: &str,
        user_id: &str,
    ) -> Result<MonitorOutcome, BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        let bot = self.store.require_bot(bot_id).await?;

        let snapshot = self
            .with_deadline(ServiceCall::Status, self.deployer.status(bot_id, user_id))
            .await?;
        let turns = self.store.list_turns(bot_id).await?;
        let recent = self
            .store
            .recent_log_lines(bot_id, MONITOR_LOG_LIMIT)
            .await?;

        let uptime_secs = secs_since(bot.last_restart.as_deref()).unwrap_or(0);
        let inactive_secs = self.inactivity_secs(&bot);

        Ok(MonitorOutcome {
            metrics: BotMetrics {
                runtime_status: snapshot.runtime_status,
                deployment_type: snapshot.deployment_type,
                message_count: turns.len() as u64,
                uptime_secs,
                inactive_secs,
            },
            is_inactive: inactive_secs >= self.config.idle_threshold_secs,
            logs: recent.into_iter().map(|l| l.line).collect(),
        })
    }

    /// Scale the deployment to zero if the bot has been inactive past the
    /// idle threshold.
    ///
    /// Idempotent: a bot already marked `idle` triggers no scale call and no
    /// state change.
    pub async fn scale_down_if_idle(
        &self,
        bot_id: &str,
        user_id: &str,
    ) -> Result<ScaleDownOutcome, BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        let _guard = self.locks.acquire(bot_id).await;
        let bot = self.store.require_bot(bot_id).await?;

        if bot.runtime_status == RuntimeStatus::Idle {
            return Ok(ScaleDownOutcome {
                is_inactive: true,
                scaled_down: false,
                logs: vec!["already idle; nothing to do".to_string()],
            });
        }

        let inactive_secs = self.inactivity_secs(&bot);
        if inactive_secs < self.config.idle_threshold_secs {
            return Ok(ScaleDownOutcome {
                is_inactive: false,
                scaled_down: false,
                logs: vec![format!("active {inactive_secs}s ago; leaving as is")],
            });
        }

        self.with_deadline(
            ServiceCall::Scale,
            self.deployer.scale_to_zero(bot_id, user_id),
        )
        .await?;
        self.store
            .update_runtime_status(bot_id, RuntimeStatus::Idle)
            .await?;
        let line = format!("scaled to zero after {inactive_secs}s of inactivity");
        self.store
            .append_log_lines(bot_id, std::slice::from_ref(&line))
            .await?;
        info!(bot_id, inactive_secs, "bot scaled down");

        Ok(ScaleDownOutcome {
            is_inactive: true,
            scaled_down: true,
            logs: vec![line],
        })
    }

    /// Unregister the webhook, tear down the deployment, and remove registry
    /// images.
    ///
    /// Every step is attempted even if an earlier one fails; the aggregate
    /// logs keep whatever partial work happened. The overall result is a
    /// failure if any step failed. Does not delete the bot record.
    pub async fn cleanup(
        &self,
        bot_id: &str,
        user_id: &str,
    ) -> Result<CleanupReport, BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        let _guard = self.locks.acquire(bot_id).await;
        let bot = self.store.require_bot(bot_id).await?;

        let mut logs = Vec::new();
        let mut failure = None;

        match self
            .with_deadline(
                ServiceCall::UnregisterWebhook,
                self.registrar.unregister_webhook(&bot.token, bot_id),
            )
            .await
        {
            Ok(()) => logs.push("webhook unregistered".to_string()),
            Err(e) => {
                logs.push(e.to_string());
                failure = Some(e);
            }
        }

        match self
            .with_deadline(ServiceCall::Shutdown, self.deployer.shutdown(bot_id, user_id))
            .await
        {
            Ok(out) => logs.extend(out.logs),
            Err(e) => {
                logs.push(e.to_string());
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }

        match self
            .with_deadline(
                ServiceCall::CleanupImages,
                self.builder.cleanup_images(bot_id),
            )
            .await
        {
            Ok(out) => logs.extend(out.logs),
            Err(e) => {
                logs.push(e.to_string());
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }

        self.store.append_log_lines(bot_id, &logs).await?;
        match failure {
            Some(e) => Err(e),
            None => {
                self.store
                    .update_runtime_status(bot_id, RuntimeStatus::Stopped)
                    .await?;
                info!(bot_id, "cleanup complete");
                Ok(CleanupReport { logs })
            }
        }
    }

    /// The orchestrated delete flow: best-effort cleanup, then remove the
    /// record (files, turns, and logs cascade with it).
    pub async fn delete_bot(&self, bot_id: &str, user_id: &str) -> Result<(), BotforgeError> {
        Self::validate_target(bot_id, user_id)?;
        self.store.require_bot(bot_id).await?;

        if let Err(e) = self.cleanup(bot_id, user_id).await {
            warn!(bot_id, error = %e, "cleanup failed during delete; proceeding");
        }

        let _guard = self.locks.acquire(bot_id).await;
        self.store.delete_bot(bot_id).await?;
        info!(bot_id, "bot deleted");
        Ok(())
    }

    /// Seconds since the bot last saw webhook traffic, falling back to the
    /// last deploy when it has never been messaged.
    fn inactivity_secs(&self, bot: &botforge_core::types::BotRecord) -> u64 {
        secs_since(bot.last_activity.as_deref())
            .or_else(|| secs_since(bot.last_restart.as_deref()))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_bot, rig};
    use botforge_core::types::{now_rfc3339, RuntimeSnapshot};

    #[tokio::test]
    async fn monitor_never_mutates_the_record() {
        let rig = rig().await;
        rig.store.create_bot(&make_bot("b1")).await.unwrap();
        let before = rig.store.get_bot("b1").await.unwrap().unwrap();

        let outcome = rig.orch.monitor("b1", "u1").await.unwrap();
        assert_eq!(outcome.metrics.deployment_type, "kubernetes");

        let after = rig.store.get_bot("b1").await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn monitor_reports_inactivity_past_threshold() {
        let rig = rig().await;
        let mut bot = make_bot("b1");
        // Last activity far in the past, well over the 1800 s threshold.
        bot.last_activity = Some("2026-01-01T00:00:00.000Z".to_string());
        rig.store.create_bot(&bot).await.unwrap();

        let outcome = rig.orch.monitor("b1", "u1").await.unwrap();
        assert!(outcome.is_inactive);
        assert!(outcome.metrics.inactive_secs >= 1800);
    }

    #[tokio::test]
    async fn fresh_activity_is_not_inactive() {
        let rig = rig().await;
        let mut bot = make_bot("b1");
        bot.last_activity = Some(now_rfc3339());
        rig.store.create_bot(&bot).await.unwrap();

        let outcome = rig.orch.monitor("b1", "u1").await.unwrap();
        assert!(!outcome.is_inactive);
    }

    #[tokio::test]
    async fn scale_down_skips_active_bot() {
        let rig = rig().await;
        let mut bot = make_bot("b1");
        bot.runtime_status = botforge_core::RuntimeStatus::Running;
        bot.last_activity = Some(now_rfc3339());
        rig.store.create_bot(&bot).await.unwrap();

        let outcome = rig.orch.scale_down_if_idle("b1", "u1").await.unwrap();
        assert!(!outcome.is_inactive);
        assert!(!outcome.scaled_down);
        assert_eq!(rig.log.count_of("scale"), 0);
    }

    #[tokio::test]
    async fn scale_down_is_idempotent_once_idle() {
        let rig = rig().await;
        let mut bot = make_bot("b1");
        bot.runtime_status = botforge_core::RuntimeStatus::Running;
        bot.last_activity = Some("2026-01-01T00:00:00.000Z".to_string());
        rig.store.create_bot(&bot).await.unwrap();

        let first = rig.orch.scale_down_if_idle("b1", "u1").await.unwrap();
        assert!(first.scaled_down);
        assert_eq!(rig.log.count_of("scale"), 1);
        let stored = rig.store.get_bot("b1").await.unwrap().unwrap();
        assert_eq!(stored.runtime_status, botforge_core::RuntimeStatus::Idle);

        // Second call must make zero additional scale calls.
        let second = rig.orch.scale_down_if_idle("b1", "u1").await.unwrap();
        assert!(second.is_inactive);
        assert!(!second.scaled_down);
        assert_eq!(rig.log.count_of("scale"), 1);
    }

    #[tokio::test]
    async fn cleanup_aggregates_partial_work_on_failure() {
        let rig = rig().await;
        rig.store.create_bot(&make_bot("b1")).await.unwrap();
        rig.deployer.fail_shutdown("Shutdown failed: pod stuck");

        let err = rig.orch.cleanup("b1", "u1").await.unwrap_err();
        assert!(err.to_string().contains("Shutdown failed"));

        // Every step was attempted.
        assert_eq!(rig.log.count_of("unregister-webhook"), 1);
        assert_eq!(rig.log.count_of("shutdown"), 1);
        assert_eq!(rig.log.count_of("cleanup-images"), 1);

        // The image-cleanup lines survive in the persisted aggregate.
        let persisted = rig.store.recent_log_lines("b1", 50).await.unwrap();
        let lines: Vec<&str> = persisted.iter().map(|l| l.line.as_str()).collect();
        assert!(lines.contains(&"images removed"));
        assert!(lines.iter().any(|l| l.contains("Shutdown failed")));
    }

    #[tokio::test]
    async fn successful_cleanup_stops_the_bot() {
        let rig = rig().await;
        let mut bot = make_bot("b1");
        bot.runtime_status = botforge_core::RuntimeStatus::Running;
        rig.store.create_bot(&bot).await.unwrap();

        let report = rig.orch.cleanup("b1", "u1").await.unwrap();
        assert!(report.logs.contains(&"webhook unregistered".to_string()));
        assert!(report.logs.contains(&"deployment removed".to_string()));
        assert!(report.logs.contains(&"images removed".to_string()));

        let stored = rig.store.get_bot("b1").await.unwrap().unwrap();
        assert_eq!(stored.runtime_status, botforge_core::RuntimeStatus::Stopped);
    }

    #[tokio::test]
    async fn unregister_failure_does_not_stop_the_teardown() {
        let rig = rig().await;
        rig.store.create_bot(&make_bot("b1")).await.unwrap();
        rig.registrar
            .fail_unregister("deleteWebhook rejected: unauthorized");

        let err = rig.orch.cleanup("b1", "u1").await.unwrap_err();
        assert!(err.to_string().contains("deleteWebhook rejected"));
        assert_eq!(rig.log.count_of("shutdown"), 1);
        assert_eq!(rig.log.count_of("cleanup-images"), 1);
    }

    #[tokio::test]
    async fn delete_proceeds_despite_cleanup_failure() {
        let rig = rig().await;
        rig.store.create_bot(&make_bot("b1")).await.unwrap();
        rig.deployer.fail_shutdown("Shutdown failed: node gone");

        rig.orch.delete_bot("b1", "u1").await.unwrap();
        assert!(rig.store.get_bot("b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_on_unknown_bot_is_not_found() {
        let rig = rig().await;
        let err = rig.orch.delete_bot("ghost", "u1").await.unwrap_err();
        assert!(matches!(err, BotforgeError::NotFound { .. }));
    }
}
