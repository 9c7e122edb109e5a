// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level bot record store facade.
//!
//! [`BotStore`] owns the database handle and the runtime log cap, and is the
//! only storage surface the orchestrator and gateway see. It is cheap to
//! clone and safe to share across tasks.

use std::sync::Arc;

use botforge_config::model::StorageConfig;
use botforge_core::types::{BotRecord, ConversationTurn, GeneratedFile, LogLine};
use botforge_core::{BotStatus, BotforgeError, RuntimeStatus, TurnRole};
use tracing::info;

use crate::database::Database;
use crate::queries;

/// Shared handle to the bot record store.
#[derive(Clone)]
pub struct BotStore {
    db: Arc<Database>,
    runtime_log_cap: u32,
}

impl BotStore {
    /// Open the store described by `config`, running migrations as needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, BotforgeError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        info!(path = %config.database_path, "bot record store ready");
        Ok(Self {
            db: Arc::new(db),
            runtime_log_cap: config.runtime_log_cap,
        })
    }

    /// Build a store around an already-open database. Test constructor.
    pub fn with_database(db: Database, runtime_log_cap: u32) -> Self {
        Self {
            db: Arc::new(db),
            runtime_log_cap,
        }
    }

    /// Checkpoint and flush before shutdown.
    pub async fn close(&self) -> Result<(), BotforgeError> {
        self.db.close().await
    }

    // --- bots ---

    pub async fn create_bot(&self, bot: &BotRecord) -> Result<(), BotforgeError> {
        queries::bots::create_bot(&self.db, bot).await
    }

    pub async fn get_bot(&self, id: &str) -> Result<Option<BotRecord>, BotforgeError> {
        queries::bots::get_bot(&self.db, id).await
    }

    /// Like [`get_bot`](Self::get_bot), but a missing record is an error.
    pub async fn require_bot(&self, id: &str) -> Result<BotRecord, BotforgeError> {
        self.get_bot(id).await?.ok_or_else(|| BotforgeError::NotFound {
            resource: "bot".to_string(),
            id: id.to_string(),
        })
    }

    pub async fn list_bots_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<BotRecord>, BotforgeError> {
        queries::bots::list_bots_for_user(&self.db, user_id).await
    }

    pub async fn update_status(&self, id: &str, status: BotStatus) -> Result<(), BotforgeError> {
        queries::bots::update_status(&self.db, id, status).await
    }

    pub async fn update_runtime_status(
        &self,
        id: &str,
        runtime_status: RuntimeStatus,
    ) -> Result<(), BotforgeError> {
        queries::bots::update_runtime_status(&self.db, id, runtime_status).await
    }

    pub async fn set_files_stored(&self, id: &str, stored: bool) -> Result<(), BotforgeError> {
        queries::bots::set_files_stored(&self.db, id, stored).await
    }

    pub async fn touch_activity(&self, id: &str) -> Result<(), BotforgeError> {
        queries::bots::touch_activity(&self.db, id).await
    }

    pub async fn bump_pipeline_generation(&self, id: &str) -> Result<i64, BotforgeError> {
        queries::bots::bump_pipeline_generation(&self.db, id).await
    }

    pub async fn finish_pipeline_if_current(
        &self,
        id: &str,
        generation: i64,
        runtime_status: RuntimeStatus,
        image_tag: Option<String>,
        container_id: Option<String>,
        last_restart: Option<String>,
    ) -> Result<bool, BotforgeError> {
        queries::bots::finish_pipeline_if_current(
            &self.db,
            id,
            generation,
            runtime_status,
            image_tag,
            container_id,
            last_restart,
        )
        .await
    }

    pub async fn delete_bot(&self, id: &str) -> Result<bool, BotforgeError> {
        queries::bots::delete_bot(&self.db, id).await
    }

    // --- conversation history ---

    pub async fn append_turn(
        &self,
        bot_id: &str,
        role: TurnRole,
        content: &str,
    ) -> Result<ConversationTurn, BotforgeError> {
        queries::turns::append_turn(&self.db, bot_id, role, content).await
    }

    pub async fn list_turns(&self, bot_id: &str) -> Result<Vec<ConversationTurn>, BotforgeError> {
        queries::turns::list_turns(&self.db, bot_id).await
    }

    // --- generated files ---

    pub async fn upsert_files(
        &self,
        bot_id: &str,
        user_id: &str,
        files: &[GeneratedFile],
    ) -> Result<(), BotforgeError> {
        queries::files::upsert_files(&self.db, bot_id, user_id, files).await
    }

    pub async fn get_file(
        &self,
        bot_id: &str,
        filename: &str,
    ) -> Result<Option<String>, BotforgeError> {
        queries::files::get_file(&self.db, bot_id, filename).await
    }

    pub async fn list_files(&self, bot_id: &str) -> Result<Vec<GeneratedFile>, BotforgeError> {
        queries::files::list_files(&self.db, bot_id).await
    }

    // --- runtime logs ---

    pub async fn append_log_lines(
        &self,
        bot_id: &str,
        lines: &[String],
    ) -> Result<(), BotforgeError> {
        queries::logs::append_lines(&self.db, bot_id, lines, self.runtime_log_cap).await
    }

    pub async fn recent_log_lines(
        &self,
        bot_id: &str,
        limit: u32,
    ) -> Result<Vec<LogLine>, BotforgeError> {
        queries::logs::recent_lines(&self.db, bot_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_store() -> (BotStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir
                .path()
                .join("store.db")
                .to_string_lossy()
                .into_owned(),
            wal_mode: true,
            runtime_log_cap: 3,
        };
        let store = BotStore::open(&config).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn require_bot_maps_missing_to_not_found() {
        let (store, _dir) = open_store().await;
        let err = store.require_bot("ghost").await.unwrap_err();
        match err {
            BotforgeError::NotFound { resource, id } => {
                assert_eq!(resource, "bot");
                assert_eq!(id, "ghost");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn log_appends_honor_configured_cap() {
        let (store, _dir) = open_store().await;
        store
            .create_bot(&crate::queries::bots::tests::make_bot("b1"))
            .await
            .unwrap();

        let lines: Vec<String> = (0..5).map(|i| format!("line {i}")).collect();
        store.append_log_lines("b1", &lines).await.unwrap();

        let got = store.recent_log_lines("b1", 10).await.unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].line, "line 2");
        assert_eq!(got[2].line, "line 4");
        store.close().await.unwrap();
    }
}
