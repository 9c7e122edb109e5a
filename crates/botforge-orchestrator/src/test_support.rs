// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for orchestrator tests.

use std::sync::Arc;

use botforge_config::model::{OrchestratorConfig, StorageConfig};
use botforge_core::types::BotRecord;
use botforge_core::{BotStatus, RuntimeStatus};
use botforge_storage::BotStore;
use botforge_test_utils::{
    CallLog, MockBuildService, MockCodeGenerator, MockDeployManager, MockWebhookRegistrar,
};
use tempfile::TempDir;

use crate::orchestrator::Orchestrator;

pub(crate) struct TestRig {
    pub orch: Orchestrator,
    pub log: CallLog,
    pub builder: Arc<MockBuildService>,
    pub deployer: Arc<MockDeployManager>,
    pub codegen: Arc<MockCodeGenerator>,
    pub registrar: Arc<MockWebhookRegistrar>,
    pub store: BotStore,
    _dir: TempDir,
}

pub(crate) async fn rig() -> TestRig {
    let dir = TempDir::new().unwrap();
    let storage = StorageConfig {
        database_path: dir.path().join("orch.db").to_string_lossy().into_owned(),
        wal_mode: true,
        runtime_log_cap: 100,
    };
    let store = BotStore::open(&storage).await.unwrap();

    let log = CallLog::new();
    let builder = Arc::new(MockBuildService::new(log.clone()));
    let deployer = Arc::new(MockDeployManager::new(log.clone()));
    let codegen = Arc::new(MockCodeGenerator::new(log.clone()));
    let registrar = Arc::new(MockWebhookRegistrar::new(log.clone()));

    let orch = Orchestrator::new(
        builder.clone(),
        deployer.clone(),
        codegen.clone(),
        registrar.clone(),
        store.clone(),
        OrchestratorConfig {
            idle_threshold_secs: 1800,
            phase_timeout_secs: 5,
        },
    );
    TestRig {
        orch,
        log,
        builder,
        deployer,
        codegen,
        registrar,
        store,
        _dir: dir,
    }
}

pub(crate) fn make_bot(id: &str) -> BotRecord {
    BotRecord {
        id: id.to_string(),
        user_id: "u1".to_string(),
        name: "Test Bot".to_string(),
        token: "123456:test-token".to_string(),
        status: BotStatus::Active,
        runtime_status: RuntimeStatus::Stopped,
        container_id: None,
        image_tag: None,
        files_stored: true,
        pipeline_generation: 0,
        last_restart: None,
        last_activity: None,
        created_at: "2026-01-01T00:00:00.000Z".to_string(),
        updated_at: "2026-01-01T00:00:00.000Z".to_string(),
    }
}
