// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server wiring: construct the storage, service clients, orchestrator, and
//! gateway from configuration, then serve until shutdown.

use std::sync::Arc;

use botforge_config::BotforgeConfig;
use botforge_core::BotforgeError;
use botforge_gateway::GatewayState;
use botforge_orchestrator::Orchestrator;
use botforge_services::{HttpBuildService, HttpDeployManager, OpenAiCodeGenerator, TelegramClient};
use botforge_storage::BotStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the Botforge server with the given configuration.
pub async fn run(config: BotforgeConfig) -> Result<(), BotforgeError> {
    init_tracing(&config.server.log_level);

    let store = BotStore::open(&config.storage).await?;
    let builder = Arc::new(HttpBuildService::new(&config.builder)?);
    let deployer = Arc::new(HttpDeployManager::new(&config.deployer)?);
    let codegen = Arc::new(OpenAiCodeGenerator::new(&config.codegen)?);
    let telegram = Arc::new(TelegramClient::new(&config.telegram)?);

    // The Telegram client doubles as the webhook registrar.
    let orchestrator = Orchestrator::new(
        builder,
        deployer,
        codegen,
        telegram.clone(),
        store.clone(),
        config.orchestrator.clone(),
    );
    let state = GatewayState::new(orchestrator, telegram);

    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting botforge server"
    );

    let serve = botforge_gateway::start_server(&config.server, state);
    tokio::select! {
        result = serve => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    store.close().await?;
    Ok(())
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
