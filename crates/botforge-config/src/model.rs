// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Botforge platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup with actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Botforge configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the only key that cannot default is `codegen.api_key`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotforgeConfig {
    /// HTTP gateway settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bot record store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Code generation service settings.
    #[serde(default)]
    pub codegen: CodegenConfig,

    /// Container build service settings.
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Deployment manager settings.
    #[serde(default)]
    pub deployer: DeployerConfig,

    /// Lifecycle orchestrator settings.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Bot record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Maximum retained runtime log lines per bot; older lines are pruned
    /// on every append.
    #[serde(default = "default_runtime_log_cap")]
    pub runtime_log_cap: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            runtime_log_cap: default_runtime_log_cap(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("botforge").join("botforge.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("botforge.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_runtime_log_cap() -> u32 {
    500
}

/// Code generation service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CodegenConfig {
    /// API key for the code generation service. `None` requires the
    /// `BOTFORGE_CODEGEN_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_codegen_base_url")]
    pub base_url: String,

    /// Model identifier for generation requests.
    #[serde(default = "default_codegen_model")]
    pub model: String,

    /// Maximum tokens per generation response.
    #[serde(default = "default_codegen_max_tokens")]
    pub max_tokens: u32,

    /// How many trailing conversation turns are replayed as context.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_codegen_base_url(),
            model: default_codegen_model(),
            max_tokens: default_codegen_max_tokens(),
            history_window: default_history_window(),
        }
    }
}

fn default_codegen_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_codegen_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_codegen_max_tokens() -> u32 {
    3000
}

fn default_history_window() -> usize {
    10
}

/// Container build service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// Base URL of the build service.
    #[serde(default = "default_builder_base_url")]
    pub base_url: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            base_url: default_builder_base_url(),
        }
    }
}

fn default_builder_base_url() -> String {
    "http://127.0.0.1:8200".to_string()
}

/// Deployment manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeployerConfig {
    /// Base URL of the deployment manager.
    #[serde(default = "default_deployer_base_url")]
    pub base_url: String,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            base_url: default_deployer_base_url(),
        }
    }
}

fn default_deployer_base_url() -> String {
    "http://127.0.0.1:8300".to_string()
}

/// Lifecycle orchestrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Inactivity duration after which a running bot is scaled down, in seconds.
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,

    /// Deadline for each remote pipeline phase, in seconds.
    #[serde(default = "default_phase_timeout_secs")]
    pub phase_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            phase_timeout_secs: default_phase_timeout_secs(),
        }
    }
}

fn default_idle_threshold_secs() -> u64 {
    30 * 60
}

fn default_phase_timeout_secs() -> u64 {
    120
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Base URL of the Telegram Bot API.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Public base URL of this server's webhook receiver; a bot's webhook is
    /// registered as `{webhook_base}/webhook/{bot_id}`.
    #[serde(default = "default_webhook_base")]
    pub webhook_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: default_telegram_api_base(),
            webhook_base: default_webhook_base(),
        }
    }
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_webhook_base() -> String {
    "http://127.0.0.1:3000".to_string()
}
