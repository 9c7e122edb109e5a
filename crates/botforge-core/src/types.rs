// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Botforge workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Content lifecycle of a bot: whether its generated code is usable.
///
/// Independent of [`RuntimeStatus`] -- a bot can hold valid generated code
/// (`Active`) while its deployment is stopped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Creating,
    Active,
    Error,
}

/// Operational lifecycle of a bot's deployment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RuntimeStatus {
    Stopped,
    Starting,
    Running,
    Idle,
    Error,
}

/// Identifies which remote operation an error originated from.
///
/// The deploy pipeline phases are `Build`, `Push`, and `Deploy`; the
/// remaining variants cover the monitor/scale-down/cleanup lifecycle and
/// code generation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCall {
    Build,
    Push,
    Deploy,
    Status,
    Scale,
    Shutdown,
    CleanupImages,
    Generate,
    SendMessage,
    RegisterWebhook,
    UnregisterWebhook,
}

/// The persistent record representing one user-created bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    /// Unique bot identifier. Immutable once created.
    pub id: String,
    /// Owning user identifier.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Messaging-platform token. Secret; never logged.
    pub token: String,
    /// Content lifecycle state.
    pub status: BotStatus,
    /// Operational lifecycle state.
    pub runtime_status: RuntimeStatus,
    /// Deployment identifier reported by the deploy manager.
    pub container_id: Option<String>,
    /// Image tag from the most recent successful build.
    pub image_tag: Option<String>,
    /// Whether a generated file set has been persisted for this bot.
    pub files_stored: bool,
    /// Monotonically increasing counter; a pipeline run must hold the
    /// current value to commit its final status write.
    pub pipeline_generation: i64,
    /// Timestamp of the last successful deploy.
    pub last_restart: Option<String>,
    /// Timestamp of the last inbound webhook activity.
    pub last_activity: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Speaker role in a bot's conversation history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn in a bot's append-only conversation history.
///
/// Insertion order is meaningful: turns are replayed oldest-first as
/// context for the code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub bot_id: String,
    pub role: TurnRole,
    pub content: String,
    pub created_at: String,
}

/// A single named source file produced by the code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}

/// Code generation result: a file set plus a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBot {
    pub files: Vec<GeneratedFile>,
    pub explanation: String,
}

/// One line in a bot's bounded, append-only runtime log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub seq: i64,
    pub bot_id: String,
    pub line: String,
    pub created_at: String,
}

// --- Remote service outputs ---

/// Successful container build: an image tag plus build log lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub image_tag: String,
    pub logs: Vec<String>,
}

/// Successful registry push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushOutput {
    pub logs: Vec<String>,
}

/// Successful deployment rollout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployOutput {
    pub logs: Vec<String>,
    pub namespace: String,
    pub deployment_name: String,
}

/// Point-in-time deployment status as reported by the deploy manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSnapshot {
    pub runtime_status: RuntimeStatus,
    pub deployment_type: String,
}

/// Successful deployment teardown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutdownOutput {
    pub logs: Vec<String>,
}

/// Successful registry image cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupOutput {
    pub logs: Vec<String>,
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
///
/// All persisted timestamps use this format so lexical ordering matches
/// chronological ordering.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_enums_round_trip_through_strings() {
        for status in [BotStatus::Creating, BotStatus::Active, BotStatus::Error] {
            let s = status.to_string();
            assert_eq!(BotStatus::from_str(&s).unwrap(), status);
        }
        for status in [
            RuntimeStatus::Stopped,
            RuntimeStatus::Starting,
            RuntimeStatus::Running,
            RuntimeStatus::Idle,
            RuntimeStatus::Error,
        ] {
            let s = status.to_string();
            assert_eq!(RuntimeStatus::from_str(&s).unwrap(), status);
        }
    }

    #[test]
    fn runtime_status_serializes_lowercase() {
        let json = serde_json::to_string(&RuntimeStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let parsed: RuntimeStatus = serde_json::from_str("\"idle\"").unwrap();
        assert_eq!(parsed, RuntimeStatus::Idle);
    }

    #[test]
    fn service_call_displays_kebab_case() {
        assert_eq!(ServiceCall::CleanupImages.to_string(), "cleanup-images");
        assert_eq!(ServiceCall::Build.to_string(), "build");
    }

    #[test]
    fn now_rfc3339_has_millis_and_zulu() {
        let ts = now_rfc3339();
        assert!(ts.ends_with('Z'), "got: {ts}");
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len(), "got: {ts}");
    }
}
