// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome types returned by orchestrator operations.
//!
//! These serialize in the wire shape the HTTP gateway exposes (camelCase
//! keys, `deployment.type` discriminator).

use botforge_core::types::GeneratedFile;
use botforge_core::RuntimeStatus;
use serde::Serialize;

/// Where and what the deploy pipeline rolled out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    #[serde(rename = "type")]
    pub deployment_type: String,
    pub image_tag: String,
    pub namespace: String,
    pub deployment_name: String,
}

/// Successful deploy pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutcome {
    pub deployment: DeploymentInfo,
    pub logs: Vec<String>,
}

/// Derived point-in-time metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMetrics {
    pub runtime_status: RuntimeStatus,
    pub deployment_type: String,
    pub message_count: u64,
    pub uptime_secs: u64,
    pub inactive_secs: u64,
}

/// Monitor result: metrics plus the inactivity verdict. Read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorOutcome {
    pub metrics: BotMetrics,
    pub is_inactive: bool,
    pub logs: Vec<String>,
}

/// Scale-down result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleDownOutcome {
    pub is_inactive: bool,
    pub scaled_down: bool,
    pub logs: Vec<String>,
}

/// Cleanup result: aggregated teardown and image-removal logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub logs: Vec<String>,
}

/// Code generation result as returned to the HTTP caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutcome {
    pub files: Vec<GeneratedFile>,
    pub explanation: String,
    pub files_uploaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_info_uses_wire_field_names() {
        let outcome = DeployOutcome {
            deployment: DeploymentInfo {
                deployment_type: "kubernetes".to_string(),
                image_tag: "img:1".to_string(),
                namespace: "ns".to_string(),
                deployment_name: "dep".to_string(),
            },
            logs: vec!["built".to_string()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["deployment"]["type"], "kubernetes");
        assert_eq!(json["deployment"]["imageTag"], "img:1");
        assert_eq!(json["deployment"]["deploymentName"], "dep");
    }

    #[test]
    fn monitor_outcome_camel_cases_keys() {
        let outcome = MonitorOutcome {
            metrics: BotMetrics {
                runtime_status: RuntimeStatus::Running,
                deployment_type: "kubernetes".to_string(),
                message_count: 3,
                uptime_secs: 60,
                inactive_secs: 10,
            },
            is_inactive: false,
            logs: vec![],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["isInactive"], false);
        assert_eq!(json["metrics"]["runtimeStatus"], "running");
        assert_eq!(json["metrics"]["messageCount"], 3);
    }
}
