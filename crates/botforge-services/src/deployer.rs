// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the deployment manager.
//!
//! Endpoints: `/deploy`, `/status`, `/scale`, `/shutdown`. The deployment
//! backend is Kubernetes; `status` reports `deployment_type` accordingly.

use std::time::Duration;

use async_trait::async_trait;
use botforge_config::model::DeployerConfig;
use botforge_core::types::{DeployOutput, RuntimeSnapshot, ServiceCall, ShutdownOutput};
use botforge_core::{BotforgeError, DeployManager, RuntimeStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetRequest<'a> {
    bot_id: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployRequest<'a> {
    bot_id: &'a str,
    user_id: &'a str,
    image_tag: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeployResponse {
    success: bool,
    #[serde(default)]
    logs: Vec<String>,
    namespace: Option<String>,
    deployment_name: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: Option<StatusBody>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct StatusBody {
    runtime_status: RuntimeStatus,
    deployment_type: String,
}

#[derive(Deserialize)]
struct AckResponse {
    success: bool,
    #[serde(default)]
    logs: Vec<String>,
    error: Option<String>,
}

/// reqwest-backed [`DeployManager`] implementation.
#[derive(Debug, Clone)]
pub struct HttpDeployManager {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDeployManager {
    pub fn new(config: &DeployerConfig) -> Result<Self, BotforgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| BotforgeError::Upstream {
                call: ServiceCall::Deploy,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn post<Req, Resp>(
        &self,
        call: ServiceCall,
        path: &str,
        body: &Req,
        failure: &str,
    ) -> Result<Resp, BotforgeError>
    where
        Req: Serialize + Sync,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BotforgeError::Upstream {
                call,
                message: format!("{failure}: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(%status, %url, "deploy manager response received");
        let text = response.text().await.map_err(|e| BotforgeError::Upstream {
            call,
            message: format!("{failure}: unreadable response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        if !status.is_success() {
            return Err(BotforgeError::upstream(
                call,
                format!("{failure}: HTTP {status}: {text}"),
            ));
        }
        serde_json::from_str(&text).map_err(|e| BotforgeError::Upstream {
            call,
            message: format!("{failure}: malformed response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl DeployManager for HttpDeployManager {
    async fn deploy(
        &self,
        bot_id: &str,
        user_id: &str,
        image_tag: &str,
    ) -> Result<DeployOutput, BotforgeError> {
        let resp: DeployResponse = self
            .post(
                ServiceCall::Deploy,
                "/deploy",
                &DeployRequest {
                    bot_id,
                    user_id,
                    image_tag,
                },
                "Deployment failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::Deploy,
                format!("Deployment failed: {detail}"),
            ));
        }
        let namespace = resp.namespace.ok_or_else(|| {
            BotforgeError::upstream(
                ServiceCall::Deploy,
                "Deployment failed: response missing namespace",
            )
        })?;
        let deployment_name = resp.deployment_name.ok_or_else(|| {
            BotforgeError::upstream(
                ServiceCall::Deploy,
                "Deployment failed: response missing deployment name",
            )
        })?;
        Ok(DeployOutput {
            logs: resp.logs,
            namespace,
            deployment_name,
        })
    }

    async fn status(&self, bot_id: &str, user_id: &str) -> Result<RuntimeSnapshot, BotforgeError> {
        let resp: StatusResponse = self
            .post(
                ServiceCall::Status,
                "/status",
                &TargetRequest { bot_id, user_id },
                "Status query failed",
            )
            .await?;
        let body = resp.status.ok_or_else(|| {
            let detail = resp.error.unwrap_or_else(|| "response missing status".to_string());
            BotforgeError::upstream(ServiceCall::Status, format!("Status query failed: {detail}"))
        })?;
        Ok(RuntimeSnapshot {
            runtime_status: body.runtime_status,
            deployment_type: body.deployment_type,
        })
    }

    async fn scale_to_zero(&self, bot_id: &str, user_id: &str) -> Result<(), BotforgeError> {
        let resp: AckResponse = self
            .post(
                ServiceCall::Scale,
                "/scale",
                &TargetRequest { bot_id, user_id },
                "Scale to zero failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::Scale,
                format!("Scale to zero failed: {detail}"),
            ));
        }
        Ok(())
    }

    async fn shutdown(
        &self,
        bot_id: &str,
        user_id: &str,
    ) -> Result<ShutdownOutput, BotforgeError> {
        let resp: AckResponse = self
            .post(
                ServiceCall::Shutdown,
                "/shutdown",
                &TargetRequest { bot_id, user_id },
                "Shutdown failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::Shutdown,
                format!("Shutdown failed: {detail}"),
            ));
        }
        Ok(ShutdownOutput { logs: resp.logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> HttpDeployManager {
        HttpDeployManager::new(&DeployerConfig::default())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn deploy_sends_image_tag_and_returns_target() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/deploy"))
            .and(body_json(serde_json::json!({
                "botId": "b1",
                "userId": "u1",
                "imageTag": "img:1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "logs": ["deployed"],
                "namespace": "ns",
                "deploymentName": "dep"
            })))
            .mount(&server)
            .await;

        let out = test_client(&server.uri())
            .deploy("b1", "u1", "img:1")
            .await
            .unwrap();
        assert_eq!(out.namespace, "ns");
        assert_eq!(out.deployment_name, "dep");
        assert_eq!(out.logs, vec!["deployed"]);
    }

    #[tokio::test]
    async fn status_parses_nested_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": {
                    "runtime_status": "running",
                    "deployment_type": "kubernetes"
                }
            })))
            .mount(&server)
            .await;

        let snap = test_client(&server.uri()).status("b1", "u1").await.unwrap();
        assert_eq!(snap.runtime_status, RuntimeStatus::Running);
        assert_eq!(snap.deployment_type, "kubernetes");
    }

    #[tokio::test]
    async fn status_without_body_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "deployment not found"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .status("b1", "u1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("deployment not found"));
    }

    #[tokio::test]
    async fn failed_scale_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/scale"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "replicaset busy"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .scale_to_zero("b1", "u1")
            .await
            .unwrap_err();
        match err {
            BotforgeError::Upstream { call, message, .. } => {
                assert_eq!(call, ServiceCall::Scale);
                assert!(message.contains("replicaset busy"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn shutdown_returns_teardown_logs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/shutdown"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "logs": ["deployment removed", "service removed"]
            })))
            .mount(&server)
            .await;

        let out = test_client(&server.uri())
            .shutdown("b1", "u1")
            .await
            .unwrap();
        assert_eq!(out.logs.len(), 2);
    }
}
