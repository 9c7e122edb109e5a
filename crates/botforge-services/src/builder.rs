// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the container build service.
//!
//! The build service exposes three synchronous JSON endpoints: `/build`,
//! `/push`, and `/cleanup-images`. A non-success body and a transport error
//! are reported identically so the pipeline aborts the phase either way.

use std::time::Duration;

use async_trait::async_trait;
use botforge_config::model::BuilderConfig;
use botforge_core::types::{BuildOutput, CleanupOutput, PushOutput, ServiceCall};
use botforge_core::{BotforgeError, BuildService};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildRequest<'a> {
    bot_id: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest<'a> {
    bot_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildResponse {
    success: bool,
    image_tag: Option<String>,
    #[serde(default)]
    logs: Vec<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct LogsResponse {
    success: bool,
    #[serde(default)]
    logs: Vec<String>,
    error: Option<String>,
}

/// reqwest-backed [`BuildService`] implementation.
#[derive(Debug, Clone)]
pub struct HttpBuildService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBuildService {
    pub fn new(config: &BuilderConfig) -> Result<Self, BotforgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| BotforgeError::Upstream {
                call: ServiceCall::Build,
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
        debug!(%status, %url, "build service response received");
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
impl BuildService for HttpBuildService {
    async fn build(&self, bot_id: &str, user_id: &str) -> Result<BuildOutput, BotforgeError> {
        let resp: BuildResponse = self
            .post(
                ServiceCall::Build,
                "/build",
                &BuildRequest { bot_id, user_id },
                "Container build failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::Build,
                format!("Container build failed: {detail}"),
            ));
        }
        let image_tag = resp.image_tag.ok_or_else(|| {
            BotforgeError::upstream(
                ServiceCall::Build,
                "Container build failed: response missing image tag",
            )
        })?;
        Ok(BuildOutput {
            image_tag,
            logs: resp.logs,
        })
    }

    async fn push(&self, bot_id: &str) -> Result<PushOutput, BotforgeError> {
        let resp: LogsResponse = self
            .post(
                ServiceCall::Push,
                "/push",
                &PushRequest { bot_id },
                "Container push failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::Push,
                format!("Container push failed: {detail}"),
            ));
        }
        Ok(PushOutput { logs: resp.logs })
    }

    async fn cleanup_images(&self, bot_id: &str) -> Result<CleanupOutput, BotforgeError> {
        let resp: LogsResponse = self
            .post(
                ServiceCall::CleanupImages,
                "/cleanup-images",
                &PushRequest { bot_id },
                "Image cleanup failed",
            )
            .await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_else(|| "no error detail".to_string());
            return Err(BotforgeError::upstream(
                ServiceCall::CleanupImages,
                format!("Image cleanup failed: {detail}"),
            ));
        }
        Ok(CleanupOutput { logs: resp.logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> HttpBuildService {
        HttpBuildService::new(&BuilderConfig::default())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    #[tokio::test]
    async fn build_returns_image_tag_and_logs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/build"))
            .and(body_json(serde_json::json!({
                "botId": "b1",
                "userId": "u1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "imageTag": "img:1",
                "logs": ["built"]
            })))
            .mount(&server)
            .await;

        let out = test_client(&server.uri()).build("b1", "u1").await.unwrap();
        assert_eq!(out.image_tag, "img:1");
        assert_eq!(out.logs, vec!["built"]);
    }

    #[tokio::test]
    async fn unsuccessful_build_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/build"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "dockerfile missing"
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .build("b1", "u1")
            .await
            .unwrap_err();
        match err {
            BotforgeError::Upstream { call, message, .. } => {
                assert_eq!(call, ServiceCall::Build);
                assert!(message.contains("Container build failed"), "got: {message}");
                assert!(message.contains("dockerfile missing"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn build_without_image_tag_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/build"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "logs": []
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .build("b1", "u1")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing image tag"));
    }

    #[tokio::test]
    async fn http_error_status_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/push"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).push("b1").await.unwrap_err();
        assert!(err.to_string().contains("Container push failed"));
    }

    #[tokio::test]
    async fn cleanup_images_aggregates_logs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/cleanup-images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "logs": ["removed img:1", "removed img:2"]
            })))
            .mount(&server)
            .await;

        let out = test_client(&server.uri())
            .cleanup_images("b1")
            .await
            .unwrap();
        assert_eq!(out.logs.len(), 2);
    }
}
