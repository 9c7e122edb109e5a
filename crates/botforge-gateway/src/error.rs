// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-HTTP mapping.
//!
//! Error kinds map to status codes; the body carries the rendered message.
//! Lifecycle endpoints use the `{success: false, error}` envelope, the
//! webhook uses `{ok: false, error}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use botforge_core::BotforgeError;
use serde_json::json;

pub(crate) fn status_for(err: &BotforgeError) -> StatusCode {
    match err {
        BotforgeError::Validation(_) => StatusCode::BAD_REQUEST,
        BotforgeError::NotFound { .. } => StatusCode::NOT_FOUND,
        BotforgeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wrapper turning a [`BotforgeError`] into a `{success: false}` response.
pub struct ApiError(pub BotforgeError);

impl From<BotforgeError> for ApiError {
    fn from(err: BotforgeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Wrapper turning a [`BotforgeError`] into an `{ok: false}` response.
pub struct WebhookError(pub BotforgeError);

impl From<BotforgeError> for WebhookError {
    fn from(err: BotforgeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = Json(json!({
            "ok": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botforge_core::types::ServiceCall;
    use std::time::Duration;

    #[test]
    fn kinds_map_to_expected_status_codes() {
        assert_eq!(
            status_for(&BotforgeError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&BotforgeError::NotFound {
                resource: "bot".into(),
                id: "b1".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&BotforgeError::Timeout {
                call: ServiceCall::Build,
                duration: Duration::from_secs(1)
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&BotforgeError::upstream(ServiceCall::Push, "boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
