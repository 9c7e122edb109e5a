// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Botforge platform.

use thiserror::Error;

use crate::types::ServiceCall;

/// The primary error type used across all Botforge crates.
///
/// Every variant is a closed kind so callers can branch on the error shape
/// instead of substring-matching rendered messages.
#[derive(Debug, Error)]
pub enum BotforgeError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Request rejected before any remote call (absent bot id, prompt, or token).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// A remote service call returned `success: false` or failed at the transport layer.
    #[error("{call} failed: {message}")]
    Upstream {
        call: ServiceCall,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A remote service call exceeded its per-phase deadline.
    #[error("{call} timed out after {duration:?}")]
    Timeout {
        call: ServiceCall,
        duration: std::time::Duration,
    },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging platform errors (send failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BotforgeError {
    /// Shorthand for an upstream failure without a transport-level source.
    pub fn upstream(call: ServiceCall, message: impl Into<String>) -> Self {
        Self::Upstream {
            call,
            message: message.into(),
            source: None,
        }
    }
}
