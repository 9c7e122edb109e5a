// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Botforge platform.
//!
//! Provides the foundational error type, domain types, and the trait seams
//! behind which the remote build/deploy/codegen services sit. Everything
//! else in the workspace builds on this crate.

pub mod error;
pub mod traits;
pub mod types;

pub use error::BotforgeError;
pub use traits::{BuildService, CodeGenerator, DeployManager, WebhookRegistrar};
pub use types::{BotRecord, BotStatus, RuntimeStatus, ServiceCall, TurnRole};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn error_variants_render_their_kind() {
        let e = BotforgeError::Validation("botId is required".into());
        assert!(e.to_string().contains("validation error"));

        let e = BotforgeError::NotFound {
            resource: "bot".into(),
            id: "b1".into(),
        };
        assert_eq!(e.to_string(), "bot not found: b1");

        let e = BotforgeError::upstream(ServiceCall::Build, "Container build failed");
        assert_eq!(e.to_string(), "build failed: Container build failed");

        let e = BotforgeError::Timeout {
            call: ServiceCall::Push,
            duration: Duration::from_secs(30),
        };
        assert!(e.to_string().contains("push timed out"));
    }

    #[test]
    fn errors_are_matchable_by_kind() {
        // The gateway branches on the variant, never on message text.
        let e = BotforgeError::upstream(ServiceCall::Deploy, "rollout failed");
        match e {
            BotforgeError::Upstream { call, .. } => assert_eq!(call, ServiceCall::Deploy),
            _ => panic!("expected Upstream"),
        }
    }
}
