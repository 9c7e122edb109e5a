// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot lifecycle orchestration.
//!
//! [`Orchestrator`] sequences the remote build and deploy services into the
//! deploy, monitor, scale-down, cleanup, and delete pipelines, and runs the
//! code generation flow. Status and logs are written back to the bot record
//! store; per-bot advisory locks serialize pipelines against the same bot.

pub mod generate;
pub mod lifecycle;
pub mod locks;
pub mod orchestrator;
pub mod outcome;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use orchestrator::Orchestrator;
pub use outcome::{
    BotMetrics, CleanupReport, DeployOutcome, DeploymentInfo, GenerateOutcome, MonitorOutcome,
    ScaleDownOutcome,
};
