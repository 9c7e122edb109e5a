// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for the remote collaborators of the lifecycle orchestrator.
//!
//! The orchestrator treats every collaborator as a black box with a
//! request/response contract. Production implementations live in
//! `botforge-services`; deterministic mocks in `botforge-test-utils`.

pub mod build;
pub mod codegen;
pub mod deploy;
pub mod webhook;

pub use build::BuildService;
pub use codegen::CodeGenerator;
pub use deploy::DeployManager;
pub use webhook::WebhookRegistrar;
