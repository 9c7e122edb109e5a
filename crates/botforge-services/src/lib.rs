// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP clients for Botforge's remote collaborators.
//!
//! Each client implements the corresponding trait seam from
//! `botforge-core::traits` over a JSON request/response contract. Base URLs
//! come from configuration; tests override them with wiremock servers.

pub mod builder;
pub mod codegen;
pub mod deployer;
pub mod telegram;

pub use builder::HttpBuildService;
pub use codegen::OpenAiCodeGenerator;
pub use deployer::HttpDeployManager;
pub use telegram::TelegramClient;
