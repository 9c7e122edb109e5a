// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface for the Botforge lifecycle platform.
//!
//! Exposes the lifecycle endpoints under `/v1`, the per-bot webhook
//! receiver under `/webhook`, and an unauthenticated health endpoint.

pub mod error;
pub mod handlers;
pub mod server;
pub mod webhook;

pub use server::{build_router, start_server, GatewayState};
