// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `botforge-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate and its consumers.

pub use botforge_core::types::{BotRecord, ConversationTurn, GeneratedFile, LogLine};
