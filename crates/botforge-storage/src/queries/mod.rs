// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the bot record store.

pub mod bots;
pub mod files;
pub mod logs;
pub mod turns;
