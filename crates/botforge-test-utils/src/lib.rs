// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording mock implementations of the remote service traits.
//!
//! Each mock records its calls into a [`CallLog`] so tests can assert on
//! call counts and cross-service ordering (e.g. build before push before
//! deploy). Sharing one log between the build and deploy mocks gives a
//! single global ordering.

pub mod mock_builder;
pub mod mock_codegen;
pub mod mock_deployer;
pub mod mock_registrar;

use std::sync::{Arc, Mutex};

pub use mock_builder::MockBuildService;
pub use mock_codegen::MockCodeGenerator;
pub use mock_deployer::MockDeployManager;
pub use mock_registrar::MockWebhookRegistrar;

/// Shared, ordered record of mock service invocations.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// All recorded entries, in invocation order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of entries starting with `prefix` (e.g. `"scale"`).
    pub fn count_of(&self, prefix: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}
