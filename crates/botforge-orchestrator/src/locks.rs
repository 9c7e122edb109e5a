// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-bot advisory locks.
//!
//! Pipelines targeting the same bot are serialized; different bots run
//! concurrently without contention. Lock entries are never removed -- the
//! map grows with the number of distinct bots, which is bounded by the
//! bots table.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct BotLocks {
    inner: DashMap<String, Arc<Mutex<()>>>,
}

impl BotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the advisory lock for `bot_id`, waiting if another pipeline
    /// holds it.
    pub async fn acquire(&self, bot_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .inner
            .entry(bot_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_bot_is_serialized() {
        let locks = Arc::new(BotLocks::new());
        let counter = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire("b1").await;
                let seen = counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                // No other task entered while we held the lock.
                assert_eq!(counter.load(Ordering::SeqCst), seen + 1);
                counter.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_bots_do_not_contend() {
        let locks = BotLocks::new();
        let _a = locks.acquire("b1").await;
        // Completes immediately even though b1 is held.
        let _b = locks.acquire("b2").await;
    }
}
