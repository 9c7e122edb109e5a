// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded per-bot runtime logs.
//!
//! Appends prune in the same transaction, so a bot's log never exceeds the
//! configured cap and the oldest lines are the ones dropped.

use botforge_core::types::{now_rfc3339, LogLine};
use botforge_core::BotforgeError;
use rusqlite::params;

use crate::database::Database;

/// Append log lines for a bot, then prune to the newest `cap` lines.
pub async fn append_lines(
    db: &Database,
    bot_id: &str,
    lines: &[String],
    cap: u32,
) -> Result<(), BotforgeError> {
    if lines.is_empty() {
        return Ok(());
    }
    let bot_id = bot_id.to_string();
    let lines = lines.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let now = now_rfc3339();
            for line in &lines {
                tx.execute(
                    "INSERT INTO runtime_logs (bot_id, line, created_at) VALUES (?1, ?2, ?3)",
                    params![bot_id, line, now],
                )?;
            }
            tx.execute(
                "DELETE FROM runtime_logs WHERE bot_id = ?1 AND seq NOT IN (
                     SELECT seq FROM runtime_logs WHERE bot_id = ?1
                     ORDER BY seq DESC LIMIT ?2
                 )",
                params![bot_id, cap],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch up to `limit` of the most recent log lines, oldest first.
pub async fn recent_lines(
    db: &Database,
    bot_id: &str,
    limit: u32,
) -> Result<Vec<LogLine>, BotforgeError> {
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT seq, bot_id, line, created_at FROM (
                     SELECT seq, bot_id, line, created_at FROM runtime_logs
                     WHERE bot_id = ?1 ORDER BY seq DESC LIMIT ?2
                 ) ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![bot_id, limit], |row| {
                Ok(LogLine {
                    seq: row.get(0)?,
                    bot_id: row.get(1)?,
                    line: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?;
            let mut lines = Vec::new();
            for row in rows {
                lines.push(row?);
            }
            Ok(lines)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::bots;
    use tempfile::tempdir;

    async fn setup_with_bot() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("logs.db").to_str().unwrap())
            .await
            .unwrap();
        bots::create_bot(&db, &bots::tests::make_bot("b1"))
            .await
            .unwrap();
        (db, dir)
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn append_keeps_newest_lines_within_cap() {
        let (db, _dir) = setup_with_bot().await;

        append_lines(&db, "b1", &lines(&["one", "two", "three"]), 2)
            .await
            .unwrap();

        let got = recent_lines(&db, "b1", 10).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].line, "two");
        assert_eq!(got[1].line, "three");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cap_applies_across_appends() {
        let (db, _dir) = setup_with_bot().await;

        append_lines(&db, "b1", &lines(&["a", "b"]), 3).await.unwrap();
        append_lines(&db, "b1", &lines(&["c", "d"]), 3).await.unwrap();

        let got = recent_lines(&db, "b1", 10).await.unwrap();
        let texts: Vec<&str> = got.iter().map(|l| l.line.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "d"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn pruning_is_scoped_per_bot() {
        let (db, _dir) = setup_with_bot().await;
        bots::create_bot(&db, &bots::tests::make_bot("b2"))
            .await
            .unwrap();

        append_lines(&db, "b1", &lines(&["a1", "a2"]), 2).await.unwrap();
        append_lines(&db, "b2", &lines(&["x1", "x2", "x3"]), 2)
            .await
            .unwrap();

        assert_eq!(recent_lines(&db, "b1", 10).await.unwrap().len(), 2);
        let b2 = recent_lines(&db, "b2", 10).await.unwrap();
        assert_eq!(b2.len(), 2);
        assert_eq!(b2[0].line, "x2");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_append_is_a_no_op() {
        let (db, _dir) = setup_with_bot().await;
        append_lines(&db, "b1", &[], 5).await.unwrap();
        assert!(recent_lines(&db, "b1", 10).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
