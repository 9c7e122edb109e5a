// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generated source file storage, keyed by (bot, filename).

use botforge_core::types::{now_rfc3339, GeneratedFile};
use botforge_core::BotforgeError;
use rusqlite::params;

use crate::database::Database;

/// Upsert a bot's generated file set. Existing filenames are overwritten;
/// files not in `files` are left untouched.
pub async fn upsert_files(
    db: &Database,
    bot_id: &str,
    user_id: &str,
    files: &[GeneratedFile],
) -> Result<(), BotforgeError> {
    let bot_id = bot_id.to_string();
    let user_id = user_id.to_string();
    let files = files.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let now = now_rfc3339();
            for file in &files {
                tx.execute(
                    "INSERT INTO bot_files (bot_id, user_id, filename, content, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(bot_id, filename) DO UPDATE SET
                       content = excluded.content,
                       updated_at = excluded.updated_at",
                    params![bot_id, user_id, file.name, file.content, now],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch one stored file's content.
pub async fn get_file(
    db: &Database,
    bot_id: &str,
    filename: &str,
) -> Result<Option<String>, BotforgeError> {
    let bot_id = bot_id.to_string();
    let filename = filename.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT content FROM bot_files WHERE bot_id = ?1 AND filename = ?2",
                params![bot_id, filename],
                |row| row.get(0),
            );
            match result {
                Ok(content) => Ok(Some(content)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all stored files for a bot, sorted by filename.
pub async fn list_files(db: &Database, bot_id: &str) -> Result<Vec<GeneratedFile>, BotforgeError> {
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT filename, content FROM bot_files WHERE bot_id = ?1 ORDER BY filename",
            )?;
            let rows = stmt.query_map(params![bot_id], |row| {
                Ok(GeneratedFile {
                    name: row.get(0)?,
                    content: row.get(1)?,
                })
            })?;
            let mut files = Vec::new();
            for row in rows {
                files.push(row?);
            }
            Ok(files)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
