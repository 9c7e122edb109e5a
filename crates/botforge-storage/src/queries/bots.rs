// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot record CRUD and state-transition operations.
//!
//! The `pipeline_generation` column is the optimistic-concurrency token:
//! a pipeline run acquires a generation via [`bump_pipeline_generation`] and
//! commits its final status write through [`finish_pipeline_if_current`],
//! which refuses writes from a run whose generation has been superseded.

use botforge_core::types::{now_rfc3339, BotRecord};
use botforge_core::{BotStatus, BotforgeError, RuntimeStatus};
use rusqlite::params;

use crate::database::Database;

const BOT_COLUMNS: &str = "id, user_id, name, token, status, runtime_status, container_id, \
     image_tag, files_stored, pipeline_generation, last_restart, last_activity, \
     created_at, updated_at";

fn parse_enum<T>(value: String, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.parse().map_err(|e: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_bot(row: &rusqlite::Row<'_>) -> rusqlite::Result<BotRecord> {
    Ok(BotRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        token: row.get(3)?,
        status: parse_enum::<BotStatus>(row.get(4)?, 4)?,
        runtime_status: parse_enum::<RuntimeStatus>(row.get(5)?, 5)?,
        container_id: row.get(6)?,
        image_tag: row.get(7)?,
        files_stored: row.get::<_, i64>(8)? != 0,
        pipeline_generation: row.get(9)?,
        last_restart: row.get(10)?,
        last_activity: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Insert a new bot record. Fails if the id already exists.
pub async fn create_bot(db: &Database, bot: &BotRecord) -> Result<(), BotforgeError> {
    let bot = bot.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bots (id, user_id, name, token, status, runtime_status, \
                 container_id, image_tag, files_stored, pipeline_generation, last_restart, \
                 last_activity, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    bot.id,
                    bot.user_id,
                    bot.name,
                    bot.token,
                    bot.status.to_string(),
                    bot.runtime_status.to_string(),
                    bot.container_id,
                    bot.image_tag,
                    bot.files_stored as i64,
                    bot.pipeline_generation,
                    bot.last_restart,
                    bot.last_activity,
                    bot.created_at,
                    bot.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a bot record by id.
pub async fn get_bot(db: &Database, id: &str) -> Result<Option<BotRecord>, BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {BOT_COLUMNS} FROM bots WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_bot);
            match result {
                Ok(bot) => Ok(Some(bot)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all bots owned by a user, newest first.
pub async fn list_bots_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<BotRecord>, BotforgeError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOT_COLUMNS} FROM bots WHERE user_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![user_id], row_to_bot)?;
            let mut bots = Vec::new();
            for row in rows {
                bots.push(row?);
            }
            Ok(bots)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the content lifecycle state.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: BotStatus,
) -> Result<(), BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE bots SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.to_string(), now_rfc3339(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the operational lifecycle state.
pub async fn update_runtime_status(
    db: &Database,
    id: &str,
    runtime_status: RuntimeStatus,
) -> Result<(), BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE bots SET runtime_status = ?1, updated_at = ?2 WHERE id = ?3",
                params![runtime_status.to_string(), now_rfc3339(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark whether a generated file set is persisted for this bot.
pub async fn set_files_stored(
    db: &Database,
    id: &str,
    files_stored: bool,
) -> Result<(), BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE bots SET files_stored = ?1, updated_at = ?2 WHERE id = ?3",
                params![files_stored as i64, now_rfc3339(), id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Refresh `last_activity` (webhook traffic observed).
pub async fn touch_activity(db: &Database, id: &str) -> Result<(), BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let now = now_rfc3339();
            conn.execute(
                "UPDATE bots SET last_activity = ?1, updated_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Advance the pipeline generation counter and return the new value.
///
/// Called once at the start of a deploy pipeline run; the returned value is
/// the run's commit token.
pub async fn bump_pipeline_generation(db: &Database, id: &str) -> Result<i64, BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let generation = conn.query_row(
                "UPDATE bots SET pipeline_generation = pipeline_generation + 1, \
                 updated_at = ?1 WHERE id = ?2 RETURNING pipeline_generation",
                params![now_rfc3339(), id],
                |row| row.get(0),
            )?;
            Ok(generation)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Commit a pipeline run's final state, but only if `generation` is still
/// current. Returns `true` when the write was applied; `false` means a newer
/// run superseded this one and nothing was written.
#[allow(clippy::too_many_arguments)]
pub async fn finish_pipeline_if_current(
    db: &Database,
    id: &str,
    generation: i64,
    runtime_status: RuntimeStatus,
    image_tag: Option<String>,
    container_id: Option<String>,
    last_restart: Option<String>,
) -> Result<bool, BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute(
                "UPDATE bots SET runtime_status = ?1, \
                 image_tag = COALESCE(?2, image_tag), \
                 container_id = COALESCE(?3, container_id), \
                 last_restart = COALESCE(?4, last_restart), \
                 updated_at = ?5 \
                 WHERE id = ?6 AND pipeline_generation = ?7",
                params![
                    runtime_status.to_string(),
                    image_tag,
                    container_id,
                    last_restart,
                    now_rfc3339(),
                    id,
                    generation,
                ],
            )?;
            Ok(affected == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a bot record. Conversation turns, files, and runtime logs cascade.
///
/// Returns `true` if a row was deleted.
pub async fn delete_bot(db: &Database, id: &str) -> Result<bool, BotforgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM bots WHERE id = ?1", params![id])?;
            Ok(affected == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
