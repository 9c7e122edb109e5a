// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history: append-only turns replayed as generator context.

use botforge_core::types::{now_rfc3339, ConversationTurn};
use botforge_core::{BotforgeError, TurnRole};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;

/// Append one turn to a bot's conversation history.
pub async fn append_turn(
    db: &Database,
    bot_id: &str,
    role: TurnRole,
    content: &str,
) -> Result<ConversationTurn, BotforgeError> {
    let turn = ConversationTurn {
        id: Uuid::new_v4().to_string(),
        bot_id: bot_id.to_string(),
        role,
        content: content.to_string(),
        created_at: now_rfc3339(),
    };
    let inserted = turn.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation_turns (id, bot_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    turn.id,
                    turn.bot_id,
                    turn.role.to_string(),
                    turn.content,
                    turn.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(inserted)
}

/// List a bot's conversation history in insertion order, oldest first.
pub async fn list_turns(db: &Database, bot_id: &str) -> Result<Vec<ConversationTurn>, BotforgeError> {
    let bot_id = bot_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, bot_id, role, content, created_at FROM conversation_turns
                 WHERE bot_id = ?1 ORDER BY rowid ASC",
            )?;
            let rows = stmt.query_map(params![bot_id], |row| {
                let role: String = row.get(2)?;
                Ok(ConversationTurn {
                    id: row.get(0)?,
                    bot_id: row.get(1)?,
                    role: role.parse().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut turns = Vec::new();
            for row in rows {
                turns.push(row?);
            }
            Ok(turns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
