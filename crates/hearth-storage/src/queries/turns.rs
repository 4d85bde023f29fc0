// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only transcript operations.

use chrono::Utc;
use hearth_core::types::Role;
use hearth_core::HearthError;
use rusqlite::params;

use crate::database::{fmt_ts, parse_enum, parse_ts, Database};
use crate::models::ConversationTurn;

/// Append a turn, assigning the next per-session sequence number.
///
/// The sequence lookup and insert share one transaction on the writer
/// thread, so concurrent appends to the same session never collide.
pub async fn append_turn(
    db: &Database,
    session_id: &str,
    role: Role,
    content: &str,
) -> Result<ConversationTurn, HearthError> {
    let session_id = session_id.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let sequence: i64 = tx.query_row(
                "SELECT COALESCE(MAX(sequence), 0) + 1 FROM turns WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            let turn = ConversationTurn {
                id: uuid::Uuid::new_v4().to_string(),
                session_id,
                role,
                content,
                sequence,
                created_at: Utc::now(),
            };
            tx.execute(
                "INSERT INTO turns (id, session_id, role, content, sequence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    turn.id,
                    turn.session_id,
                    turn.role.to_string(),
                    turn.content,
                    turn.sequence,
                    fmt_ts(turn.created_at),
                ],
            )?;
            tx.commit()?;
            Ok(turn)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a session's turns in sequence order.
pub async fn list_turns(
    db: &Database,
    session_id: &str,
) -> Result<Vec<ConversationTurn>, HearthError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, sequence, created_at
                 FROM turns WHERE session_id = ?1 ORDER BY sequence ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                let role: String = row.get(2)?;
                let created_at: String = row.get(5)?;
                Ok(ConversationTurn {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    role: parse_enum(2, &role)?,
                    content: row.get(3)?,
                    sequence: row.get(4)?,
                    created_at: parse_ts(5, &created_at)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
