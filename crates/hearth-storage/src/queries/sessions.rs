// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use chrono::Utc;
use hearth_core::types::{Language, SessionStatus};
use hearth_core::HearthError;
use rusqlite::params;

use crate::database::{fmt_ts, parse_enum, parse_ts, Database};
use crate::models::AssessmentSession;

const SESSION_COLUMNS: &str =
    "id, user_id, email, display_name, status, language, started_at";

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssessmentSession> {
    let status: String = row.get(4)?;
    let language: String = row.get(5)?;
    let started_at: String = row.get(6)?;
    Ok(AssessmentSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        email: row.get(2)?,
        display_name: row.get(3)?,
        status: parse_enum(4, &status)?,
        language: parse_enum(5, &language)?,
        started_at: parse_ts(6, &started_at)?,
    })
}

/// Create a new session.
pub async fn create_session(
    db: &Database,
    session: &AssessmentSession,
) -> Result<(), HearthError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            let started_at = fmt_ts(session.started_at);
            conn.execute(
                "INSERT INTO sessions (id, user_id, email, display_name, status, language, started_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    session.id,
                    session.user_id,
                    session.email,
                    session.display_name,
                    session.status.to_string(),
                    session.language.to_string(),
                    started_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(
    db: &Database,
    id: &str,
) -> Result<Option<AssessmentSession>, HearthError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], session_from_row) {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update a session's lifecycle status.
pub async fn update_session_status(
    db: &Database,
    id: &str,
    status: SessionStatus,
) -> Result<(), HearthError> {
    update_column(db, id, "status", status.to_string()).await
}

/// Switch a session's conversation language.
pub async fn update_session_language(
    db: &Database,
    id: &str,
    language: Language,
) -> Result<(), HearthError> {
    update_column(db, id, "language", language.to_string()).await
}

async fn update_column(
    db: &Database,
    id: &str,
    column: &'static str,
    value: String,
) -> Result<(), HearthError> {
    let key = id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                &format!("UPDATE sessions SET {column} = ?1, updated_at = ?2 WHERE id = ?3"),
                params![value, fmt_ts(Utc::now()), key],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if updated == 0 {
        return Err(HearthError::NotFound {
            entity: "session",
            id: id.to_string(),
        });
    }
    Ok(())
}
