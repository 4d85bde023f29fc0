// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email queue operations.
//!
//! Entries move `pending -> processing -> sent | failed`. The claim step runs
//! in a single transaction on the writer thread, so two processor runs never
//! receive the same entry unless its claim has gone stale.

use chrono::{DateTime, Utc};
use hearth_core::types::QueueStatus;
use hearth_core::HearthError;
use rusqlite::params;

use crate::database::{fmt_ts, parse_enum, parse_ts, Database};
use crate::models::{EmailQueueEntry, NewEmailQueueEntry};

const ENTRY_COLUMNS: &str = "id, user_id, session_id, email, display_name, email_type, \
     scheduled_for, status, error_message, created_at, updated_at";

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmailQueueEntry> {
    let email_type: String = row.get(5)?;
    let scheduled_for: String = row.get(6)?;
    let status: String = row.get(7)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;
    Ok(EmailQueueEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        email: row.get(3)?,
        display_name: row.get(4)?,
        email_type: parse_enum(5, &email_type)?,
        scheduled_for: parse_ts(6, &scheduled_for)?,
        status: parse_enum(7, &status)?,
        error_message: row.get(8)?,
        created_at: parse_ts(9, &created_at)?,
        updated_at: parse_ts(10, &updated_at)?,
    })
}

/// Insert a batch unless pending entries already exist for its (user, session) pair.
///
/// The existence check and the inserts share one transaction. Every entry in
/// the batch must belong to the same pair. Returns whether anything was inserted.
pub async fn enqueue_if_absent(
    db: &Database,
    entries: &[NewEmailQueueEntry],
) -> Result<bool, HearthError> {
    let Some(first) = entries.first() else {
        return Ok(false);
    };
    if entries
        .iter()
        .any(|e| e.user_id != first.user_id || e.session_id != first.session_id)
    {
        return Err(HearthError::InvalidInput(
            "queue batch spans more than one (user, session) pair".to_string(),
        ));
    }

    let entries = entries.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let existing: i64 = tx.query_row(
                "SELECT COUNT(*) FROM email_queue
                 WHERE user_id = ?1 AND session_id = ?2 AND status = 'pending'",
                params![entries[0].user_id, entries[0].session_id],
                |row| row.get(0),
            )?;
            if existing > 0 {
                tx.commit()?;
                return Ok(false);
            }

            let now = fmt_ts(Utc::now());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO email_queue
                     (user_id, session_id, email, display_name, email_type, scheduled_for,
                      status, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?7)",
                )?;
                for e in &entries {
                    stmt.execute(params![
                        e.user_id,
                        e.session_id,
                        e.email,
                        e.display_name,
                        e.email_type.to_string(),
                        fmt_ts(e.scheduled_for),
                        now,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List every entry for a (user, session) pair in schedule order.
pub async fn list_for_session(
    db: &Database,
    user_id: &str,
    session_id: &str,
) -> Result<Vec<EmailQueueEntry>, HearthError> {
    let user_id = user_id.to_string();
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM email_queue
                 WHERE user_id = ?1 AND session_id = ?2
                 ORDER BY scheduled_for ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![user_id, session_id], entry_from_row)?;
            rows.collect()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Claim every due entry for processing.
///
/// Selects `pending` entries scheduled at or before `now`, plus `processing`
/// entries whose claim is older than `stale_after`, and marks them all
/// `processing` in the same transaction.
pub async fn claim_due(
    db: &Database,
    now: DateTime<Utc>,
    stale_after: chrono::Duration,
) -> Result<Vec<EmailQueueEntry>, HearthError> {
    let now_str = fmt_ts(now);
    let stale_before = fmt_ts(now - stale_after);
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let claimed = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM email_queue
                     WHERE (status = 'pending' AND scheduled_for <= ?1)
                        OR (status = 'processing' AND updated_at < ?2)
                     ORDER BY scheduled_for ASC, id ASC"
                ))?;
                let rows = stmt.query_map(params![now_str, stale_before], entry_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            };

            {
                let mut update = tx.prepare(
                    "UPDATE email_queue SET status = 'processing', updated_at = ?1 WHERE id = ?2",
                )?;
                for entry in &claimed {
                    update.execute(params![now_str, entry.id])?;
                }
            }
            tx.commit()?;

            Ok(claimed
                .into_iter()
                .map(|entry| EmailQueueEntry {
                    status: QueueStatus::Processing,
                    updated_at: now,
                    ..entry
                })
                .collect())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark an entry as sent.
pub async fn mark_sent(db: &Database, id: i64) -> Result<(), HearthError> {
    set_terminal_status(db, id, QueueStatus::Sent, None).await
}

/// Mark an entry as failed with the error text. Failed entries are never retried.
pub async fn mark_failed(db: &Database, id: i64, error: &str) -> Result<(), HearthError> {
    set_terminal_status(db, id, QueueStatus::Failed, Some(error.to_string())).await
}

async fn set_terminal_status(
    db: &Database,
    id: i64,
    status: QueueStatus,
    error: Option<String>,
) -> Result<(), HearthError> {
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE email_queue SET status = ?1, error_message = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![status.to_string(), error, fmt_ts(Utc::now()), id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if updated == 0 {
        return Err(HearthError::NotFound {
            entity: "email queue entry",
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Operator listing, optionally filtered by status.
pub async fn list(
    db: &Database,
    status: Option<QueueStatus>,
) -> Result<Vec<EmailQueueEntry>, HearthError> {
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| match &status {
            Some(filter) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM email_queue WHERE status = ?1
                     ORDER BY scheduled_for ASC, id ASC"
                ))?;
                let rows = stmt.query_map(params![filter], entry_from_row)?;
                rows.collect()
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ENTRY_COLUMNS} FROM email_queue ORDER BY scheduled_for ASC, id ASC"
                ))?;
                let rows = stmt.query_map([], entry_from_row)?;
                rows.collect()
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::types::EmailType;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn batch(session_id: &str, base: DateTime<Utc>) -> Vec<NewEmailQueueEntry> {
        EmailType::SEQUENCE
            .iter()
            .map(|&email_type| NewEmailQueueEntry {
                user_id: "user-1".to_string(),
                session_id: session_id.to_string(),
                email: "cook@example.com".to_string(),
                display_name: "Sam".to_string(),
                email_type,
                scheduled_for: base + chrono::Duration::days(email_type.offset_days()),
            })
            .collect()
    }

    #[tokio::test]
    async fn enqueue_is_guarded_by_pending_entries() {
        let (db, _dir) = setup_db().await;
        let now = Utc::now();

        assert!(enqueue_if_absent(&db, &batch("s1", now)).await.unwrap());
        assert!(!enqueue_if_absent(&db, &batch("s1", now)).await.unwrap());
        assert!(enqueue_if_absent(&db, &batch("s2", now)).await.unwrap());

        assert_eq!(list_for_session(&db, "user-1", "s1").await.unwrap().len(), 5);
        assert_eq!(list(&db, None).await.unwrap().len(), 10);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mixed_batch_is_rejected() {
        let (db, _dir) = setup_db().await;
        let mut entries = batch("s1", Utc::now());
        entries[4].session_id = "other".to_string();
        assert!(matches!(
            enqueue_if_absent(&db, &entries).await,
            Err(HearthError::InvalidInput(_))
        ));
        assert!(!enqueue_if_absent(&db, &[]).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn claim_due_only_takes_due_entries_once() {
        let (db, _dir) = setup_db().await;
        let base = Utc::now();
        enqueue_if_absent(&db, &batch("s1", base)).await.unwrap();

        let stale = chrono::Duration::minutes(10);
        let at_day_8 = base + chrono::Duration::days(8);
        let claimed = claim_due(&db, at_day_8, stale).await.unwrap();
        assert_eq!(claimed.len(), 2);
        assert_eq!(claimed[0].email_type, EmailType::PatternCheckIn);
        assert_eq!(claimed[1].email_type, EmailType::FirstWeek);
        assert!(claimed.iter().all(|e| e.status == QueueStatus::Processing));

        // A concurrent run a moment later gets nothing.
        let again = claim_due(&db, at_day_8 + chrono::Duration::seconds(1), stale)
            .await
            .unwrap();
        assert!(again.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_processing_entries_are_reclaimed() {
        let (db, _dir) = setup_db().await;
        let base = Utc::now();
        enqueue_if_absent(&db, &batch("s1", base)).await.unwrap();

        let stale = chrono::Duration::minutes(10);
        let t = base + chrono::Duration::days(4);
        assert_eq!(claim_due(&db, t, stale).await.unwrap().len(), 1);
        let later = t + chrono::Duration::minutes(11);
        let reclaimed = claim_due(&db, later, stale).await.unwrap();
        assert_eq!(reclaimed.len(), 1);
        assert_eq!(reclaimed[0].email_type, EmailType::PatternCheckIn);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sent_and_failed_are_terminal() {
        let (db, _dir) = setup_db().await;
        let base = Utc::now();
        enqueue_if_absent(&db, &batch("s1", base)).await.unwrap();
        let claimed = claim_due(
            &db,
            base + chrono::Duration::days(8),
            chrono::Duration::minutes(10),
        )
        .await
        .unwrap();

        mark_sent(&db, claimed[0].id).await.unwrap();
        mark_failed(&db, claimed[1].id, "smtp 550 mailbox unavailable")
            .await
            .unwrap();

        let failed = list(&db, Some(QueueStatus::Failed)).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].error_message.as_deref(),
            Some("smtp 550 mailbox unavailable")
        );
        assert_eq!(list(&db, Some(QueueStatus::Sent)).await.unwrap().len(), 1);
        assert_eq!(list(&db, Some(QueueStatus::Pending)).await.unwrap().len(), 3);

        // Terminal entries are never claimed again, even far in the future.
        let far = claim_due(
            &db,
            base + chrono::Duration::days(365),
            chrono::Duration::minutes(10),
        )
        .await
        .unwrap();
        assert_eq!(far.len(), 3);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn marking_unknown_entry_is_not_found() {
        let (db, _dir) = setup_db().await;
        assert!(matches!(
            mark_sent(&db, 999).await,
            Err(HearthError::NotFound { .. })
        ));
        db.close().await.unwrap();
    }
}
