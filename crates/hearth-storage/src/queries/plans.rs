// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan storage and generation claims.
//!
//! Plans are stored as JSON, insert-if-absent, and never rewritten; only the
//! report delivery timestamp is set afterwards. A claim row
//! in `plan_claims` marks a generation in flight so that concurrent requests
//! for the same session (even from different processes) are rejected.

use chrono::Utc;
use hearth_core::HearthError;
use rusqlite::params;

use crate::database::{fmt_ts, Database};
use crate::models::Plan;

/// Fetch the stored plan for a session.
pub async fn get_plan(db: &Database, session_id: &str) -> Result<Option<Plan>, HearthError> {
    let session_id = session_id.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT plan_json FROM plans WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            ) {
                Ok(json) => Ok(Some(json)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    raw.map(|json| serde_json::from_str(&json).map_err(HearthError::storage))
        .transpose()
}

/// Store the plan unless one exists. Returns whether this call stored it.
pub async fn put_plan(db: &Database, session_id: &str, plan: &Plan) -> Result<bool, HearthError> {
    let session_id = session_id.to_string();
    let json = serde_json::to_string(plan).map_err(HearthError::storage)?;
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO plans (session_id, plan_json, created_at)
                 VALUES (?1, ?2, ?3)",
                params![session_id, json, fmt_ts(Utc::now())],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(inserted == 1)
}

/// Whether the report email for the session's plan has gone out.
///
/// A session without a plan has nothing delivered.
pub async fn report_delivered(db: &Database, session_id: &str) -> Result<bool, HearthError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT delivered_at FROM plans WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, Option<String>>(0),
            ) {
                Ok(at) => Ok(at.is_some()),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the report email as sent. The first timestamp is kept.
pub async fn mark_report_delivered(db: &Database, session_id: &str) -> Result<(), HearthError> {
    let id = session_id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE plans SET delivered_at = COALESCE(delivered_at, ?2) WHERE session_id = ?1",
                params![id, fmt_ts(Utc::now())],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if updated == 0 {
        return Err(HearthError::NotFound {
            entity: "plan",
            id: session_id.to_string(),
        });
    }
    Ok(())
}

/// Claim plan generation for a session. Stale claims are taken over.
pub async fn claim_plan_generation(
    db: &Database,
    session_id: &str,
    stale_after: chrono::Duration,
) -> Result<bool, HearthError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let now = Utc::now();
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM plan_claims WHERE session_id = ?1 AND claimed_at < ?2",
                params![session_id, fmt_ts(now - stale_after)],
            )?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO plan_claims (session_id, claimed_at) VALUES (?1, ?2)",
                params![session_id, fmt_ts(now)],
            )?;
            tx.commit()?;
            Ok(inserted == 1)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Release a generation claim. Releasing an absent claim is a no-op.
pub async fn release_plan_claim(db: &Database, session_id: &str) -> Result<(), HearthError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM plan_claims WHERE session_id = ?1",
                params![session_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::sessions::create_session;
    use hearth_core::types::{AssessmentSession, Language, SessionStatus};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        create_session(
            &db,
            &AssessmentSession {
                id: "sess-p".to_string(),
                user_id: "u".to_string(),
                email: "u@example.com".to_string(),
                display_name: "U".to_string(),
                status: SessionStatus::Complete,
                language: Language::En,
                started_at: Utc::now(),
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    fn plan_with_term(term: &str) -> Plan {
        Plan {
            kitchen_term: term.to_string(),
            ..Plan::default()
        }
    }

    #[tokio::test]
    async fn put_plan_is_insert_if_absent() {
        let (db, _dir) = setup_db().await;
        assert!(get_plan(&db, "sess-p").await.unwrap().is_none());

        assert!(put_plan(&db, "sess-p", &plan_with_term("the line")).await.unwrap());
        assert!(!put_plan(&db, "sess-p", &plan_with_term("the pass")).await.unwrap());

        let stored = get_plan(&db, "sess-p").await.unwrap().unwrap();
        assert_eq!(stored.kitchen_term, "the line");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn report_delivery_is_recorded_once_per_plan() {
        let (db, _dir) = setup_db().await;
        assert!(!report_delivered(&db, "sess-p").await.unwrap());
        assert!(matches!(
            mark_report_delivered(&db, "sess-p").await,
            Err(HearthError::NotFound { entity: "plan", .. })
        ));

        put_plan(&db, "sess-p", &plan_with_term("the line")).await.unwrap();
        assert!(!report_delivered(&db, "sess-p").await.unwrap());
        mark_report_delivered(&db, "sess-p").await.unwrap();
        mark_report_delivered(&db, "sess-p").await.unwrap();
        assert!(report_delivered(&db, "sess-p").await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_claim_is_rejected_until_released() {
        let (db, _dir) = setup_db().await;
        let stale = chrono::Duration::minutes(10);

        assert!(claim_plan_generation(&db, "sess-p", stale).await.unwrap());
        assert!(!claim_plan_generation(&db, "sess-p", stale).await.unwrap());

        release_plan_claim(&db, "sess-p").await.unwrap();
        assert!(claim_plan_generation(&db, "sess-p", stale).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_claim_is_taken_over() {
        let (db, _dir) = setup_db().await;
        assert!(
            claim_plan_generation(&db, "sess-p", chrono::Duration::minutes(10))
                .await
                .unwrap()
        );
        // A zero-length window makes the existing claim stale immediately.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(
            claim_plan_generation(&db, "sess-p", chrono::Duration::zero())
                .await
                .unwrap()
        );
        db.close().await.unwrap();
    }
}
