// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Duration, Utc};
use hearth_core::types::NewEmailQueueEntry;
use hearth_core::{EmailQueueEntry, EmailType, HearthError, QueueStatus, StorageAdapter};
use tracing::{debug, info};

/// The five drip entries for a (user, session) pair, due at fixed day offsets from `now`.
pub fn sequence_entries(
    user_id: &str,
    session_id: &str,
    email: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Vec<NewEmailQueueEntry> {
    EmailType::SEQUENCE
        .into_iter()
        .map(|email_type| NewEmailQueueEntry {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            email_type,
            scheduled_for: now + Duration::days(email_type.offset_days()),
        })
        .collect()
}

/// Schedules the drip sequence unless it is already pending for the pair.
///
/// Returns the entries now pending for the pair, whether this call inserted
/// them or an earlier one did.
pub async fn schedule_sequence(
    storage: &dyn StorageAdapter,
    user_id: &str,
    session_id: &str,
    email: &str,
    display_name: &str,
    now: DateTime<Utc>,
) -> Result<Vec<EmailQueueEntry>, HearthError> {
    let batch = sequence_entries(user_id, session_id, email, display_name, now);
    let inserted = storage.enqueue_emails_if_absent(&batch).await?;
    if inserted {
        info!(session_id, count = batch.len(), "email sequence scheduled");
    } else {
        debug!(session_id, "email sequence already pending");
    }

    let pending = storage
        .list_emails_for_session(user_id, session_id)
        .await?
        .into_iter()
        .filter(|e| e.status == QueueStatus::Pending)
        .collect();
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_config::model::StorageConfig;
    use hearth_storage::SqliteStorage;

    async fn storage(dir: &tempfile::TempDir) -> SqliteStorage {
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("queue.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        storage
    }

    #[test]
    fn offsets_are_three_seven_fourteen_twenty_one_thirty() {
        let now = Utc::now();
        let offsets: Vec<i64> = sequence_entries("u", "s", "a@b.c", "A", now)
            .iter()
            .map(|e| (e.scheduled_for - now).num_days())
            .collect();
        assert_eq!(offsets, vec![3, 7, 14, 21, 30]);
    }

    #[tokio::test]
    async fn schedule_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;
        let now = Utc::now();

        let first = schedule_sequence(&storage, "u1", "s1", "a@b.c", "Ana", now)
            .await
            .unwrap();
        let second = schedule_sequence(&storage, "u1", "s1", "a@b.c", "Ana", now)
            .await
            .unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        assert_eq!(storage.list_emails(None).await.unwrap().len(), 5);
        let types: Vec<EmailType> = first.iter().map(|e| e.email_type).collect();
        assert_eq!(types, EmailType::SEQUENCE.to_vec());
    }

    #[tokio::test]
    async fn separate_sessions_get_separate_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir).await;
        let now = Utc::now();

        schedule_sequence(&storage, "u1", "s1", "a@b.c", "Ana", now)
            .await
            .unwrap();
        schedule_sequence(&storage, "u1", "s2", "a@b.c", "Ana", now)
            .await
            .unwrap();
        assert_eq!(storage.list_emails(None).await.unwrap().len(), 10);
    }
}
