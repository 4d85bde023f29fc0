// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One pass over the due drip emails.
//!
//! Entries are claimed atomically (`pending` to `processing`), so two passes
//! running at once never pick up the same entry. A pass that dies mid-way
//! leaves its claims in `processing`; they are reclaimed once stale, which
//! makes delivery at-least-once. The queue entry id is carried as the
//! Message-ID so a duplicate send is detectable downstream.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hearth_core::{EmailQueueEntry, EmailTransport, HearthError, Language, StorageAdapter};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::compose::{EmailComposer, Recipient};

/// Age after which a `processing` claim is considered abandoned.
pub const STALE_CLAIM_MINUTES: i64 = 10;

/// Outcome counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub claimed: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct QueueProcessor {
    storage: Arc<dyn StorageAdapter>,
    transport: Arc<dyn EmailTransport>,
    composer: EmailComposer,
}

impl QueueProcessor {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        transport: Arc<dyn EmailTransport>,
        composer: EmailComposer,
    ) -> Self {
        Self {
            storage,
            transport,
            composer,
        }
    }

    /// Claims every due entry and sends them one at a time.
    ///
    /// A failed send is recorded on its entry and never retried. Only storage
    /// errors while claiming abort the pass.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<ProcessSummary, HearthError> {
        let entries = self
            .storage
            .claim_due_emails(now, Duration::minutes(STALE_CLAIM_MINUTES))
            .await?;
        let mut summary = ProcessSummary {
            claimed: entries.len(),
            ..Default::default()
        };

        for entry in &entries {
            match self.deliver(entry).await {
                Ok(message_id) => {
                    self.storage.mark_email_sent(entry.id).await?;
                    debug!(id = entry.id, email_type = %entry.email_type, message_id = %message_id, "queued email sent");
                    summary.sent += 1;
                }
                Err(e) => {
                    warn!(id = entry.id, email_type = %entry.email_type, error = %e, "queued email failed");
                    self.storage
                        .mark_email_failed(entry.id, &e.to_string())
                        .await?;
                    summary.failed += 1;
                }
            }
        }

        if summary.claimed > 0 {
            info!(
                claimed = summary.claimed,
                sent = summary.sent,
                failed = summary.failed,
                "email queue pass finished"
            );
        }
        Ok(summary)
    }

    async fn deliver(&self, entry: &EmailQueueEntry) -> Result<String, HearthError> {
        let language = self
            .storage
            .get_session(&entry.session_id)
            .await?
            .map(|s| s.language)
            .unwrap_or(Language::En);

        // A missing plan falls back to the generic body.
        let plan = match self.storage.get_plan(&entry.session_id).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(session_id = %entry.session_id, error = %e, "plan lookup failed, sending generic email");
                None
            }
        };

        let to = Recipient {
            email: &entry.email,
            display_name: &entry.display_name,
            session_id: &entry.session_id,
            language,
        };
        let email = self
            .composer
            .drip_email(entry.email_type, entry.id, &to, plan.as_ref());
        self.transport.send(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::schedule_sequence;
    use async_trait::async_trait;
    use hearth_config::model::StorageConfig;
    use hearth_core::types::{AdapterType, HealthStatus, OutboundEmail};
    use hearth_core::{AssessmentSession, PluginAdapter, QueueStatus, SessionStatus};
    use hearth_storage::SqliteStorage;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundEmail>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl PluginAdapter for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Email
        }
        async fn health_check(&self) -> Result<HealthStatus, HearthError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), HearthError> {
            Ok(())
        }
    }

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError> {
            if self.fail_for.as_deref() == Some(email.to.as_str()) {
                return Err(HearthError::Email {
                    message: "mailbox unavailable".into(),
                    source: None,
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(email.idempotency_key.clone().unwrap_or_default())
        }
    }

    async fn setup(dir: &tempfile::TempDir) -> Arc<SqliteStorage> {
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("q.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        storage
            .create_session(&AssessmentSession {
                id: "s1".into(),
                user_id: "u1".into(),
                email: "ana@example.com".into(),
                display_name: "Ana".into(),
                status: SessionStatus::Complete,
                language: Language::Es,
                started_at: Utc::now(),
            })
            .await
            .unwrap();
        Arc::new(storage)
    }

    fn composer() -> EmailComposer {
        EmailComposer::new("Hearth", "reports@hearth.test", None, "https://hearth.test")
    }

    #[tokio::test]
    async fn sends_due_entries_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = setup(&dir).await;
        let now = Utc::now();
        schedule_sequence(storage.as_ref(), "u1", "s1", "ana@example.com", "Ana", now)
            .await
            .unwrap();

        let transport = Arc::new(RecordingTransport::default());
        let processor = QueueProcessor::new(storage.clone(), transport.clone(), composer());

        let summary = processor.run_once(now + Duration::days(8)).await.unwrap();
        assert_eq!(summary, ProcessSummary { claimed: 2, sent: 2, failed: 0 });

        let again = processor.run_once(now + Duration::days(8)).await.unwrap();
        assert_eq!(again.claimed, 0);

        let sent = transport.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        // Session language carries through and the missing plan gives a generic P.D.
        assert!(sent[0].html.contains("P.D."));
        let ids: Vec<_> = storage
            .list_emails(Some(QueueStatus::Sent))
            .await
            .unwrap()
            .iter()
            .map(|e| format!("<hearth-queue-{}@hearth.test>", e.id))
            .collect();
        for email in &sent {
            assert!(ids.contains(email.idempotency_key.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn failures_are_recorded_and_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let storage = setup(&dir).await;
        let now = Utc::now();
        schedule_sequence(storage.as_ref(), "u1", "s1", "ana@example.com", "Ana", now)
            .await
            .unwrap();

        let transport = Arc::new(RecordingTransport {
            fail_for: Some("ana@example.com".into()),
            ..Default::default()
        });
        let processor = QueueProcessor::new(storage.clone(), transport, composer());

        let summary = processor.run_once(now + Duration::days(4)).await.unwrap();
        assert_eq!(summary, ProcessSummary { claimed: 1, sent: 0, failed: 1 });

        let failed = storage.list_emails(Some(QueueStatus::Failed)).await.unwrap();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].error_message.as_deref().unwrap().contains("mailbox unavailable"));

        let later = processor.run_once(now + Duration::days(4)).await.unwrap();
        assert_eq!(later.claimed, 0);
    }

    #[tokio::test]
    async fn nothing_due_is_a_quiet_pass() {
        let dir = tempfile::tempdir().unwrap();
        let storage = setup(&dir).await;
        let processor = QueueProcessor::new(
            storage,
            Arc::new(RecordingTransport::default()),
            composer(),
        );
        assert_eq!(
            processor.run_once(Utc::now()).await.unwrap(),
            ProcessSummary::default()
        );
    }
}
