// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait covering the transcript, session, plan and email queue stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::HearthError;
use crate::plan::Plan;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    AssessmentSession, ConversationTurn, EmailQueueEntry, Language, NewEmailQueueEntry,
    QueueStatus, Role, SessionStatus,
};

/// Adapter for the persistence backend.
///
/// Transcript turns are append-only. Plans are insert-if-absent. Queue
/// entries move `pending -> processing -> sent|failed` exactly once.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), HearthError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), HearthError>;

    // --- Session store ---

    async fn create_session(&self, session: &AssessmentSession) -> Result<(), HearthError>;

    async fn get_session(&self, id: &str) -> Result<Option<AssessmentSession>, HearthError>;

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
    ) -> Result<(), HearthError>;

    async fn update_session_language(
        &self,
        id: &str,
        language: Language,
    ) -> Result<(), HearthError>;

    // --- Transcript store ---

    /// Appends a turn and returns it with its assigned sequence number.
    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<ConversationTurn, HearthError>;

    /// Lists the session's turns in sequence order.
    async fn list_turns(&self, session_id: &str) -> Result<Vec<ConversationTurn>, HearthError>;

    // --- Plan store ---

    async fn get_plan(&self, session_id: &str) -> Result<Option<Plan>, HearthError>;

    /// Stores the plan unless one already exists. Returns whether this call stored it.
    async fn put_plan(&self, session_id: &str, plan: &Plan) -> Result<bool, HearthError>;

    /// Atomically claims the right to generate a plan for the session.
    ///
    /// Returns `false` when another live claim exists. Claims older than
    /// `stale_after` are treated as abandoned and may be taken over.
    async fn claim_plan_generation(
        &self,
        session_id: &str,
        stale_after: chrono::Duration,
    ) -> Result<bool, HearthError>;

    async fn release_plan_claim(&self, session_id: &str) -> Result<(), HearthError>;

    /// Whether the report email for the session's plan has been sent.
    async fn report_delivered(&self, session_id: &str) -> Result<bool, HearthError>;

    /// Records that the report email was accepted by the transport.
    async fn mark_report_delivered(&self, session_id: &str) -> Result<(), HearthError>;

    // --- Email queue store ---

    /// Inserts the batch unless pending entries already exist for the same
    /// (user, session) pair. Returns whether the batch was inserted.
    async fn enqueue_emails_if_absent(
        &self,
        entries: &[NewEmailQueueEntry],
    ) -> Result<bool, HearthError>;

    /// Lists queue entries for a (user, session) pair.
    async fn list_emails_for_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<EmailQueueEntry>, HearthError>;

    /// Atomically moves every due entry from `pending` to `processing` and returns them.
    ///
    /// Entries stuck in `processing` longer than `stale_after` are reclaimed.
    async fn claim_due_emails(
        &self,
        now: DateTime<Utc>,
        stale_after: chrono::Duration,
    ) -> Result<Vec<EmailQueueEntry>, HearthError>;

    async fn mark_email_sent(&self, id: i64) -> Result<(), HearthError>;

    async fn mark_email_failed(&self, id: i64, error: &str) -> Result<(), HearthError>;

    /// Operator listing, optionally filtered by status.
    async fn list_emails(
        &self,
        status: Option<QueueStatus>,
    ) -> Result<Vec<EmailQueueEntry>, HearthError>;
}
