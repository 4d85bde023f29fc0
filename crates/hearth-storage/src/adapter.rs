// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use hearth_config::model::StorageConfig;
use hearth_core::types::{
    AssessmentSession, ConversationTurn, EmailQueueEntry, Language, NewEmailQueueEntry,
    QueueStatus, Role, SessionStatus,
};
use hearth_core::{
    AdapterType, HealthStatus, HearthError, Plan, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, HearthError> {
        self.db.get().ok_or_else(|| HearthError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), HearthError> {
        self.db()?
            .connection()
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        if self.db.get().is_some() {
            self.checkpoint().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HearthError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| HearthError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HearthError> {
        self.checkpoint().await
    }

    // --- Session store ---

    async fn create_session(&self, session: &AssessmentSession) -> Result<(), HearthError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<AssessmentSession>, HearthError> {
        queries::sessions::get_session(self.db()?, id).await
    }

    async fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
    ) -> Result<(), HearthError> {
        queries::sessions::update_session_status(self.db()?, id, status).await
    }

    async fn update_session_language(
        &self,
        id: &str,
        language: Language,
    ) -> Result<(), HearthError> {
        queries::sessions::update_session_language(self.db()?, id, language).await
    }

    // --- Transcript store ---

    async fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<ConversationTurn, HearthError> {
        queries::turns::append_turn(self.db()?, session_id, role, content).await
    }

    async fn list_turns(&self, session_id: &str) -> Result<Vec<ConversationTurn>, HearthError> {
        queries::turns::list_turns(self.db()?, session_id).await
    }

    // --- Plan store ---

    async fn get_plan(&self, session_id: &str) -> Result<Option<Plan>, HearthError> {
        queries::plans::get_plan(self.db()?, session_id).await
    }

    async fn put_plan(&self, session_id: &str, plan: &Plan) -> Result<bool, HearthError> {
        queries::plans::put_plan(self.db()?, session_id, plan).await
    }

    async fn claim_plan_generation(
        &self,
        session_id: &str,
        stale_after: chrono::Duration,
    ) -> Result<bool, HearthError> {
        queries::plans::claim_plan_generation(self.db()?, session_id, stale_after).await
    }

    async fn release_plan_claim(&self, session_id: &str) -> Result<(), HearthError> {
        queries::plans::release_plan_claim(self.db()?, session_id).await
    }

    async fn report_delivered(&self, session_id: &str) -> Result<bool, HearthError> {
        queries::plans::report_delivered(self.db()?, session_id).await
    }

    async fn mark_report_delivered(&self, session_id: &str) -> Result<(), HearthError> {
        queries::plans::mark_report_delivered(self.db()?, session_id).await
    }

    // --- Email queue store ---

    async fn enqueue_emails_if_absent(
        &self,
        entries: &[NewEmailQueueEntry],
    ) -> Result<bool, HearthError> {
        queries::queue::enqueue_if_absent(self.db()?, entries).await
    }

    async fn list_emails_for_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<EmailQueueEntry>, HearthError> {
        queries::queue::list_for_session(self.db()?, user_id, session_id).await
    }

    async fn claim_due_emails(
        &self,
        now: DateTime<Utc>,
        stale_after: chrono::Duration,
    ) -> Result<Vec<EmailQueueEntry>, HearthError> {
        queries::queue::claim_due(self.db()?, now, stale_after).await
    }

    async fn mark_email_sent(&self, id: i64) -> Result<(), HearthError> {
        queries::queue::mark_sent(self.db()?, id).await
    }

    async fn mark_email_failed(&self, id: i64, error: &str) -> Result<(), HearthError> {
        queries::queue::mark_failed(self.db()?, id, error).await
    }

    async fn list_emails(
        &self,
        status: Option<QueueStatus>,
    ) -> Result<Vec<EmailQueueEntry>, HearthError> {
        queries::queue::list(self.db()?, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_reflects_initialization() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_assessment_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let session = AssessmentSession {
            id: "sess-adapter-1".to_string(),
            user_id: "user-1".to_string(),
            email: "cook@example.com".to_string(),
            display_name: "Sam".to_string(),
            status: SessionStatus::Active,
            language: Language::Es,
            started_at: Utc::now(),
        };
        storage.create_session(&session).await.unwrap();

        storage
            .append_turn("sess-adapter-1", Role::Assistant, "Bienvenido.")
            .await
            .unwrap();
        storage
            .append_turn("sess-adapter-1", Role::User, "Gracias")
            .await
            .unwrap();
        let turns = storage.list_turns("sess-adapter-1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].sequence, 2);

        storage
            .update_session_status("sess-adapter-1", SessionStatus::Complete)
            .await
            .unwrap();
        let updated = storage.get_session("sess-adapter-1").await.unwrap().unwrap();
        assert_eq!(updated.status, SessionStatus::Complete);
        assert_eq!(updated.language, Language::Es);

        let stale = chrono::Duration::minutes(10);
        assert!(storage.claim_plan_generation("sess-adapter-1", stale).await.unwrap());
        assert!(storage.put_plan("sess-adapter-1", &Plan::default()).await.unwrap());
        storage.release_plan_claim("sess-adapter-1").await.unwrap();
        assert!(storage.get_plan("sess-adapter-1").await.unwrap().is_some());

        storage.close().await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
