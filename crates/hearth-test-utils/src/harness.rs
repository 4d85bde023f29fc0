// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full service stack over mock adapters and a
//! temp SQLite database.

use std::sync::Arc;

use hearth_agent::{Adapters, Services};
use hearth_assessment::fallback;
use hearth_config::model::StorageConfig;
use hearth_config::HearthConfig;
use hearth_core::plan::NextSteps;
use hearth_core::{
    AssessmentSession, HearthError, Language, PdfRenderer, Role, SessionStatus, StorageAdapter,
};
use hearth_storage::SqliteStorage;

use crate::mock_adapters::{MockEmailTransport, MockPdfRenderer};
use crate::mock_provider::MockProvider;

/// A complete, valid plan as the extraction model would return it.
pub fn plan_json(language: Language) -> String {
    let mut plan = fallback::default_plan(language, &NextSteps::default());
    plan.kitchen_term = "the pass".into();
    plan.next_steps = NextSteps::default();
    serde_json::to_string(&plan).unwrap_or_default()
}

type Configure = Box<dyn FnOnce(&mut HearthConfig) + Send>;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    pdf: bool,
    configure: Option<Configure>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            pdf: true,
            configure: None,
        }
    }

    /// Set scripted model replies.
    pub fn with_mock_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// Build without a PDF renderer, as when `[pdf] enabled = false`.
    pub fn without_pdf(mut self) -> Self {
        self.pdf = false;
        self
    }

    /// Adjust the configuration before services are assembled.
    pub fn with_config(mut self, f: impl FnOnce(&mut HearthConfig) + Send + 'static) -> Self {
        self.configure = Some(Box::new(f));
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, HearthError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HearthError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = HearthConfig::default();
        config.assessment.stream_chunk_delay_ms = 0;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        if let Some(configure) = self.configure {
            configure(&mut config);
        }

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let provider = Arc::new(MockProvider::with_responses(self.responses));
        let email = Arc::new(MockEmailTransport::new());
        let pdf = Arc::new(MockPdfRenderer::new());

        let services = Services::new(
            &config,
            Adapters {
                provider: provider.clone(),
                storage: storage.clone(),
                pdf: self
                    .pdf
                    .then(|| pdf.clone() as Arc<dyn PdfRenderer>),
                transport: email.clone(),
            },
        );

        Ok(TestHarness {
            services: Arc::new(services),
            provider,
            email,
            pdf,
            storage,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired service stack for integration tests.
pub struct TestHarness {
    pub services: Arc<Services>,
    pub provider: Arc<MockProvider>,
    pub email: Arc<MockEmailTransport>,
    pub pdf: Arc<MockPdfRenderer>,
    pub storage: Arc<dyn StorageAdapter>,
    pub config: HearthConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Opens a session for `ana@example.com`.
    pub async fn create_session(&self, language: Language) -> Result<AssessmentSession, HearthError> {
        self.services
            .conversation
            .create_session(hearth_agent::NewSession {
                user_id: "user-1".into(),
                email: "ana@example.com".into(),
                display_name: "Ana Ruiz".into(),
                language,
            })
            .await
    }

    /// Stores a finished assessment directly, bypassing the model.
    pub async fn completed_session(&self, language: Language) -> Result<AssessmentSession, HearthError> {
        let mut session = self.create_session(language).await?;
        for (role, text) in [
            (Role::Assistant, "Tell me about your kitchen."),
            (Role::User, "I run the line at a busy bistro."),
            (Role::Assistant, "ASSESSMENT COMPLETE"),
        ] {
            self.storage.append_turn(&session.id, role, text).await?;
        }
        self.storage
            .update_session_status(&session.id, SessionStatus::Complete)
            .await?;
        session.status = SessionStatus::Complete;
        Ok(session)
    }
}
