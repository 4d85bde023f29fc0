// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer of the Hearth assessment service.
//!
//! [`Services`] wires the adapters into the three workflows the gateway and
//! the CLI drive:
//! - [`ConversationService`] runs assessment turns
//! - [`ReportPipeline`] synthesizes, renders and delivers the report
//! - [`QueueProcessor`](hearth_email::QueueProcessor) sends due drip emails

pub mod conversation;
pub mod report;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use hearth_assessment::{ConversationEngine, EngineSettings, PlanSynthesizer, SynthesisSettings};
use hearth_config::HearthConfig;
use hearth_core::plan::NextSteps;
use hearth_core::types::PageOptions;
use hearth_core::{
    AdapterType, EmailTransport, HealthStatus, HearthError, PdfRenderer, ProviderAdapter,
    StorageAdapter,
};
use hearth_email::{EmailComposer, QueueProcessor};
use serde::Serialize;
use tracing::{info, warn};

pub use conversation::{ConversationService, NewSession, SessionView};
pub use report::{DeliveryReport, Generated, ReportPipeline};

/// The external collaborators, already constructed.
#[derive(Clone)]
pub struct Adapters {
    pub provider: Arc<dyn ProviderAdapter>,
    pub storage: Arc<dyn StorageAdapter>,
    pub pdf: Option<Arc<dyn PdfRenderer>>,
    pub transport: Arc<dyn EmailTransport>,
}

/// One adapter's line in the health report.
#[derive(Debug, Clone, Serialize)]
pub struct AdapterHealth {
    pub adapter: String,
    pub kind: AdapterType,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AdapterHealth {
    fn from_check(adapter: &str, kind: AdapterType, check: Result<HealthStatus, HearthError>) -> Self {
        let (status, detail) = match check {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(d)) => ("degraded", Some(d)),
            Ok(HealthStatus::Unhealthy(d)) => ("unhealthy", Some(d)),
            Err(e) => ("unhealthy", Some(e.to_string())),
        };
        Self {
            adapter: adapter.to_string(),
            kind,
            status,
            detail,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status != "unhealthy"
    }
}

pub struct Services {
    pub conversation: ConversationService,
    pub reports: ReportPipeline,
    pub queue: QueueProcessor,
    /// Gap between streamed reply chunks.
    pub stream_delay: Duration,
    adapters: Adapters,
}

impl Services {
    pub fn new(config: &HearthConfig, adapters: Adapters) -> Self {
        let engine = ConversationEngine::new(
            adapters.provider.clone(),
            EngineSettings {
                model: config.anthropic.conversation_model.clone(),
                max_tokens: config.anthropic.conversation_max_tokens,
                max_exchanges: config.assessment.max_exchanges,
            },
        );
        let synthesizer = PlanSynthesizer::new(
            adapters.provider.clone(),
            SynthesisSettings {
                model: config.anthropic.extraction_model.clone(),
                max_tokens: config.anthropic.extraction_max_tokens,
                transcript_char_budget: config.assessment.transcript_char_budget,
                next_steps: NextSteps {
                    contact_email: config.next_steps.contact_email.clone(),
                    booking_url: config.next_steps.booking_url.clone(),
                    community_url: config.next_steps.community_url.clone(),
                },
            },
        );
        let composer = EmailComposer::from_config(config);
        let page = PageOptions {
            format: config.pdf.page_format.clone(),
            ..PageOptions::default()
        };

        info!(
            pdf = adapters.pdf.is_some(),
            transport = adapters.transport.name(),
            "services assembled"
        );

        Self {
            conversation: ConversationService::new(adapters.storage.clone(), Arc::new(engine)),
            reports: ReportPipeline::new(
                adapters.storage.clone(),
                Arc::new(synthesizer),
                adapters.pdf.clone(),
                adapters.transport.clone(),
                composer.clone(),
                page,
            ),
            queue: QueueProcessor::new(
                adapters.storage.clone(),
                adapters.transport.clone(),
                composer,
            ),
            stream_delay: Duration::from_millis(config.assessment.stream_chunk_delay_ms),
            adapters,
        }
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapters.storage
    }

    /// Runs every adapter's health check.
    pub async fn health(&self) -> Vec<AdapterHealth> {
        let a = &self.adapters;
        let mut report = vec![
            AdapterHealth::from_check(a.storage.name(), a.storage.adapter_type(), a.storage.health_check().await),
            AdapterHealth::from_check(a.provider.name(), a.provider.adapter_type(), a.provider.health_check().await),
            AdapterHealth::from_check(a.transport.name(), a.transport.adapter_type(), a.transport.health_check().await),
        ];
        if let Some(pdf) = &a.pdf {
            report.push(AdapterHealth::from_check(pdf.name(), pdf.adapter_type(), pdf.health_check().await));
        }
        report
    }

    /// Shuts every adapter down, storage last.
    pub async fn shutdown(&self) {
        let a = &self.adapters;
        let mut results = vec![
            (a.provider.name().to_string(), a.provider.shutdown().await),
            (a.transport.name().to_string(), a.transport.shutdown().await),
        ];
        if let Some(pdf) = &a.pdf {
            results.push((pdf.name().to_string(), pdf.shutdown().await));
        }
        results.push((a.storage.name().to_string(), a.storage.shutdown().await));

        for (name, result) in results {
            if let Err(e) = result {
                warn!(adapter = %name, error = %e, "adapter shutdown failed");
            }
        }
        info!("adapters shut down");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hearth_config::model::StorageConfig;
    use hearth_core::types::{OutboundEmail, ProviderRequest, ProviderResponse, TokenUsage};
    use hearth_core::{
        AssessmentSession, Language, PluginAdapter, Role, SessionStatus,
    };
    use hearth_storage::SqliteStorage;
    use tempfile::TempDir;

    use super::*;

    macro_rules! plugin {
        ($ty:ty, $name:literal, $kind:expr) => {
            #[async_trait]
            impl PluginAdapter for $ty {
                fn name(&self) -> &str {
                    $name
                }
                fn version(&self) -> semver::Version {
                    semver::Version::new(0, 1, 0)
                }
                fn adapter_type(&self) -> AdapterType {
                    $kind
                }
                async fn health_check(&self) -> Result<HealthStatus, HearthError> {
                    Ok(HealthStatus::Healthy)
                }
                async fn shutdown(&self) -> Result<(), HearthError> {
                    Ok(())
                }
            }
        };
    }

    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        failure: Option<String>,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
                failure: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                failure: Some(message.to_string()),
                ..Self::new(Vec::<String>::new())
            }
        }

        pub fn requests(&self) -> Vec<ProviderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    plugin!(ScriptedProvider, "scripted", AdapterType::Provider);

    #[async_trait]
    impl ProviderAdapter for ScriptedProvider {
        async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(message) = &self.failure {
                return Err(HearthError::Provider {
                    message: message.clone(),
                    source: None,
                });
            }
            let content = self.replies.lock().unwrap().pop_front().ok_or_else(|| {
                HearthError::Provider {
                    message: "no scripted reply left".into(),
                    source: None,
                }
            })?;
            Ok(ProviderResponse {
                id: "msg_test".into(),
                content,
                model: request.model,
                stop_reason: Some("end_turn".into()),
                usage: TokenUsage::default(),
            })
        }
    }

    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<OutboundEmail>>,
    }

    impl RecordingTransport {
        pub fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    plugin!(RecordingTransport, "recording", AdapterType::Email);

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError> {
            self.sent.lock().unwrap().push(email.clone());
            Ok(email.idempotency_key.clone().unwrap_or_default())
        }
    }

    pub struct StaticPdf;
    plugin!(StaticPdf, "static-pdf", AdapterType::Pdf);

    #[async_trait]
    impl PdfRenderer for StaticPdf {
        async fn render(&self, _: &str, _: &str, _: &PageOptions) -> Result<Vec<u8>, HearthError> {
            Ok(b"%PDF-1.7 test".to_vec())
        }
    }

    pub struct FailingPdf;
    plugin!(FailingPdf, "failing-pdf", AdapterType::Pdf);

    #[async_trait]
    impl PdfRenderer for FailingPdf {
        async fn render(&self, _: &str, _: &str, _: &PageOptions) -> Result<Vec<u8>, HearthError> {
            Err(HearthError::Pdf {
                message: "service returned 500".into(),
                source: None,
            })
        }
    }

    pub async fn harness() -> (Arc<dyn StorageAdapter>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("agent.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (Arc::new(storage), dir)
    }

    /// Stores a session with a short transcript in the given status.
    pub async fn complete_session(
        storage: &dyn StorageAdapter,
        language: Language,
        status: SessionStatus,
    ) -> AssessmentSession {
        let session = AssessmentSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".into(),
            email: "ana@example.com".into(),
            display_name: "Ana".into(),
            status,
            language,
            started_at: chrono::Utc::now(),
        };
        storage.create_session(&session).await.unwrap();
        storage.append_turn(&session.id, Role::Assistant, "Welcome.").await.unwrap();
        storage.append_turn(&session.id, Role::User, "I run the line.").await.unwrap();
        session
    }

    #[tokio::test]
    async fn services_report_health_for_every_adapter() {
        let (storage, _dir) = harness().await;
        let services = Services::new(
            &HearthConfig::default(),
            Adapters {
                provider: Arc::new(ScriptedProvider::new(Vec::<String>::new())),
                storage,
                pdf: Some(Arc::new(StaticPdf)),
                transport: Arc::new(RecordingTransport::default()),
            },
        );
        let health = services.health().await;
        assert_eq!(health.len(), 4);
        assert!(health.iter().all(AdapterHealth::is_healthy));
        services.shutdown().await;
    }
}
