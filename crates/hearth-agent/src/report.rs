// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! From a completed session to a stored plan, a rendered report and the
//! emails that follow it.
//!
//! Generation is guarded twice: an existing plan is returned as-is, and the
//! storage-level claim keeps two processes from synthesizing at once. The
//! claim is released on every path, including synthesis failure, so a
//! failed generation is safely retryable.

use std::sync::Arc;

use chrono::{Duration, Utc};
use hearth_assessment::PlanSynthesizer;
use hearth_core::types::PageOptions;
use hearth_core::{
    AssessmentSession, EmailTransport, HearthError, PdfRenderer, Plan, SessionStatus,
    StorageAdapter,
};
use hearth_email::{schedule_sequence, EmailComposer, Recipient};
use hearth_report::{render, render_footer, RenderOptions, Variant};
use serde::Serialize;
use tracing::{info, warn};

/// Age after which an unreleased generation claim may be taken over.
pub const STALE_GENERATION_MINUTES: i64 = 10;

/// Result of [`ReportPipeline::generate`].
#[derive(Debug, Clone)]
pub enum Generated {
    /// This call synthesized and stored the plan.
    Created(Plan),
    /// A plan already existed.
    Existing(Plan),
}

impl Generated {
    pub fn plan(&self) -> &Plan {
        match self {
            Generated::Created(plan) | Generated::Existing(plan) => plan,
        }
    }

    pub fn into_plan(self) -> Plan {
        match self {
            Generated::Created(plan) | Generated::Existing(plan) => plan,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Generated::Created(_))
    }
}

/// What [`ReportPipeline::deliver`] managed to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Transport id of the report email.
    pub message_id: String,
    pub pdf_attached: bool,
    pub sequence_scheduled: bool,
}

pub struct ReportPipeline {
    storage: Arc<dyn StorageAdapter>,
    synthesizer: Arc<PlanSynthesizer>,
    pdf: Option<Arc<dyn PdfRenderer>>,
    transport: Arc<dyn EmailTransport>,
    composer: EmailComposer,
    page: PageOptions,
}

impl ReportPipeline {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        synthesizer: Arc<PlanSynthesizer>,
        pdf: Option<Arc<dyn PdfRenderer>>,
        transport: Arc<dyn EmailTransport>,
        composer: EmailComposer,
        page: PageOptions,
    ) -> Self {
        Self {
            storage,
            synthesizer,
            pdf,
            transport,
            composer,
            page,
        }
    }

    async fn session(&self, session_id: &str) -> Result<AssessmentSession, HearthError> {
        self.storage
            .get_session(session_id)
            .await?
            .ok_or_else(|| HearthError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })
    }

    async fn stored_plan(&self, session_id: &str) -> Result<Plan, HearthError> {
        self.storage
            .get_plan(session_id)
            .await?
            .ok_or_else(|| HearthError::NotFound {
                entity: "plan",
                id: session_id.to_string(),
            })
    }

    /// Returns the session's plan, synthesizing it on first call.
    ///
    /// Fails with `InvalidInput` unless the session is complete, and with
    /// `Conflict` while another generation holds the claim.
    pub async fn generate(&self, session_id: &str) -> Result<Generated, HearthError> {
        let session = self.session(session_id).await?;
        if session.status != SessionStatus::Complete {
            return Err(HearthError::InvalidInput(format!(
                "session {session_id} is {}, not complete",
                session.status
            )));
        }

        if let Some(plan) = self.storage.get_plan(session_id).await? {
            return Ok(Generated::Existing(plan));
        }

        let acquired = self
            .storage
            .claim_plan_generation(session_id, Duration::minutes(STALE_GENERATION_MINUTES))
            .await?;
        if !acquired {
            return Err(HearthError::Conflict(format!(
                "report generation already in progress for session {session_id}"
            )));
        }

        let outcome = self.synthesize_and_store(&session).await;
        if let Err(e) = self.storage.release_plan_claim(session_id).await {
            warn!(session_id, error = %e, "failed to release generation claim");
        }
        outcome
    }

    async fn synthesize_and_store(
        &self,
        session: &AssessmentSession,
    ) -> Result<Generated, HearthError> {
        let turns = self.storage.list_turns(&session.id).await?;
        let synthesis = self
            .synthesizer
            .synthesize(&session.id, &turns, session.language)
            .await?;

        if self.storage.put_plan(&session.id, &synthesis.plan).await? {
            info!(session_id = %session.id, source = synthesis.source.as_str(), "plan stored");
            Ok(Generated::Created(synthesis.plan))
        } else {
            // Lost a race with a stale-claim takeover; the first plan wins.
            self.stored_plan(&session.id).await.map(Generated::Existing)
        }
    }

    /// Renders the stored plan as HTML.
    pub async fn render_html(&self, session_id: &str, variant: Variant) -> Result<String, HearthError> {
        let session = self.session(session_id).await?;
        let plan = self.stored_plan(session_id).await?;
        Ok(render(
            &plan,
            &session.display_name,
            session.started_at.date_naive(),
            &RenderOptions {
                variant,
                language: session.language,
            },
        ))
    }

    async fn pdf_for(&self, session: &AssessmentSession, plan: &Plan) -> Result<Vec<u8>, HearthError> {
        let renderer = self.pdf.as_ref().ok_or_else(|| HearthError::Pdf {
            message: "PDF rendering is disabled".into(),
            source: None,
        })?;
        let date = session.started_at.date_naive();
        let html = render(
            plan,
            &session.display_name,
            date,
            &RenderOptions {
                variant: Variant::Print,
                language: session.language,
            },
        );
        let footer = render_footer(&session.display_name, date, session.language);
        renderer.render(&html, &footer, &self.page).await
    }

    /// Renders the stored plan to PDF bytes.
    pub async fn render_pdf(&self, session_id: &str) -> Result<Vec<u8>, HearthError> {
        let session = self.session(session_id).await?;
        let plan = self.stored_plan(session_id).await?;
        self.pdf_for(&session, &plan).await
    }

    /// Sends the report email and schedules the drip sequence.
    ///
    /// A PDF failure falls back to a link. A send failure is returned after
    /// the sequence has been scheduled, so a retry only repeats the email.
    /// A successful send is recorded against the plan.
    pub async fn deliver(&self, session_id: &str, plan: &Plan) -> Result<DeliveryReport, HearthError> {
        let session = self.session(session_id).await?;

        let pdf = if self.pdf.is_some() {
            match self.pdf_for(&session, plan).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(session_id, error = %e, "PDF rendering failed, sending report link instead");
                    None
                }
            }
        } else {
            None
        };
        let pdf_attached = pdf.is_some();

        let to = Recipient {
            email: &session.email,
            display_name: &session.display_name,
            session_id: &session.id,
            language: session.language,
        };
        let email = self.composer.report_email(&to, Some(plan), pdf);
        let sent = self.transport.send(&email).await;

        let pending = schedule_sequence(
            self.storage.as_ref(),
            &session.user_id,
            &session.id,
            &session.email,
            &session.display_name,
            Utc::now(),
        )
        .await?;

        let message_id = sent?;
        if let Err(e) = self.storage.mark_report_delivered(session_id).await {
            warn!(session_id, error = %e, "failed to record report delivery");
        }
        info!(
            session_id,
            message_id = %message_id,
            pdf_attached,
            pending = pending.len(),
            "report delivered"
        );
        Ok(DeliveryReport {
            message_id,
            pdf_attached,
            sequence_scheduled: !pending.is_empty(),
        })
    }

    /// Generates if needed, then delivers unless the report email already
    /// went out.
    ///
    /// An existing plan whose delivery failed or was interrupted is delivered
    /// on the next call. The report Message-ID is the same on every attempt.
    pub async fn generate_and_deliver(
        &self,
        session_id: &str,
    ) -> Result<(Generated, Option<DeliveryReport>), HearthError> {
        let generated = self.generate(session_id).await?;
        let delivered = !generated.is_new() && self.storage.report_delivered(session_id).await?;
        let delivery = if delivered {
            None
        } else {
            Some(self.deliver(session_id, generated.plan()).await?)
        };
        Ok((generated, delivery))
    }
}
