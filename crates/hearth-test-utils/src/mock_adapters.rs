// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock PDF and email adapters that capture what they are given.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use hearth_core::types::{AdapterType, HealthStatus, OutboundEmail, PageOptions};
use hearth_core::{EmailTransport, HearthError, PdfRenderer, PluginAdapter};

/// Bytes returned by [`MockPdfRenderer`].
pub const MOCK_PDF: &[u8] = b"%PDF-1.7 mock";

macro_rules! mock_plugin {
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

/// Records every email and answers with its idempotency key.
#[derive(Default)]
pub struct MockEmailTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

impl MockEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every send fails with an email error and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().await.clone()
    }
}

mock_plugin!(MockEmailTransport, "mock-email", AdapterType::Email);

#[async_trait]
impl EmailTransport for MockEmailTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HearthError::Email {
                message: format!("mock transport refused mail to {}", email.to),
                source: None,
            });
        }
        self.sent.lock().await.push(email.clone());
        Ok(email
            .idempotency_key
            .clone()
            .unwrap_or_else(|| format!("mock-{}", uuid::Uuid::new_v4())))
    }
}

/// Returns [`MOCK_PDF`] and keeps the HTML it was asked to render.
#[derive(Default)]
pub struct MockPdfRenderer {
    rendered: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockPdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// HTML documents rendered so far.
    pub async fn rendered(&self) -> Vec<String> {
        self.rendered.lock().await.clone()
    }
}

mock_plugin!(MockPdfRenderer, "mock-pdf", AdapterType::Pdf);

#[async_trait]
impl PdfRenderer for MockPdfRenderer {
    async fn render(
        &self,
        html: &str,
        _footer_html: &str,
        _page: &PageOptions,
    ) -> Result<Vec<u8>, HearthError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HearthError::Pdf {
                message: "mock renderer returned 500".into(),
                source: None,
            });
        }
        self.rendered.lock().await.push(html.to_string());
        Ok(MOCK_PDF.to_vec())
    }
}
