// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the HTML-to-PDF conversion service.

use std::time::Duration;

use async_trait::async_trait;
use hearth_config::HearthConfig;
use hearth_core::types::{AdapterType, HealthStatus, PageOptions};
use hearth_core::{HearthError, PdfRenderer, PluginAdapter};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize)]
struct Footer<'a> {
    source: &'a str,
}

#[derive(Debug, Serialize)]
struct ConvertRequest<'a> {
    source: &'a str,
    footer: Footer<'a>,
    format: &'a str,
    margin: String,
    landscape: bool,
}

/// [`PdfRenderer`] backed by a hosted conversion API.
///
/// Authenticates with HTTP basic auth, user `api` and the key as password.
#[derive(Debug, Clone)]
pub struct HttpPdfRenderer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
}

impl HttpPdfRenderer {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Result<Self, HearthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HearthError::Pdf {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            timeout,
            max_retries: 1,
        })
    }

    /// Builds the renderer from `[pdf]`. Returns `None` when PDF output is disabled.
    pub fn from_config(config: &HearthConfig) -> Result<Option<Self>, HearthError> {
        if !config.pdf.enabled {
            return Ok(None);
        }
        let api_url = config
            .pdf
            .api_url
            .as_deref()
            .ok_or_else(|| HearthError::Config("pdf.api_url is not set".into()))?;
        let renderer = Self::new(
            api_url,
            config.pdf.api_key.as_deref().unwrap_or_default(),
            Duration::from_secs(config.pdf.timeout_secs),
        )?;
        info!(api_url, "PDF renderer initialized");
        Ok(Some(renderer))
    }

    fn map_send_err(&self, e: reqwest::Error) -> HearthError {
        if e.is_timeout() {
            HearthError::Timeout {
                duration: self.timeout,
            }
        } else {
            HearthError::Pdf {
                message: format!("PDF request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}

#[async_trait]
impl PluginAdapter for HttpPdfRenderer {
    fn name(&self) -> &str {
        "http-pdf"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Pdf
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        // Conversions are billed; never issue a test conversion.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        Ok(())
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(
        &self,
        html: &str,
        footer_html: &str,
        options: &PageOptions,
    ) -> Result<Vec<u8>, HearthError> {
        let body = ConvertRequest {
            source: html,
            footer: Footer {
                source: footer_html,
            },
            format: &options.format,
            margin: format!("{}mm", options.margin_mm),
            landscape: options.landscape,
        };

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .basic_auth("api", Some(&self.api_key))
                .json(&body)
                .send()
                .await
                .map_err(|e| self.map_send_err(e))?;

            let status = response.status();
            if status.is_success() {
                let bytes = response.bytes().await.map_err(|e| HearthError::Pdf {
                    message: format!("failed to read PDF body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                debug!(bytes = bytes.len(), attempt, "PDF rendered");
                return Ok(bytes.to_vec());
            }

            let text = response.text().await.unwrap_or_default();
            let error = HearthError::Pdf {
                message: format!("PDF service returned {status}: {text}"),
                source: None,
            };
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient PDF service error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| HearthError::Pdf {
            message: "PDF request failed after retries".into(),
            source: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn renderer(server: &MockServer) -> HttpPdfRenderer {
        HttpPdfRenderer::new(
            &format!("{}/v1/convert", server.uri()),
            "pdf-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn posts_document_and_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/convert"))
            .and(basic_auth("api", "pdf-key"))
            .and(body_partial_json(serde_json::json!({
                "source": "<html></html>",
                "footer": {"source": "<div>footer</div>"},
                "format": "Letter",
                "margin": "15mm",
                "landscape": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let bytes = renderer(&server)
            .render("<html></html>", "<div>footer</div>", &PageOptions::default())
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn retries_once_on_transient_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&server)
            .await;

        let bytes = renderer(&server)
            .render("<p>x</p>", "", &PageOptions::default())
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = renderer(&server)
            .render("<p>x</p>", "", &PageOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HearthError::Pdf { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn persistent_transient_error_fails_after_one_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529))
            .expect(2)
            .mount(&server)
            .await;

        let err = renderer(&server)
            .render("<p>x</p>", "", &PageOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("529"));
    }

    #[test]
    fn disabled_config_builds_nothing() {
        assert!(
            HttpPdfRenderer::from_config(&HearthConfig::default())
                .unwrap()
                .is_none()
        );
    }
}
