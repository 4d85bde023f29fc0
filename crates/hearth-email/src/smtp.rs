// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email transports: SMTP via `lettre`, and a log-only stand-in.

use std::sync::Arc;

use async_trait::async_trait;
use hearth_config::HearthConfig;
use hearth_core::types::{AdapterType, HealthStatus, OutboundEmail};
use hearth_core::{EmailTransport, HearthError, PluginAdapter};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

fn email_err(message: impl Into<String>) -> impl FnOnce(lettre::error::Error) -> HearthError {
    let message = message.into();
    move |e| HearthError::Email {
        message: format!("{message}: {e}"),
        source: Some(Box::new(e)),
    }
}

fn mailbox(field: &str, value: &str) -> Result<Mailbox, HearthError> {
    value.parse().map_err(|e: lettre::address::AddressError| HearthError::Email {
        message: format!("invalid {field} address `{value}`: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Converts an [`OutboundEmail`] into a MIME message.
pub fn build_message(email: &OutboundEmail) -> Result<Message, HearthError> {
    let mut builder = Message::builder()
        .from(mailbox("from", &email.from)?)
        .to(mailbox("to", &email.to)?)
        .subject(email.subject.clone())
        .message_id(email.idempotency_key.clone());
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(mailbox("reply-to", reply_to)?);
    }

    let html = SinglePart::builder()
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone());

    if email.attachments.is_empty() {
        return builder
            .singlepart(html)
            .map_err(email_err("failed to build email message"));
    }

    let mut mixed = MultiPart::mixed().singlepart(html);
    for attachment in &email.attachments {
        let content_type =
            ContentType::parse(&attachment.content_type).map_err(|e| HearthError::Email {
                message: format!(
                    "invalid attachment content type `{}`: {e}",
                    attachment.content_type
                ),
                source: None,
            })?;
        mixed = mixed.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.bytes.clone(), content_type),
        );
    }
    builder
        .multipart(mixed)
        .map_err(email_err("failed to build email message"))
}

/// Sends through an SMTP relay with STARTTLS.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpTransport {
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
    ) -> Result<Self, HearthError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| HearthError::Email {
                message: format!("failed to create SMTP transport for {host}: {e}"),
                source: Some(Box::new(e)),
            })?
            .port(port);
        if let Some((user, pass)) = credentials {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            mailer: builder.build(),
            host: host.to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SmtpTransport {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Email
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        match self.mailer.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded(format!(
                "SMTP relay {} did not accept the connection",
                self.host
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "SMTP relay {} unreachable: {e}",
                self.host
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        Ok(())
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError> {
        let message = build_message(email)?;
        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| HearthError::Email {
                message: format!("SMTP send to {} failed: {e}", email.to),
                source: Some(Box::new(e)),
            })?;
        let id = email
            .idempotency_key
            .clone()
            .unwrap_or_else(|| response.code().to_string());
        info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(id)
    }
}

/// Logs emails instead of sending them. Used when `[email] enabled = false`.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl PluginAdapter for LogTransport {
    fn name(&self) -> &str {
        "log"
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
impl EmailTransport for LogTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError> {
        // Catch malformed addresses even when nothing is sent.
        build_message(email)?;
        info!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "email delivery disabled, logging instead of sending"
        );
        Ok(email
            .idempotency_key
            .clone()
            .unwrap_or_else(|| "logged".to_string()))
    }
}

/// Picks the transport `[email]` asks for.
pub fn transport_from_config(config: &HearthConfig) -> Result<Arc<dyn EmailTransport>, HearthError> {
    if !config.email.enabled {
        debug!("email disabled, using log transport");
        return Ok(Arc::new(LogTransport));
    }
    let host = config
        .email
        .smtp_host
        .as_deref()
        .ok_or_else(|| HearthError::Config("email.smtp_host is not set".into()))?;
    let credentials = config
        .email
        .smtp_username
        .clone()
        .zip(config.email.smtp_password.clone());
    let transport = SmtpTransport::new(host, config.email.smtp_port, credentials)?;
    info!(host, port = config.email.smtp_port, "SMTP transport initialized");
    Ok(Arc::new(transport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::types::EmailAttachment;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "Hearth <reports@hearth.test>".into(),
            to: "ana@example.com".into(),
            reply_to: Some("care@hearth.test".into()),
            subject: "Tu reporte".into(),
            html: "<p>Hola</p>".into(),
            attachments: Vec::new(),
            idempotency_key: Some("<hearth-queue-7@hearth.test>".into()),
        }
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn message_carries_headers_and_id() {
        let text = formatted(&build_message(&email()).unwrap());
        assert!(text.contains("Message-ID: <hearth-queue-7@hearth.test>"));
        assert!(text.contains("Reply-To: care@hearth.test"));
        assert!(text.contains("Content-Type: text/html"));
    }

    #[test]
    fn attachments_make_a_mixed_message() {
        let mut e = email();
        e.attachments.push(EmailAttachment {
            filename: "hearth-report.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.7".to_vec(),
        });
        let text = formatted(&build_message(&e).unwrap());
        assert!(text.contains("multipart/mixed"));
        assert!(text.contains("filename=\"hearth-report.pdf\""));
    }

    #[test]
    fn bad_recipient_is_an_email_error() {
        let mut e = email();
        e.to = "not an address".into();
        assert!(matches!(
            build_message(&e),
            Err(HearthError::Email { .. })
        ));
    }

    #[tokio::test]
    async fn log_transport_returns_message_id() {
        let id = LogTransport.send(&email()).await.unwrap();
        assert_eq!(id, "<hearth-queue-7@hearth.test>");
    }

    #[test]
    fn disabled_config_uses_log_transport() {
        let transport = transport_from_config(&HearthConfig::default()).unwrap();
        assert_eq!(transport.name(), "log");
    }

    #[tokio::test]
    async fn enabled_config_builds_smtp_transport() {
        let mut config = HearthConfig::default();
        config.email.enabled = true;
        config.email.smtp_host = Some("smtp.example.com".into());
        config.email.smtp_username = Some("user".into());
        config.email.smtp_password = Some("pass".into());
        let transport = transport_from_config(&config).unwrap();
        assert_eq!(transport.name(), "smtp");
    }
}
