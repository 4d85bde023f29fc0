// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hearth assessment service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Hearth configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HearthConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Conversation and synthesis tuning.
    #[serde(default)]
    pub assessment: AssessmentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// HTML-to-PDF rendering service settings.
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Outbound SMTP settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Contact details and links printed at the end of every report.
    #[serde(default)]
    pub next_steps: NextStepsConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in report headers and email sender names.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Externally reachable base URL, used for report links in emails.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_service_name() -> String {
    "Hearth".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Model used for conversation turns.
    #[serde(default = "default_model")]
    pub conversation_model: String,

    /// Model used for plan extraction.
    #[serde(default = "default_model")]
    pub extraction_model: String,

    /// Reply ceiling for a conversation turn.
    #[serde(default = "default_conversation_max_tokens")]
    pub conversation_max_tokens: u32,

    /// Reply ceiling for plan extraction.
    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,

    /// Upper bound on a single model call.
    #[serde(default = "default_anthropic_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            conversation_model: default_model(),
            extraction_model: default_model(),
            conversation_max_tokens: default_conversation_max_tokens(),
            extraction_max_tokens: default_extraction_max_tokens(),
            timeout_secs: default_anthropic_timeout_secs(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_conversation_max_tokens() -> u32 {
    600
}

fn default_extraction_max_tokens() -> u32 {
    8000
}

fn default_anthropic_timeout_secs() -> u64 {
    120
}

/// Conversation and synthesis tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentConfig {
    /// User exchanges after which the assessment completes regardless of model output.
    #[serde(default = "default_max_exchanges")]
    pub max_exchanges: u32,

    /// Maximum characters of transcript sent to plan extraction.
    #[serde(default = "default_transcript_char_budget")]
    pub transcript_char_budget: usize,

    /// Delay between simulated-typing chunks on the event stream.
    #[serde(default = "default_stream_chunk_delay_ms")]
    pub stream_chunk_delay_ms: u64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            max_exchanges: default_max_exchanges(),
            transcript_char_budget: default_transcript_char_budget(),
            stream_chunk_delay_ms: default_stream_chunk_delay_ms(),
        }
    }
}

fn default_max_exchanges() -> u32 {
    15
}

fn default_transcript_char_budget() -> usize {
    60_000
}

fn default_stream_chunk_delay_ms() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("hearth").join("hearth.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("hearth.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token protecting operator routes. `None` rejects them all.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// HTML-to-PDF rendering service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PdfConfig {
    /// When disabled, report emails carry a link instead of an attachment.
    #[serde(default)]
    pub enabled: bool,

    /// Conversion endpoint of the rendering service.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Rendering service API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Paper format passed to the service.
    #[serde(default = "default_page_format")]
    pub page_format: String,

    /// Upper bound on a single render call.
    #[serde(default = "default_pdf_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: None,
            api_key: None,
            page_format: default_page_format(),
            timeout_secs: default_pdf_timeout_secs(),
        }
    }
}

fn default_page_format() -> String {
    "Letter".to_string()
}

fn default_pdf_timeout_secs() -> u64 {
    60
}

/// Outbound SMTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// When disabled, emails are logged instead of sent.
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP relay port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Sender display name.
    #[serde(default = "default_service_name")]
    pub from_name: String,

    #[serde(default)]
    pub reply_to: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: default_from_address(),
            from_name: default_service_name(),
            reply_to: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "reports@hearth.local".to_string()
}

/// Contact details and links printed at the end of every report.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NextStepsConfig {
    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    #[serde(default = "default_booking_url")]
    pub booking_url: String,

    #[serde(default = "default_community_url")]
    pub community_url: String,
}

impl Default for NextStepsConfig {
    fn default() -> Self {
        Self {
            contact_email: default_contact_email(),
            booking_url: default_booking_url(),
            community_url: default_community_url(),
        }
    }
}

fn default_contact_email() -> String {
    "hello@hearth.local".to_string()
}

fn default_booking_url() -> String {
    "https://hearth.local/book".to_string()
}

fn default_community_url() -> String {
    "https://hearth.local/community".to_string()
}
