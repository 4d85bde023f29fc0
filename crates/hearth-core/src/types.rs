// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Hearth service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Pdf,
    Email,
}

/// Conversation language. Selects an entirely separate script per variant.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single immutable entry in a session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    /// Per-session monotonic ordering key assigned by the store.
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of an assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Complete,
    /// Stopped by the crisis gate. Accepts no further turns and never gets a report.
    Halted,
}

impl SessionStatus {
    /// Whether the session still accepts user turns.
    pub fn accepts_turns(self) -> bool {
        self == SessionStatus::Active
    }
}

/// One intake of the assessment for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub status: SessionStatus,
    pub language: Language,
    pub started_at: DateTime<Utc>,
}

/// The five delayed follow-up emails, in send order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmailType {
    PatternCheckIn,
    FirstWeek,
    Midpoint,
    FinalStretch,
    ThirtyDay,
}

impl EmailType {
    /// The drip sequence in schedule order.
    pub const SEQUENCE: [EmailType; 5] = [
        EmailType::PatternCheckIn,
        EmailType::FirstWeek,
        EmailType::Midpoint,
        EmailType::FinalStretch,
        EmailType::ThirtyDay,
    ];

    /// Days after scheduling at which this email becomes due.
    pub fn offset_days(self) -> i64 {
        match self {
            EmailType::PatternCheckIn => 3,
            EmailType::FirstWeek => 7,
            EmailType::Midpoint => 14,
            EmailType::FinalStretch => 21,
            EmailType::ThirtyDay => 30,
        }
    }
}

/// Delivery state of a queued email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    /// Claimed by a processor run; guards against concurrent double sends.
    Processing,
    Sent,
    Failed,
}

/// A delayed email waiting in the queue.
///
/// Carries only the identifiers needed to re-fetch the Plan at send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailQueueEntry {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    pub email: String,
    pub display_name: String,
    pub email_type: EmailType,
    pub scheduled_for: DateTime<Utc>,
    pub status: QueueStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A queue entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmailQueueEntry {
    pub user_id: String,
    pub session_id: String,
    pub email: String,
    pub display_name: String,
    pub email_type: EmailType,
    pub scheduled_for: DateTime<Utc>,
}

// --- Language model types ---

/// A message in a language model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: Role,
    pub content: String,
}

/// A single completion request to the language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// System instruction (phase script or extraction schema).
    pub system_prompt: String,
    /// Conversation messages in chronological order.
    pub messages: Vec<ProviderMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The plain-text reply of a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- PDF types ---

/// Page layout options forwarded to the PDF rendering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOptions {
    /// Paper format, e.g. "Letter" or "A4".
    pub format: String,
    pub margin_mm: u32,
    pub landscape: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            format: "Letter".to_string(),
            margin_mm: 15,
            landscape: false,
        }
    }
}

// --- Email types ---

/// A binary attachment on an outbound email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully composed email ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<EmailAttachment>,
    /// Stable key so downstream systems can detect duplicate deliveries.
    pub idempotency_key: Option<String>,
}
