// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hearth assessment service.

use thiserror::Error;

/// The primary error type used across all Hearth adapter traits and core operations.
#[derive(Debug, Error)]
pub enum HearthError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Language model errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// PDF rendering service errors.
    #[error("pdf rendering error: {message}")]
    Pdf {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound email transport errors.
    #[error("email error: {message}")]
    Email {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A duplicate operation is already in flight.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller supplied a request that cannot be honoured.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The assessment no longer accepts turns.
    #[error("assessment {session_id} is closed")]
    AssessmentClosed { session_id: String },

    /// Adapter health check failed.
    #[error("health check failed for {name}: {source}")]
    HealthCheckFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Returns true for upstream failures a caller may safely resubmit.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HearthError::Provider { .. }
                | HearthError::Pdf { .. }
                | HearthError::Email { .. }
                | HearthError::Timeout { .. }
        )
    }

    /// Shorthand for a storage error wrapping any error source.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HearthError::Storage {
            source: Box::new(err),
        }
    }
}
