// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`HearthError`] to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hearth_core::HearthError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A handler failure, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub HearthError);

impl From<HearthError> for ApiError {
    fn from(e: HearthError) -> Self {
        Self(e)
    }
}

/// The status code a service error is reported with.
pub fn status_for(e: &HearthError) -> StatusCode {
    match e {
        HearthError::NotFound { .. } => StatusCode::NOT_FOUND,
        HearthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        HearthError::Conflict(_) | HearthError::AssessmentClosed { .. } => StatusCode::CONFLICT,
        HearthError::Provider { .. } | HearthError::Pdf { .. } | HearthError::Email { .. } => {
            StatusCode::BAD_GATEWAY
        }
        HearthError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        HearthError::Config(_)
        | HearthError::Storage { .. }
        | HearthError::HealthCheckFailed { .. }
        | HearthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_message() {
        let e = HearthError::NotFound {
            entity: "session",
            id: "s1".into(),
        };
        assert_eq!(status_for(&e), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&HearthError::AssessmentClosed {
                session_id: "s1".into()
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn upstream_failures_are_gateway_errors() {
        let e = HearthError::Provider {
            message: "overloaded".into(),
            source: None,
        };
        assert_eq!(status_for(&e), StatusCode::BAD_GATEWAY);
        let e = HearthError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert_eq!(status_for(&e), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let response = ApiError(HearthError::Internal("lock poisoned".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
