// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Hearth assessment service.
//!
//! Exposes the conversation, the report and the email queue over axum. All
//! work is delegated to [`hearth_agent::Services`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod sse;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{router, start_server, GatewayState, HealthState};
