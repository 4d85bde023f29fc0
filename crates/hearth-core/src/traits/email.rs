// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound email transport adapter trait.

use async_trait::async_trait;

use crate::error::HearthError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundEmail;

/// Adapter for sending composed emails.
#[async_trait]
pub trait EmailTransport: PluginAdapter {
    /// Sends an email and returns the transport's message identifier.
    async fn send(&self, email: &OutboundEmail) -> Result<String, HearthError>;
}
