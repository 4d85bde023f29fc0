// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language model adapter trait.

use async_trait::async_trait;

use crate::error::HearthError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for the underlying language model.
///
/// The service treats the model as a black box: one request in, one plain-text
/// reply out. Whether that text is valid JSON depends on the caller's mode.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError>;
}
