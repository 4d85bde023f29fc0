// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for the Hearth assessment service.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API.
//! Each call is a single non-streaming completion; simulated typing on the
//! client side is produced downstream from the finished reply.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use hearth_config::HearthConfig;
use hearth_core::error::HearthError;
use hearth_core::traits::{PluginAdapter, ProviderAdapter};
use hearth_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest, ResponseContentBlock};

/// Anthropic Claude provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the given configuration.
    pub fn new(config: &HearthConfig) -> Result<Self, HearthError> {
        let api_key = hearth_config::resolve_anthropic_api_key(config).ok_or_else(|| {
            HearthError::Config(
                "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
            )
        })?;

        let client = AnthropicClient::new(
            &api_key,
            &config.anthropic.api_version,
            Duration::from_secs(config.anthropic.timeout_secs),
        )?;

        info!(
            conversation_model = config.anthropic.conversation_model,
            extraction_model = config.anthropic.extraction_model,
            "Anthropic provider initialized"
        );

        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: AnthropicClient) -> Self {
        Self { client }
    }

    /// Converts a [`ProviderRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(request: &ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            system: (!request.system_prompt.is_empty()).then(|| request.system_prompt.clone()),
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        // No API call here; health checks must not consume tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError> {
        let api_request = Self::to_message_request(&request);
        let response = self.client.complete_message(&api_request).await?;

        let content = response
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "completion finished"
        );

        Ok(ProviderResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}
