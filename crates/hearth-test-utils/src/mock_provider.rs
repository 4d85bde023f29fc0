// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hearth_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use hearth_core::{HearthError, PluginAdapter, ProviderAdapter};

enum Scripted {
    Reply(String),
    Failure(String),
}

/// A mock provider that answers from a FIFO script.
///
/// When the script is empty, a default "mock response" text is returned.
/// Every request is captured for later inspection.
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| Scripted::Reply(r.into()))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a reply to the end of the script.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.script.lock().await.push_back(Scripted::Reply(text.into()));
    }

    /// Make the next scripted call fail with a provider error.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Failure(message.into()));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HearthError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HearthError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HearthError> {
        self.requests.lock().await.push(request.clone());
        let next = self.script.lock().await.pop_front();
        let content = match next {
            Some(Scripted::Reply(text)) => text,
            Some(Scripted::Failure(message)) => {
                return Err(HearthError::Provider {
                    message,
                    source: None,
                });
            }
            None => "mock response".to_string(),
        };
        Ok(ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content,
            model: request.model,
            stop_reason: Some("end_turn".to_string()),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: "script".to_string(),
            messages: vec![],
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::new();
        let resp = provider.complete(req()).await.unwrap();
        assert_eq!(resp.content, "mock response");
    }

    #[tokio::test]
    async fn queued_responses_returned_in_order() {
        let provider = MockProvider::with_responses(["first", "second"]);
        assert_eq!(provider.complete(req()).await.unwrap().content, "first");
        assert_eq!(provider.complete(req()).await.unwrap().content, "second");
        assert_eq!(
            provider.complete(req()).await.unwrap().content,
            "mock response"
        );
        assert_eq!(provider.request_count().await, 3);
    }

    #[tokio::test]
    async fn scripted_failure_is_a_provider_error() {
        let provider = MockProvider::new();
        provider.add_failure("overloaded").await;
        provider.add_response("recovered").await;
        assert!(matches!(
            provider.complete(req()).await,
            Err(HearthError::Provider { .. })
        ));
        assert_eq!(provider.complete(req()).await.unwrap().content, "recovered");
    }
}
