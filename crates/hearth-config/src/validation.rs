// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and settings that only
//! become mandatory once a feature is enabled.

use crate::diagnostic::ConfigError;
use crate::model::HearthConfig;

/// Longest permitted gap between simulated-typing chunks.
const MAX_CHUNK_DELAY_MS: u64 = 1000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HearthConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.assessment.max_exchanges < 1 {
        fail("assessment.max_exchanges must be at least 1".to_string());
    }

    if config.assessment.transcript_char_budget == 0 {
        fail("assessment.transcript_char_budget must be greater than 0".to_string());
    }

    if config.assessment.stream_chunk_delay_ms > MAX_CHUNK_DELAY_MS {
        fail(format!(
            "assessment.stream_chunk_delay_ms must be at most {MAX_CHUNK_DELAY_MS}, got {}",
            config.assessment.stream_chunk_delay_ms
        ));
    }

    if config.anthropic.conversation_max_tokens == 0 || config.anthropic.extraction_max_tokens == 0
    {
        fail("anthropic max_tokens settings must be greater than 0".to_string());
    }

    if config.pdf.enabled
        && config
            .pdf
            .api_url
            .as_deref()
            .is_none_or(|u| u.trim().is_empty())
    {
        fail("pdf.api_url must be set when pdf.enabled = true".to_string());
    }

    if config.email.enabled {
        if config
            .email
            .smtp_host
            .as_deref()
            .is_none_or(|h| h.trim().is_empty())
        {
            fail("email.smtp_host must be set when email.enabled = true".to_string());
        }
        if !config.email.from_address.contains('@') {
            fail(format!(
                "email.from_address `{}` is not an email address",
                config.email.from_address
            ));
        }
        if let Some(reply_to) = &config.email.reply_to
            && !reply_to.contains('@')
        {
            fail(format!("email.reply_to `{reply_to}` is not an email address"));
        }
    }

    if !config.next_steps.contact_email.contains('@') {
        fail(format!(
            "next_steps.contact_email `{}` is not an email address",
            config.next_steps.contact_email
        ));
    }
    for (key, value) in [
        ("booking_url", &config.next_steps.booking_url),
        ("community_url", &config.next_steps.community_url),
    ] {
        if value.trim().is_empty() {
            fail(format!("next_steps.{key} must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the Anthropic API key from config, then `ANTHROPIC_API_KEY`.
pub fn resolve_anthropic_api_key(config: &HearthConfig) -> Option<String> {
    config
        .anthropic
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| {
            std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
        })
}
