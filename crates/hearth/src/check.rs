// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth check-config` command implementation.
//!
//! Configuration has already been loaded and validated by the time this
//! runs; the checks here cover what validation cannot see.

use std::time::{Duration, Instant};

use hearth_config::HearthConfig;
use hearth_core::types::HealthStatus;
use hearth_core::{HearthError, PluginAdapter, StorageAdapter};
use hearth_email::transport_from_config;
use hearth_report::HttpPdfRenderer;
use hearth_storage::SqliteStorage;

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, started: Instant, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: started.elapsed(),
        }
    }
}

/// Run the `hearth check-config` command.
pub async fn run_check_config(config: &HearthConfig) -> Result<(), HearthError> {
    let results = run_checks(config).await;

    println!();
    println!("  hearth check-config");
    println!("  {}", "-".repeat(50));
    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        println!(
            "    {tag} {:<12} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failed > 0 {
        return Err(HearthError::Config(format!("{failed} check(s) failed")));
    }
    Ok(())
}

pub async fn run_checks(config: &HearthConfig) -> Vec<CheckResult> {
    vec![
        CheckResult::new("config", Instant::now(), CheckStatus::Pass, "valid"),
        check_api_key(config),
        check_database(config).await,
        check_pdf(config),
        check_email(config).await,
    ]
}

fn check_api_key(config: &HearthConfig) -> CheckResult {
    let started = Instant::now();
    match hearth_config::resolve_anthropic_api_key(config) {
        Some(_) => CheckResult::new("anthropic", started, CheckStatus::Pass, "API key present"),
        None => CheckResult::new(
            "anthropic",
            started,
            CheckStatus::Fail,
            "no API key: set anthropic.api_key or ANTHROPIC_API_KEY",
        ),
    }
}

async fn check_database(config: &HearthConfig) -> CheckResult {
    let started = Instant::now();
    let storage = SqliteStorage::new(config.storage.clone());
    let outcome = match storage.initialize().await {
        Ok(()) => storage.health_check().await,
        Err(e) => Err(e),
    };
    let _ = storage.close().await;
    match outcome {
        Ok(_) => CheckResult::new(
            "database",
            started,
            CheckStatus::Pass,
            format!("{} (migrations applied)", config.storage.database_path),
        ),
        Err(e) => CheckResult::new("database", started, CheckStatus::Fail, e.to_string()),
    }
}

fn check_pdf(config: &HearthConfig) -> CheckResult {
    let started = Instant::now();
    match HttpPdfRenderer::from_config(config) {
        Ok(Some(_)) => CheckResult::new(
            "pdf",
            started,
            CheckStatus::Pass,
            format!(
                "{} ({})",
                config.pdf.api_url.as_deref().unwrap_or_default(),
                config.pdf.page_format
            ),
        ),
        Ok(None) => CheckResult::new(
            "pdf",
            started,
            CheckStatus::Warn,
            "disabled, report emails carry a link only",
        ),
        Err(e) => CheckResult::new("pdf", started, CheckStatus::Fail, e.to_string()),
    }
}

async fn check_email(config: &HearthConfig) -> CheckResult {
    let started = Instant::now();
    let transport = match transport_from_config(config) {
        Ok(transport) => transport,
        Err(e) => return CheckResult::new("email", started, CheckStatus::Fail, e.to_string()),
    };
    if !config.email.enabled {
        return CheckResult::new(
            "email",
            started,
            CheckStatus::Warn,
            "disabled, emails are logged instead of sent",
        );
    }
    match transport.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("email", started, CheckStatus::Pass, "SMTP relay reachable")
        }
        Ok(HealthStatus::Degraded(detail)) => {
            CheckResult::new("email", started, CheckStatus::Warn, detail)
        }
        Ok(HealthStatus::Unhealthy(detail)) => {
            CheckResult::new("email", started, CheckStatus::Fail, detail)
        }
        Err(e) => CheckResult::new("email", started, CheckStatus::Fail, e.to_string()),
    }
}
