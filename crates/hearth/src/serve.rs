// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth serve` and `hearth process-queue`.
//!
//! Both assemble the same adapters: SQLite storage, the Anthropic provider,
//! the optional PDF service and the configured email transport.

use std::sync::Arc;

use chrono::Utc;
use hearth_agent::{shutdown, Adapters, Services};
use hearth_anthropic::AnthropicProvider;
use hearth_config::HearthConfig;
use hearth_core::{HearthError, PdfRenderer, StorageAdapter};
use hearth_email::transport_from_config;
use hearth_gateway::{start_server, GatewayState};
use hearth_report::HttpPdfRenderer;
use hearth_storage::SqliteStorage;
use tracing::{info, warn};

/// Builds every adapter from configuration and wires the services.
pub async fn build_services(config: &HearthConfig) -> Result<Arc<Services>, HearthError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

    let provider = Arc::new(AnthropicProvider::new(config)?);
    let pdf = HttpPdfRenderer::from_config(config)?
        .map(|renderer| Arc::new(renderer) as Arc<dyn PdfRenderer>);
    if pdf.is_none() {
        info!("PDF rendering disabled, report emails will carry a link only");
    }
    let transport = transport_from_config(config)?;

    Ok(Arc::new(Services::new(
        config,
        Adapters {
            provider,
            storage,
            pdf,
            transport,
        },
    )))
}

/// Runs the `hearth serve` command.
///
/// Serves until SIGINT or SIGTERM, lets in-flight requests finish, then
/// shuts the adapters down.
pub async fn run_serve(config: HearthConfig) -> Result<(), HearthError> {
    info!(name = %config.service.name, "starting hearth serve");

    let services = build_services(&config).await?;
    for adapter in services.health().await {
        if !adapter.is_healthy() {
            warn!(
                adapter = %adapter.adapter,
                detail = adapter.detail.as_deref().unwrap_or(""),
                "adapter unhealthy at startup"
            );
        }
    }

    let cancel = shutdown::install_signal_handler();
    let state = GatewayState::new(services.clone(), &config.gateway);
    let result = start_server(&config.gateway, state, cancel).await;

    services.shutdown().await;
    info!("hearth stopped");
    result
}

/// Runs the `hearth process-queue` command: one processor pass, for cron.
pub async fn run_process_queue(config: HearthConfig) -> Result<(), HearthError> {
    let services = build_services(&config).await?;
    let summary = services.queue.run_once(Utc::now()).await;
    services.shutdown().await;

    let summary = summary?;
    info!(
        claimed = summary.claimed,
        sent = summary.sent,
        failed = summary.failed,
        "queue pass finished"
    );
    let json = serde_json::to_string(&summary)
        .map_err(|e| HearthError::Internal(format!("failed to encode summary: {e}")))?;
    println!("{json}");
    Ok(())
}
