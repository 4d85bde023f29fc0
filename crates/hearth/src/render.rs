// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth render` command implementation.

use std::path::Path;

use hearth_core::HearthError;
use hearth_config::HearthConfig;
use hearth_report::Variant;
use tracing::info;

use crate::serve::build_services;

/// Renders the stored plan of `session_id` to `out`, or stdout.
pub async fn run_render(
    config: HearthConfig,
    session_id: &str,
    print: bool,
    out: Option<&Path>,
) -> Result<(), HearthError> {
    let variant = if print {
        Variant::Print
    } else {
        Variant::Interactive
    };
    let services = build_services(&config).await?;
    let html = services.reports.render_html(session_id, variant).await;
    services.shutdown().await;
    let html = html?;

    match out {
        Some(path) => {
            tokio::fs::write(path, html.as_bytes()).await.map_err(|e| {
                HearthError::Internal(format!("failed to write {}: {e}", path.display()))
            })?;
            info!(session_id, path = %path.display(), "report written");
        }
        None => println!("{html}"),
    }
    Ok(())
}
