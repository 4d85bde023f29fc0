// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PDF rendering service adapter trait.

use async_trait::async_trait;

use crate::error::HearthError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PageOptions;

/// Adapter for an HTML-to-PDF rendering service.
#[async_trait]
pub trait PdfRenderer: PluginAdapter {
    /// Renders an HTML document (with a per-page footer) into PDF bytes.
    async fn render(
        &self,
        html: &str,
        footer_html: &str,
        options: &PageOptions,
    ) -> Result<Vec<u8>, HearthError>;
}
