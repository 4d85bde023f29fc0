// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Hearth's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod email;
pub mod pdf;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use email::EmailTransport;
pub use pdf::PdfRenderer;
pub use provider::ProviderAdapter;
pub use storage::StorageAdapter;
