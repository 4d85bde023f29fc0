// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a [`Plan`](hearth_core::Plan) into a document.
//!
//! [`render`] produces the interactive web view or the print source;
//! [`HttpPdfRenderer`] converts the print source into PDF bytes.

pub mod format;
pub mod pdf;
pub mod render;

pub use pdf::HttpPdfRenderer;
pub use render::{format_date, render, render_footer, RenderOptions, Variant};
