// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hearth integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock language model with scripted replies
//! - [`MockEmailTransport`] - Captures outbound email instead of sending it
//! - [`MockPdfRenderer`] - Returns fixed PDF bytes, or fails on demand
//! - [`TestHarness`] - Temp SQLite database plus fully wired [`Services`](hearth_agent::Services)

pub mod harness;
pub mod mock_adapters;
pub mod mock_provider;

pub use harness::{plan_json, TestHarness, TestHarnessBuilder};
pub use mock_adapters::{MockEmailTransport, MockPdfRenderer, MOCK_PDF};
pub use mock_provider::MockProvider;
