// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report delivery and the 30-day drip sequence.

pub mod compose;
pub mod queue;
pub mod schedule;
pub mod smtp;

pub use compose::{EmailComposer, Recipient, REPORT_FILENAME};
pub use queue::{ProcessSummary, QueueProcessor, STALE_CLAIM_MINUTES};
pub use schedule::{schedule_sequence, sequence_entries};
pub use smtp::{transport_from_config, LogTransport, SmtpTransport};
