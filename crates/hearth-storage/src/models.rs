// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `hearth-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use hearth_core::types::{
    AssessmentSession, ConversationTurn, EmailQueueEntry, NewEmailQueueEntry,
};
pub use hearth_core::Plan;
