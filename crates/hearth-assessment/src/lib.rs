// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation-to-plan core of Hearth.
//!
//! - [`engine`] drives the scripted interview, one model call per turn.
//! - [`stream`] turns a finished reply into paced client events.
//! - [`synthesizer`] extracts, repairs and validates the structured plan.
//! - [`selection`] picks the book and the drip-email postscripts.

pub mod engine;
pub mod fallback;
pub mod phase;
pub mod script;
pub mod selection;
pub mod stream;
pub mod synthesizer;

pub use engine::{ConversationEngine, EngineReply, EngineSettings};
pub use phase::{Domain, Phase};
pub use stream::{ProtocolData, StreamEvent};
pub use synthesizer::{PlanSynthesizer, Synthesis, SynthesisSettings, SynthesisSource};
