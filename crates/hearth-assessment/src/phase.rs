// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit assessment phases, derived from the count of user exchanges.
//!
//! The model still tracks its position through the authored script. The phase
//! computed here is handed to it as a stage note so both sides agree, and it
//! is what the wire protocol reports.

use std::fmt;

/// One of the four fixed life domains, in interview order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Identity,
    Craft,
    Purpose,
    Environment,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Identity,
        Domain::Craft,
        Domain::Purpose,
        Domain::Environment,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Domain::Identity => "identity",
            Domain::Craft => "craft",
            Domain::Purpose => "purpose",
            Domain::Environment => "environment",
        }
    }
}

/// Where the conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Intake,
    Pattern,
    Domain(Domain),
    Disclosure,
    Vision,
    Complete,
}

/// User exchanges spent on each domain block.
const EXCHANGES_PER_DOMAIN: u32 = 2;
const FIRST_DOMAIN_EXCHANGE: u32 = 3;
const DISCLOSURE_EXCHANGE: u32 = 11;

impl Phase {
    /// The phase for the next assistant reply after `exchanges` user answers.
    ///
    /// Never returns [`Phase::Complete`]; completion depends on the reply text
    /// and the exchange ceiling, see [`Phase::after_reply`].
    pub fn for_exchanges(exchanges: u32) -> Self {
        match exchanges {
            0 => Phase::Intake,
            1..=2 => Phase::Pattern,
            n if n < DISCLOSURE_EXCHANGE => {
                let idx = ((n - FIRST_DOMAIN_EXCHANGE) / EXCHANGES_PER_DOMAIN) as usize;
                Phase::Domain(Domain::ALL[idx])
            }
            DISCLOSURE_EXCHANGE => Phase::Disclosure,
            _ => Phase::Vision,
        }
    }

    /// The phase once a reply has been produced.
    pub fn after_reply(exchanges: u32, is_complete: bool) -> Self {
        if is_complete {
            Phase::Complete
        } else {
            Phase::for_exchanges(exchanges)
        }
    }

    /// Stable wire name, used in the stream protocol and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Intake => "intake",
            Phase::Pattern => "pattern",
            Phase::Domain(Domain::Identity) => "domain_identity",
            Phase::Domain(Domain::Craft) => "domain_craft",
            Phase::Domain(Domain::Purpose) => "domain_purpose",
            Phase::Domain(Domain::Environment) => "domain_environment",
            Phase::Disclosure => "disclosure",
            Phase::Vision => "vision",
            Phase::Complete => "complete",
        }
    }

    /// Label inserted into the stage note of the system instruction.
    pub fn stage_label(self) -> &'static str {
        match self {
            Phase::Intake => "STAGE 1 INTAKE",
            Phase::Pattern => "STAGE 2 PATTERN",
            Phase::Domain(Domain::Identity) => "STAGE 3 DOMAIN IDENTITY",
            Phase::Domain(Domain::Craft) => "STAGE 3 DOMAIN CRAFT",
            Phase::Domain(Domain::Purpose) => "STAGE 3 DOMAIN PURPOSE",
            Phase::Domain(Domain::Environment) => "STAGE 3 DOMAIN ENVIRONMENT",
            Phase::Disclosure => "STAGE 4 DISCLOSURE",
            Phase::Vision => "STAGE 5 VISION",
            Phase::Complete => "STAGE 6 HANDOFF",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
