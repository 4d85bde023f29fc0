// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated typing for a reply that has already been generated.
//!
//! The reply is cut into space-delimited chunks that are emitted on a fixed
//! timer, followed by one completion event. The completion flag comes from the
//! engine and is never re-evaluated per chunk.
//!
//! Wire format, one frame per event:
//! ```text
//! data: {"content":"Hello "}
//!
//! data: {"isComplete":false,"protocolData":{"sessionId":"..","phase":"pattern","exchangeCount":2,"halted":false}}
//!
//! ```

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;

use crate::engine::EngineReply;

/// Session state reported on the completion event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolData {
    pub session_id: String,
    pub phase: String,
    pub exchange_count: u32,
    pub halted: bool,
}

/// One event of the client-facing stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Content {
        content: String,
    },
    Done {
        #[serde(rename = "isComplete")]
        is_complete: bool,
        #[serde(rename = "protocolData")]
        protocol_data: ProtocolData,
    },
}

impl StreamEvent {
    /// The JSON payload of the event.
    pub fn data(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The full `data: ...\n\n` frame.
    pub fn frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", self.data()?))
    }
}

/// Space-delimited chunks whose concatenation is exactly `reply`.
pub fn chunks(reply: &str) -> impl Iterator<Item = &str> {
    reply.split_inclusive(' ')
}

/// All events for a reply, in emission order.
pub fn reply_events(session_id: &str, reply: &EngineReply) -> Vec<StreamEvent> {
    let mut events: Vec<StreamEvent> = chunks(&reply.text)
        .map(|c| StreamEvent::Content {
            content: c.to_string(),
        })
        .collect();
    events.push(StreamEvent::Done {
        is_complete: reply.is_complete,
        protocol_data: ProtocolData {
            session_id: session_id.to_string(),
            phase: reply.phase.as_str().to_string(),
            exchange_count: reply.exchange_count,
            halted: reply.halted,
        },
    });
    events
}

/// Emits `events` one at a time, waiting `delay` before each.
///
/// Dropping the stream drops the pending timer with it.
pub fn paced(events: Vec<StreamEvent>, delay: Duration) -> impl Stream<Item = StreamEvent> {
    stream::iter(events).then(move |event| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        event
    })
}
