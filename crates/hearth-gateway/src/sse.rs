// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events for `POST /v1/sessions/{id}/messages`.
//!
//! The reply is generated and stored before the stream opens, so a model
//! failure surfaces as an ordinary error status rather than a broken stream.
//! Each event is one `data:` frame with no event name.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, Sse};
use futures::stream::{Stream, StreamExt};
use hearth_assessment::stream::{paced, reply_events};
use hearth_assessment::EngineReply;

/// Streams the reply chunk by chunk, then its completion event.
pub fn reply_stream(
    session_id: &str,
    reply: &EngineReply,
    delay: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let events = reply_events(session_id, reply);
    let stream = paced(events, delay).filter_map(|event| async move {
        match event.data() {
            Ok(data) => Some(Ok(Event::default().data(data))),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize stream event");
                None
            }
        }
    });
    Sse::new(stream)
}
