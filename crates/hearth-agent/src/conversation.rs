// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle around the conversation engine.
//!
//! A turn is: persist the user's answer, ask the engine for the reply,
//! persist the reply, then move the session to `complete` or `halted` when
//! the reply says so. A failed model call leaves the user's answer stored;
//! the client retries without content or by resubmitting the same answer.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use hearth_assessment::engine::exchange_count;
use hearth_assessment::{ConversationEngine, EngineReply, Phase};
use hearth_core::{
    AssessmentSession, ConversationTurn, HearthError, Language, Role, SessionStatus,
    StorageAdapter,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Request to open a new assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub language: Language,
}

/// A session with its derived progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: AssessmentSession,
    pub phase: String,
    pub exchange_count: u32,
}

/// Turns on the same session are serialized: a second concurrent turn is a conflict.
#[derive(Default)]
struct InFlight(Mutex<HashSet<String>>);

struct TurnGuard<'a> {
    set: &'a InFlight,
    session_id: String,
}

impl InFlight {
    fn enter(&self, session_id: &str) -> Result<TurnGuard<'_>, HearthError> {
        let mut set = self
            .0
            .lock()
            .map_err(|_| HearthError::Internal("turn registry poisoned".into()))?;
        if !set.insert(session_id.to_string()) {
            return Err(HearthError::Conflict(format!(
                "a turn is already in progress for session {session_id}"
            )));
        }
        Ok(TurnGuard {
            set: self,
            session_id: session_id.to_string(),
        })
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.0.lock() {
            set.remove(&self.session_id);
        }
    }
}

pub struct ConversationService {
    storage: Arc<dyn StorageAdapter>,
    engine: Arc<ConversationEngine>,
    in_flight: InFlight,
}

impl ConversationService {
    pub fn new(storage: Arc<dyn StorageAdapter>, engine: Arc<ConversationEngine>) -> Self {
        Self {
            storage,
            engine,
            in_flight: InFlight::default(),
        }
    }

    pub async fn create_session(&self, req: NewSession) -> Result<AssessmentSession, HearthError> {
        if req.user_id.trim().is_empty() {
            return Err(HearthError::InvalidInput("user_id must not be empty".into()));
        }
        if !req.email.contains('@') {
            return Err(HearthError::InvalidInput(format!(
                "`{}` is not an email address",
                req.email
            )));
        }
        let session = AssessmentSession {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: req.user_id,
            email: req.email,
            display_name: req.display_name.trim().to_string(),
            status: SessionStatus::Active,
            language: req.language,
            started_at: chrono::Utc::now(),
        };
        self.storage.create_session(&session).await?;
        info!(session_id = %session.id, language = %session.language, "assessment session created");
        Ok(session)
    }

    /// Loads a session or fails with `NotFound`.
    pub async fn session(&self, session_id: &str) -> Result<AssessmentSession, HearthError> {
        self.storage
            .get_session(session_id)
            .await?
            .ok_or_else(|| HearthError::NotFound {
                entity: "session",
                id: session_id.to_string(),
            })
    }

    pub async fn view(&self, session_id: &str) -> Result<SessionView, HearthError> {
        let session = self.session(session_id).await?;
        let turns = self.storage.list_turns(session_id).await?;
        let exchanges = exchange_count(&turns);
        let phase = match session.status {
            SessionStatus::Complete => Phase::Complete,
            _ => Phase::for_exchanges(exchanges),
        };
        Ok(SessionView {
            session,
            phase: phase.as_str().to_string(),
            exchange_count: exchanges,
        })
    }

    /// Switches the script language for the rest of an active session.
    pub async fn set_language(
        &self,
        session_id: &str,
        language: Language,
    ) -> Result<AssessmentSession, HearthError> {
        let mut session = self.session(session_id).await?;
        if !session.status.accepts_turns() {
            return Err(HearthError::AssessmentClosed {
                session_id: session_id.to_string(),
            });
        }
        self.storage
            .update_session_language(session_id, language)
            .await?;
        session.language = language;
        debug!(session_id, %language, "session language changed");
        Ok(session)
    }

    /// Runs one conversation turn.
    ///
    /// `content` is the user's answer. `None` asks for a reply to the
    /// transcript as stored: the opening turn, or a retry after a failure.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        content: Option<&str>,
    ) -> Result<EngineReply, HearthError> {
        let _guard = self.in_flight.enter(session_id)?;
        let session = self.session(session_id).await?;
        if !session.status.accepts_turns() {
            return Err(HearthError::AssessmentClosed {
                session_id: session_id.to_string(),
            });
        }

        let mut transcript = self.storage.list_turns(session_id).await?;
        match content.map(str::trim) {
            Some("") => {
                return Err(HearthError::InvalidInput("message must not be empty".into()));
            }
            Some(text) if is_pending_answer(transcript.last(), text) => {
                debug!(session_id, "answer already stored, retrying the reply");
            }
            Some(text) => {
                let turn = self
                    .storage
                    .append_turn(session_id, Role::User, text)
                    .await?;
                transcript.push(turn);
            }
            None => {
                if transcript.last().is_some_and(|t| t.role == Role::Assistant) {
                    return Err(HearthError::InvalidInput(
                        "nothing to retry: the last turn already has a reply".into(),
                    ));
                }
            }
        }

        let reply = self
            .engine
            .respond(session_id, &transcript, session.language)
            .await?;

        self.storage
            .append_turn(session_id, Role::Assistant, &reply.text)
            .await?;

        if reply.halted {
            self.storage
                .update_session_status(session_id, SessionStatus::Halted)
                .await?;
            info!(session_id, "session halted");
        } else if reply.is_complete {
            self.storage
                .update_session_status(session_id, SessionStatus::Complete)
                .await?;
            info!(session_id, exchanges = reply.exchange_count, "assessment complete");
        }
        Ok(reply)
    }
}

/// A resubmitted answer that is still waiting for its reply.
fn is_pending_answer(last: Option<&ConversationTurn>, text: &str) -> bool {
    last.is_some_and(|t| t.role == Role::User && t.content.trim() == text)
}
