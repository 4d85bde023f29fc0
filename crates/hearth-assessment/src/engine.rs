// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine: one model call per user turn.
//!
//! The engine reads the transcript, derives the current phase from the number
//! of user exchanges, runs the crisis gate on the newest user turn, and then
//! sends the whole transcript plus the language's phase script to the model.

use std::sync::Arc;

use hearth_core::types::{ProviderMessage, ProviderRequest};
use hearth_core::{ConversationTurn, HearthError, Language, ProviderAdapter, Role};
use tracing::{debug, info, warn};

use crate::phase::Phase;
use crate::script::{self, CRISIS_PHRASES, HEDGES, LanguagePack, NEGATIONS};

/// Model and limit settings for conversation turns.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Circuit breaker: the assessment completes after this many user answers.
    pub max_exchanges: u32,
}

/// The outcome of one conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineReply {
    /// Assistant text to persist and stream.
    pub text: String,
    /// Whether the assessment is now complete.
    pub is_complete: bool,
    /// Whether the crisis gate stopped the assessment.
    pub halted: bool,
    pub phase: Phase,
    /// User answers counted so far, the current one included.
    pub exchange_count: u32,
}

/// Drives the assessment conversation through the language model.
pub struct ConversationEngine {
    provider: Arc<dyn ProviderAdapter>,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(provider: Arc<dyn ProviderAdapter>, settings: EngineSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Produces the assistant reply for the transcript as it stands.
    ///
    /// The caller appends the user's turn before calling and persists the
    /// returned text afterwards. Model failures are returned unchanged so the
    /// caller can resubmit without duplicating the user's turn.
    pub async fn respond(
        &self,
        session_id: &str,
        transcript: &[ConversationTurn],
        language: Language,
    ) -> Result<EngineReply, HearthError> {
        let pack = script::pack(language);
        let exchanges = exchange_count(transcript);
        let phase = Phase::for_exchanges(exchanges);

        if latest_user_turn(transcript).is_some_and(|t| detect_crisis(&t.content)) {
            warn!(session_id = %session_id, phase = %phase, "crisis gate fired, assessment halted");
            return Ok(EngineReply {
                text: pack.safety_message.to_string(),
                is_complete: false,
                halted: true,
                phase,
                exchange_count: exchanges,
            });
        }

        let final_turn = exchanges >= self.settings.max_exchanges;
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            system_prompt: system_prompt(pack, phase, exchanges, self.settings.max_exchanges),
            messages: build_messages(transcript, pack),
            max_tokens: self.settings.max_tokens,
        };

        debug!(
            session_id = %session_id,
            phase = %phase,
            messages = request.messages.len(),
            "requesting conversation turn"
        );
        let response = self.provider.complete(request).await?;

        let raw = response.content;
        let is_complete = contains_terminal_phrase(&raw, language) || final_turn;
        let text = enforce_single_question(&raw, pack.question_delimiter);
        let phase = Phase::after_reply(exchanges, is_complete);

        info!(
            session_id = %session_id,
            phase = %phase,
            exchanges,
            is_complete,
            "conversation turn complete"
        );

        Ok(EngineReply {
            text,
            is_complete,
            halted: false,
            phase,
            exchange_count: exchanges,
        })
    }
}

/// Number of user answers in the transcript.
pub fn exchange_count(transcript: &[ConversationTurn]) -> u32 {
    let users = transcript.iter().filter(|t| t.role == Role::User).count();
    u32::try_from(users).unwrap_or(u32::MAX)
}

fn latest_user_turn(transcript: &[ConversationTurn]) -> Option<&ConversationTurn> {
    transcript.iter().rev().find(|t| t.role == Role::User)
}

/// Exact, case-sensitive substring match against the language's terminal phrases.
pub fn contains_terminal_phrase(reply: &str, language: Language) -> bool {
    script::pack(language)
        .terminal_phrases
        .iter()
        .any(|phrase| reply.contains(phrase))
}

/// Words before a match that are searched for a negation.
const NEGATION_WINDOW: usize = 6;

/// Whether `text` contains a crisis phrase, in either language, that the
/// surrounding clause does not negate.
pub fn detect_crisis(text: &str) -> bool {
    let folded = script::fold(text);
    CRISIS_PHRASES.iter().any(|phrase| {
        folded
            .match_indices(phrase)
            .any(|(at, _)| !negated(&folded[..at]))
    })
}

/// Whether the clause that ends at a match carries a negation.
fn negated(prefix: &str) -> bool {
    let clause = prefix
        .rsplit(['.', '!', '?', ';', ',', ':', '\n'])
        .next()
        .unwrap_or(prefix);
    let words: Vec<&str> = clause
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .collect();
    let window = &words[words.len().saturating_sub(NEGATION_WINDOW)..];

    window.iter().enumerate().any(|(i, word)| {
        NEGATIONS.contains(word) && !window.get(i + 1).is_some_and(|next| HEDGES.contains(next))
    })
}

/// Cuts a reply that asks more than one delimited question.
///
/// The reply ends after the sentence that closes the first delimited question,
/// or just before the second delimiter if no question mark comes first.
pub fn enforce_single_question(reply: &str, delimiter: &str) -> String {
    let Some(first) = reply.find(delimiter) else {
        return reply.to_string();
    };
    let body_start = first + delimiter.len();
    let Some(offset) = reply[body_start..].find(delimiter) else {
        return reply.to_string();
    };
    let second = body_start + offset;

    let cut = match reply[body_start..second].find('?') {
        Some(q) => body_start + q + '?'.len_utf8(),
        None => second,
    };
    reply[..cut].trim_end().to_string()
}

/// The phase script followed by the current stage note.
pub fn system_prompt(pack: &LanguagePack, phase: Phase, exchanges: u32, max: u32) -> String {
    let note = pack
        .stage_note
        .replace("{stage}", phase.stage_label())
        .replace("{exchange}", &exchanges.to_string())
        .replace("{max}", &max.to_string());

    let mut prompt = String::with_capacity(pack.phase_script.len() + note.len() + 256);
    prompt.push_str(pack.phase_script);
    prompt.push_str("\n\n");
    prompt.push_str(&note);
    if exchanges >= max {
        prompt.push('\n');
        prompt.push_str(pack.final_turn_note);
    }
    prompt
}

/// Maps the transcript to model messages.
///
/// The model requires a user message first, so a synthetic opening message is
/// prepended when the transcript is empty or opens with an assistant turn.
/// Consecutive turns from the same role are merged.
pub fn build_messages(transcript: &[ConversationTurn], pack: &LanguagePack) -> Vec<ProviderMessage> {
    let mut messages: Vec<ProviderMessage> = Vec::with_capacity(transcript.len() + 1);

    if transcript.first().is_none_or(|t| t.role != Role::User) {
        messages.push(ProviderMessage {
            role: Role::User,
            content: pack.opening_message.to_string(),
        });
    }

    for turn in transcript {
        match messages.last_mut() {
            Some(last) if last.role == turn.role => {
                last.content.push_str("\n\n");
                last.content.push_str(&turn.content);
            }
            _ => messages.push(ProviderMessage {
                role: turn.role,
                content: turn.content.clone(),
            }),
        }
    }
    messages
}
