// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan synthesis: one extraction call, then parse, repair, validate or fall back.
//!
//! The model output is never trusted as-is. A parsed value must deserialize
//! into [`Plan`] and pass [`Plan::validate`]; anything else is replaced
//! wholesale by the language's default plan. Only a model call failure is
//! surfaced as an error.

use std::sync::Arc;

use hearth_core::plan::{DAILY_ACTION_COUNT, NextSteps};
use hearth_core::types::{ProviderMessage, ProviderRequest};
use hearth_core::{ConversationTurn, HearthError, Language, Plan, ProviderAdapter, Role};
use serde_json::Value;
use tracing::{info, warn};

use crate::fallback;
use crate::script;

/// Model and limit settings for plan extraction.
#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Characters of transcript kept; the rest is dropped.
    pub transcript_char_budget: usize,
    /// Always written into the plan, whatever the model produced.
    pub next_steps: NextSteps,
}

/// How the returned plan was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisSource {
    /// The model output parsed and validated directly.
    Parsed,
    /// The output parsed after closing truncated brackets.
    Repaired,
    /// The language's default plan was used.
    Fallback,
}

impl SynthesisSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SynthesisSource::Parsed => "parsed",
            SynthesisSource::Repaired => "repaired",
            SynthesisSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub plan: Plan,
    pub source: SynthesisSource,
}

/// Turns a finished transcript into a [`Plan`].
pub struct PlanSynthesizer {
    provider: Arc<dyn ProviderAdapter>,
    settings: SynthesisSettings,
}

impl PlanSynthesizer {
    pub fn new(provider: Arc<dyn ProviderAdapter>, settings: SynthesisSettings) -> Self {
        Self { provider, settings }
    }

    /// Runs one extraction call over the transcript.
    ///
    /// Callers check for a stored plan first; each call costs a model
    /// invocation and may produce different content.
    pub async fn synthesize(
        &self,
        session_id: &str,
        transcript: &[ConversationTurn],
        language: Language,
    ) -> Result<Synthesis, HearthError> {
        let pack = script::pack(language);
        let blob = transcript_blob(transcript, language, self.settings.transcript_char_budget);

        let request = ProviderRequest {
            model: self.settings.model.clone(),
            system_prompt: pack.extraction_prompt.to_string(),
            messages: vec![ProviderMessage {
                role: Role::User,
                content: blob,
            }],
            max_tokens: self.settings.max_tokens,
        };

        let response = self.provider.complete(request).await?;
        let synthesis = parse_plan(&response.content, language, &self.settings.next_steps);

        info!(
            session_id = %session_id,
            source = synthesis.source.as_str(),
            output_tokens = response.usage.output_tokens,
            "plan synthesized"
        );
        Ok(synthesis)
    }
}

/// Role-prefixed transcript lines joined by blank lines, cut to `budget` chars.
pub fn transcript_blob(turns: &[ConversationTurn], language: Language, budget: usize) -> String {
    let pack = script::pack(language);
    let blob = turns
        .iter()
        .map(|t| {
            let label = match t.role {
                Role::User => pack.user_label,
                Role::Assistant => pack.assistant_label,
            };
            format!("{label}: {}", t.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    truncate_chars(blob, budget)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(idx);
    }
    text
}

/// Coerces raw model output into a valid plan. Never fails.
pub fn parse_plan(raw: &str, language: Language, next_steps: &NextSteps) -> Synthesis {
    let fallback = || Synthesis {
        plan: fallback::default_plan(language, next_steps),
        source: SynthesisSource::Fallback,
    };

    let Some((value, source)) = parse_value(raw) else {
        warn!("extraction output is not JSON, using default plan");
        return fallback();
    };

    let mut plan: Plan = match serde_json::from_value(value) {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, "extraction output does not match the plan shape, using default plan");
            return fallback();
        }
    };

    normalize_daily_actions(&mut plan, language);
    plan.next_steps = next_steps.clone();

    if let Err(problems) = plan.validate() {
        warn!(
            missing = problems.len(),
            first = problems.first().map(String::as_str).unwrap_or_default(),
            "extracted plan has empty fields, using default plan"
        );
        return fallback();
    }

    Synthesis { plan, source }
}

/// Keeps exactly thirty daily actions: longer lists are cut, shorter
/// non-empty lists are topped up from the default list.
fn normalize_daily_actions(plan: &mut Plan, language: Language) {
    let actions = &mut plan.thirty_day_protocol.daily_actions;
    if actions.is_empty() {
        return;
    }
    if actions.len() < DAILY_ACTION_COUNT {
        let defaults = fallback::default_daily_actions(language);
        actions.extend(defaults.into_iter().skip(actions.len()));
    }
    actions.truncate(DAILY_ACTION_COUNT);
}

fn parse_value(raw: &str) -> Option<(Value, SynthesisSource)> {
    let body = strip_code_fence(raw);
    let span = extract_json_span(body)?;
    if let Ok(value) = serde_json::from_str(span) {
        return Some((value, SynthesisSource::Parsed));
    }
    let repaired = repair_truncated(span)?;
    serde_json::from_str(&repaired)
        .ok()
        .map(|value| (value, SynthesisSource::Repaired))
}

/// Removes an optional leading ```` ```json ```` or ```` ``` ```` line and trailing fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => rest.trim_start_matches("json"),
        };
    }
    let text = text.trim_end();
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// The first top-level `{...}` or `[...]` span.
///
/// Brackets inside strings are ignored. When the input ends before the span
/// closes, everything from the opening bracket on is returned.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    Some(&text[start..])
}

/// Appends the closers a truncated span is missing, innermost first.
///
/// Returns `None` when there is nothing to close, when the text ends inside a
/// string, or when a closer does not match its opener.
pub fn repair_truncated(span: &str) -> Option<String> {
    let mut expected: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in span.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => expected.push('}'),
            '[' => expected.push(']'),
            '}' | ']' => {
                if expected.pop() != Some(c) {
                    return None;
                }
            }
            _ => {}
        }
    }

    if in_string || expected.is_empty() {
        return None;
    }
    let mut repaired = String::with_capacity(span.len() + expected.len());
    repaired.push_str(span.trim_end());
    repaired.extend(expected.iter().rev());
    Some(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedProvider, turn};
    use proptest::prelude::*;

    fn steps() -> NextSteps {
        NextSteps {
            contact_email: "hello@hearth.local".into(),
            booking_url: "https://hearth.local/book".into(),
            community_url: "https://hearth.local/community".into(),
        }
    }

    fn complete_plan_json(language: Language) -> String {
        let mut plan = fallback::default_plan(language, &steps());
        plan.kitchen_term = "the pass".into();
        plan.next_steps = NextSteps::default();
        serde_json::to_string(&plan).unwrap()
    }

    fn settings() -> SynthesisSettings {
        SynthesisSettings {
            model: "extract-model".into(),
            max_tokens: 8000,
            transcript_char_budget: 60_000,
            next_steps: steps(),
        }
    }

    #[test]
    fn blob_uses_language_labels() {
        let turns = vec![turn(Role::Assistant, "Hola"), turn(Role::User, "Buenas")];
        assert_eq!(
            transcript_blob(&turns, Language::Es, 1000),
            "Asistente: Hola\n\nUsuario: Buenas"
        );
        assert_eq!(
            transcript_blob(&turns, Language::En, 1000),
            "Assistant: Hola\n\nUser: Buenas"
        );
    }

    #[test]
    fn blob_keeps_head_on_char_boundary() {
        let turns = vec![turn(Role::User, "ñandú ñandú")];
        let blob = transcript_blob(&turns, Language::Es, 11);
        assert_eq!(blob, "Usuario: ña");
    }

    #[test]
    fn fence_is_stripped() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn span_skips_prose_and_string_brackets() {
        let text = "Here you go: {\"a\": \"}{ [\", \"b\": [1, {\"c\": \"\\\"}\"}]} trailing }";
        assert_eq!(
            extract_json_span(text),
            Some("{\"a\": \"}{ [\", \"b\": [1, {\"c\": \"\\\"}\"}]}")
        );
        assert_eq!(extract_json_span("no json here"), None);
    }

    #[test]
    fn repair_closes_in_nesting_order() {
        assert_eq!(
            repair_truncated("{\"a\": [1, {\"b\": 2}"),
            Some("{\"a\": [1, {\"b\": 2}]}".to_string())
        );
        assert_eq!(repair_truncated("{\"a\": \"unterminated"), None);
        assert_eq!(repair_truncated("{\"a\": [1}"), None);
        assert_eq!(repair_truncated("{\"a\": 1}"), None);
    }

    #[test]
    fn valid_output_is_parsed() {
        let raw = format!("```json\n{}\n```", complete_plan_json(Language::En));
        let synthesis = parse_plan(&raw, Language::En, &steps());
        assert_eq!(synthesis.source, SynthesisSource::Parsed);
        assert_eq!(synthesis.plan.kitchen_term, "the pass");
        assert_eq!(synthesis.plan.next_steps, steps());
    }

    #[test]
    fn truncated_output_is_repaired() {
        let json = complete_plan_json(Language::En);
        let truncated = json.trim_end_matches('}');
        let synthesis = parse_plan(truncated, Language::En, &steps());
        assert_eq!(synthesis.source, SynthesisSource::Repaired);
        assert_eq!(synthesis.plan.kitchen_term, "the pass");
    }

    #[test]
    fn empty_field_falls_back_wholesale() {
        let mut plan = fallback::default_plan(Language::Es, &steps());
        plan.kitchen_term = "la línea".into();
        plan.bottom_line.paragraph_2 = "  ".into();
        let raw = serde_json::to_string(&plan).unwrap();
        let synthesis = parse_plan(&raw, Language::Es, &steps());
        assert_eq!(synthesis.source, SynthesisSource::Fallback);
        assert_eq!(synthesis.plan, fallback::default_plan(Language::Es, &steps()));
    }

    #[test]
    fn wrong_shape_falls_back() {
        let synthesis = parse_plan("[1, 2, 3]", Language::En, &steps());
        assert_eq!(synthesis.source, SynthesisSource::Fallback);
        let synthesis = parse_plan("{\"kitchen_term\": 5}", Language::En, &steps());
        assert_eq!(synthesis.source, SynthesisSource::Fallback);
    }

    #[test]
    fn daily_actions_are_normalized_to_thirty() {
        let mut plan = fallback::default_plan(Language::En, &steps());
        plan.thirty_day_protocol.daily_actions = (0..45).map(|i| format!("day {i}")).collect();
        let long = parse_plan(&serde_json::to_string(&plan).unwrap(), Language::En, &steps());
        assert_eq!(long.plan.thirty_day_protocol.daily_actions.len(), DAILY_ACTION_COUNT);
        assert_eq!(long.plan.thirty_day_protocol.daily_actions[29], "day 29");

        plan.thirty_day_protocol.daily_actions = vec!["walk".into(), "breathe".into()];
        let short = parse_plan(&serde_json::to_string(&plan).unwrap(), Language::En, &steps());
        let actions = &short.plan.thirty_day_protocol.daily_actions;
        assert_eq!(actions.len(), DAILY_ACTION_COUNT);
        assert_eq!(actions[1], "breathe");
        assert_eq!(actions[2], fallback::default_daily_actions(Language::En)[2]);
    }

    #[tokio::test]
    async fn synthesize_uses_language_prompt_and_blob() {
        let provider = Arc::new(ScriptedProvider::new([complete_plan_json(Language::Es)]));
        let synthesizer = PlanSynthesizer::new(provider.clone(), settings());
        let turns = vec![turn(Role::Assistant, "Hola"), turn(Role::User, "Trabajo en la línea")];

        let synthesis = synthesizer.synthesize("s1", &turns, Language::Es).await.unwrap();
        assert_eq!(synthesis.source, SynthesisSource::Parsed);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, script::pack(Language::Es).extraction_prompt);
        assert_eq!(requests[0].model, "extract-model");
        assert_eq!(requests[0].messages[0].content, "Asistente: Hola\n\nUsuario: Trabajo en la línea");
    }

    #[tokio::test]
    async fn synthesize_propagates_model_failure() {
        let provider = Arc::new(ScriptedProvider::failing("boom"));
        let synthesizer = PlanSynthesizer::new(provider, settings());
        assert!(synthesizer.synthesize("s1", &[], Language::En).await.is_err());
    }

    proptest! {
        #[test]
        fn any_output_yields_a_valid_plan(raw in ".{0,400}") {
            let synthesis = parse_plan(&raw, Language::En, &steps());
            prop_assert!(synthesis.plan.validate().is_ok());
        }

        #[test]
        fn dropping_trailing_closers_is_repaired(drop in 1usize..6) {
            let json = complete_plan_json(Language::En);
            let trailing = json.len() - json.trim_end_matches(['}', ']']).len();
            let drop = drop.min(trailing);
            let truncated = &json[..json.len() - drop];
            let synthesis = parse_plan(truncated, Language::En, &steps());
            prop_assert_eq!(synthesis.source, SynthesisSource::Repaired);
            prop_assert_eq!(synthesis.plan.kitchen_term.as_str(), "the pass");
        }

        #[test]
        fn wrong_closer_count_never_reports_repaired(extra in 1usize..4) {
            let json = complete_plan_json(Language::En);
            let padded = format!("{}{}", json.trim_end_matches('}'), "]".repeat(extra));
            let synthesis = parse_plan(&padded, Language::En, &steps());
            prop_assert_eq!(synthesis.source, SynthesisSource::Fallback);
        }
    }
}
