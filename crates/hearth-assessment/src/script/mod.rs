// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authored text for each supported language.
//!
//! Every language carries its own complete phase script, delimiter, terminal
//! phrases, safety message and extraction prompt. Nothing here is produced by
//! interpolating one language into another.

mod en;
mod es;

use hearth_core::Language;

/// All fixed text the assessment needs for one language.
#[derive(Debug)]
pub struct LanguagePack {
    /// The conversation system instruction.
    pub phase_script: &'static str,
    /// Phrase that introduces the single question of every turn.
    pub question_delimiter: &'static str,
    /// Exact substrings whose presence in a reply completes the assessment.
    pub terminal_phrases: &'static [&'static str],
    /// Returned verbatim, without a model call, when the crisis gate fires.
    pub safety_message: &'static str,
    /// Sent to the model in place of a user turn when the transcript opens.
    pub opening_message: &'static str,
    /// Transcript line prefixes for the extraction blob.
    pub user_label: &'static str,
    pub assistant_label: &'static str,
    /// System instruction for plan extraction.
    pub extraction_prompt: &'static str,
    /// Stage note template; `{stage}`, `{exchange}` and `{max}` are substituted.
    pub stage_note: &'static str,
    /// Appended to the stage note once the exchange limit is reached.
    pub final_turn_note: &'static str,
    /// Shown wherever a plan field is missing or blank.
    pub placeholder: &'static str,
}

/// The language pack for `language`.
pub fn pack(language: Language) -> &'static LanguagePack {
    match language {
        Language::En => &en::PACK,
        Language::Es => &es::PACK,
    }
}

/// First-person crisis phrases, stored lower-cased and accent-folded.
///
/// Both lists are always scanned; people switch languages under stress.
/// Bare topic words are left out: the disclosure question itself names them,
/// and an ordinary answer repeats them.
pub(crate) const CRISIS_PHRASES: &[&str] = &[
    // en
    "kill myself",
    "killing myself",
    "end my life",
    "ending my life",
    "take my own life",
    "feeling suicidal",
    "feel suicidal",
    "been suicidal",
    "thinking about suicide",
    "thoughts of suicide",
    "want to die",
    "wanna die",
    "don't want to be alive",
    "dont want to be alive",
    "don't want to live",
    "dont want to live",
    "no reason to live",
    "better off dead",
    "better off without me",
    "hurt myself",
    "hurting myself",
    "harming myself",
    "end it all",
    // es
    "suicidarme",
    "pienso en el suicidio",
    "pensando en el suicidio",
    "pensamientos suicidas",
    "matarme",
    "quitarme la vida",
    "acabar con mi vida",
    "acabar con todo",
    "no quiero vivir",
    "no quiero seguir viviendo",
    "quiero morir",
    "quiero morirme",
    "mejor muerto",
    "mejor muerta",
    "estarian mejor sin mi",
    "hacerme dano",
    "lastimarme",
];

/// Words that negate a crisis phrase later in the same clause.
pub(crate) const NEGATIONS: &[&str] = &[
    "no", "not", "never", "don't", "dont", "didn't", "didnt", "won't", "wont", "wouldn't",
    "wouldnt", "nor", "nunca", "jamas", "ni",
];

/// Words after a negation that turn it into uncertainty ("I don't know if...").
pub(crate) const HEDGES: &[&str] = &["know", "sure", "se"];

/// Lower-case and strip the accents and typographic quotes that would defeat
/// a substring match.
pub(crate) fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            '\u{2018}' | '\u{2019}' | '\u{00b4}' => '\'',
            other => other,
        })
        .collect()
}
