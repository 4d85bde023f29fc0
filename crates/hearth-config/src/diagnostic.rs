// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment errors as miette diagnostics for `hearth.toml`.
//!
//! Unknown sections and keys get a Jaro-Winkler suggestion drawn from the
//! section they appeared in. Every key diagnostic names the `HEARTH_*`
//! variable that overrides it, and values that came from the environment
//! point at that variable instead of a file span.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::loader::{env_var_for, SECTIONS};

/// Minimum Jaro-Winkler similarity for a suggestion (`smtp_hots` → `smtp_host`).
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown section `[{section}]`")]
    #[diagnostic(
        code(hearth::config::unknown_section),
        help("{}", section_help(suggestion.as_deref()))
    )]
    UnknownSection {
        section: String,
        suggestion: Option<String>,
        #[label("not a hearth.toml section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("unknown key `{key}` in `[{section}]`")]
    #[diagnostic(
        code(hearth::config::unknown_key),
        help("{}", key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        section: String,
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys accepted by the section.
        valid_keys: String,
        #[label("not recognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type, from a file or from `env_var`.
    #[error("invalid value for `{key}`: found {found}, expected {expected}")]
    #[diagnostic(code(hearth::config::invalid_type), help("{}", type_help(env_var, *from_env)))]
    InvalidType {
        /// Dotted path, e.g. `gateway.port`.
        key: String,
        found: String,
        expected: String,
        env_var: String,
        from_env: bool,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("validation error: {message}")]
    #[diagnostic(code(hearth::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(hearth::config::other))]
    Other(String),
}

fn section_help(suggestion: Option<&str>) -> String {
    let sections = SECTIONS.map(|s| format!("[{s}]")).join(" ");
    match suggestion {
        Some(s) => format!("did you mean `[{s}]`? Sections: {sections}"),
        None => format!("sections: {sections}"),
    }
}

fn key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn type_help(env_var: &str, from_env: bool) -> String {
    if from_env {
        format!("this value came from the environment; fix or unset {env_var}")
    } else {
        format!("fix the value in hearth.toml or override it with {env_var}")
    }
}

/// Converts every error inside `err` into a diagnostic.
///
/// `toml_sources` holds `(path, content)` pairs used to place spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &figment::Error, toml_sources: &[(String, String)]) -> ConfigError {
    // figment's path ends with the offending key itself.
    let path: Vec<&str> = error.path.iter().map(String::as_str).collect();
    let (section, key) = match path.split_last() {
        Some((key, parents)) => (parents.join("."), *key),
        None => (String::new(), ""),
    };
    let source = source_for(error, toml_sources);

    match &error.kind {
        Kind::UnknownField(field, _) if section.is_empty() => ConfigError::UnknownSection {
            section: field.clone(),
            suggestion: suggest_key(field, &SECTIONS),
            span: source.and_then(|(_, content)| {
                find_section_offset(content, field).map(|o| SourceSpan::new(o.into(), field.len() + 2))
            }),
            src: source.map(named),
        },
        Kind::UnknownField(field, expected) => {
            let span = source.and_then(|(_, content)| {
                find_key_offset(content, &section, field).map(|o| SourceSpan::new(o.into(), field.len()))
            });
            ConfigError::UnknownKey {
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                key: field.clone(),
                section,
                span,
                src: source.map(named),
            }
        }
        Kind::InvalidType(actual, expected) => {
            let span = source.and_then(|(_, content)| {
                find_key_offset(content, &section, key).map(|o| SourceSpan::new(o.into(), key.len()))
            });
            ConfigError::InvalidType {
                key: path.join("."),
                found: actual.to_string(),
                expected: expected.clone(),
                env_var: env_var_for(&section, key),
                from_env: came_from_env(error),
                span,
                src: span.and(source.map(named)),
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn named((path, content): (&str, &str)) -> NamedSource<String> {
    NamedSource::new(path, content.to_string())
}

/// The TOML file the error's value was read from, if we have its content.
fn source_for<'a>(
    error: &figment::Error,
    toml_sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str)> {
    let file = error.metadata.as_ref().and_then(|m| match &m.source {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    });
    let found = match file {
        Some(file) => toml_sources.iter().find(|(p, _)| *p == file),
        // Inline strings carry no file; a single source is unambiguous.
        None if !came_from_env(error) && toml_sources.len() == 1 => toml_sources.first(),
        None => None,
    };
    found.map(|(p, c)| (p.as_str(), c.as_str()))
}

fn came_from_env(error: &figment::Error) -> bool {
    error
        .metadata
        .as_ref()
        .is_some_and(|m| m.name.contains("environment"))
}

/// Byte offset of the `[section]` header's opening bracket.
pub fn find_section_offset(content: &str, section: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if header_name(line) == Some(section) {
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Byte offset of `key` inside `[section]` (top level when `section` is empty).
///
/// Only lines between that section's header and the next header are searched,
/// so a key with the same name in another section is never picked.
pub fn find_key_offset(content: &str, section: &str, key: &str) -> Option<usize> {
    let mut current = "";
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if let Some(name) = header_name(line) {
            current = name;
        } else if current == section {
            let trimmed = line.trim_start();
            let indent = line.len() - trimmed.len();
            let is_key = trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key {
                return Some(offset + indent);
            }
        }
        offset += line.len();
    }
    None
}

fn header_name(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix('[')?;
    let end = inner.find(']')?;
    Some(inner[..end].trim())
}

/// Closest candidate above [`SUGGESTION_THRESHOLD`], if any.
pub fn suggest_key(unknown: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|&c| (c, strsim::jaro_winkler(unknown, c)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c.to_string())
}

/// Prints each diagnostic to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn diagnose(toml: &str) -> Vec<ConfigError> {
        let err = load_config_from_str(toml).unwrap_err();
        figment_to_config_errors(err, &[("<inline>".to_string(), toml.to_string())])
    }

    #[test]
    fn suggests_the_closest_key() {
        let valid = &["max_exchanges", "transcript_char_budget", "stream_chunk_delay_ms"];
        assert_eq!(suggest_key("max_exchange", valid).as_deref(), Some("max_exchanges"));
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_stays_inside_its_section() {
        let content = "[pdf]\ntimeout_secs = 5\n\n[anthropic]\n  timeout_secs = 9\n";
        let o = find_key_offset(content, "anthropic", "timeout_secs").unwrap();
        assert_eq!(&content[o - 2..o + 16], "  timeout_secs = 9");
        assert_eq!(find_key_offset(content, "pdf", "timeout_secs"), Some(6));
        assert_eq!(find_key_offset(content, "email", "timeout_secs"), None);
    }

    #[test]
    fn key_offset_ignores_longer_keys_with_the_same_prefix() {
        let content = "[email]\nsmtp_port_x = 1\nsmtp_port=2\n";
        let o = find_key_offset(content, "email", "smtp_port").unwrap();
        assert_eq!(&content[o..o + 11], "smtp_port=2");
    }

    #[test]
    fn unknown_section_suggests_a_real_one() {
        let errors = diagnose("[assesment]\nmax_exchanges = 3\n");
        match &errors[0] {
            ConfigError::UnknownSection {
                section,
                suggestion,
                span,
                ..
            } => {
                assert_eq!(section, "assesment");
                assert_eq!(suggestion.as_deref(), Some("assessment"));
                assert_eq!(span.map(|s| s.offset()), Some(0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_key_names_its_section_and_span() {
        let toml = "[gateway]\nprot = 8080\n";
        let errors = diagnose(toml);
        match &errors[0] {
            ConfigError::UnknownKey {
                section,
                key,
                suggestion,
                span,
                ..
            } => {
                assert_eq!(section, "gateway");
                assert_eq!(key, "prot");
                assert_eq!(suggestion.as_deref(), Some("port"));
                assert_eq!(span.map(|s| s.offset()), toml.find("prot"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_type_points_at_the_env_override() {
        let errors = diagnose("[pdf]\ntimeout_secs = \"soon\"\n");
        match &errors[0] {
            ConfigError::InvalidType {
                key,
                env_var,
                from_env,
                ..
            } => {
                assert_eq!(key, "pdf.timeout_secs");
                assert_eq!(env_var, "HEARTH_PDF_TIMEOUT_SECS");
                assert!(!from_env);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(type_help("HEARTH_PDF_TIMEOUT_SECS", true).contains("unset HEARTH_PDF_TIMEOUT_SECS"));
    }
}
