// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-to-markup helpers shared by both report variants.
//!
//! Order matters: text is escaped first, then quoted spans are emphasized, so
//! the only markup in the output is markup added here.

/// Escapes text for use inside an element body.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

fn closing_quote(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '\u{201c}' => Some('\u{201d}'),
        '\u{00ab}' => Some('\u{00bb}'),
        _ => None,
    }
}

/// Wraps every complete quoted span in `<strong>`, quotes included.
///
/// An opening quote without a matching close is left as plain text.
pub fn emphasize_quotes(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len() + 32);
    let mut rest = escaped;

    while let Some((start, open, close)) = rest
        .char_indices()
        .find_map(|(i, c)| closing_quote(c).map(|close| (i, c, close)))
    {
        let body = start + open.len_utf8();
        match rest[body..].find(close) {
            Some(len) if len > 0 => {
                let end = body + len + close.len_utf8();
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&rest[start..end]);
                out.push_str("</strong>");
                rest = &rest[end..];
            }
            _ => {
                out.push_str(&rest[..body]);
                rest = &rest[body..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escaped and emphasized inline text.
pub fn inline(text: &str) -> String {
    emphasize_quotes(&escape_html(text))
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                let sentence = text[start..next_idx].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = next_idx;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Groups sentences two at a time.
pub fn pair_sentences(text: &str) -> Vec<String> {
    split_sentences(text)
        .chunks(2)
        .map(|pair| pair.join(" "))
        .collect()
}

/// One `<p>` per sentence pair, each escaped and emphasized.
pub fn paragraphs(text: &str) -> String {
    pair_sentences(text)
        .iter()
        .map(|p| format!("<p>{}</p>", inline(p)))
        .collect::<Vec<_>>()
        .join("\n")
}
