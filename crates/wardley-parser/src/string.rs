//! Quoted name codec.
//!
//! Names are written bare whenever the line grammar can read them back
//! unchanged. Anything else is written as a double-quoted string with `\n`,
//! `\"` and `\\` escapes. Reading quoted names is part of the line grammar.

use crate::parser::KEYWORDS;

/// Characters that end a bare name somewhere in the grammar.
const RESERVED_CHARS: &[char] = &['[', ']', '(', ')', '{', '}', ';', '"', '\\', '\n', '\r'];

/// Sequences that a link line would read as an arrow.
const ARROWS: &[&str] = &["->", "+>", "+<", "+'"];

/// Words that end a bare name when they follow whitespace.
const MODIFIER_WORDS: &[&str] = &["label", "inertia"];

/// Returns `true` when `name` must be quoted to survive a parse.
///
/// # Examples
///
/// ```
/// # use wardley_parser::needs_quotes;
/// assert!(!needs_quotes("Kettle"));
/// assert!(needs_quotes("Tea\nShop"));
/// assert!(needs_quotes("A->B"));
/// ```
pub fn needs_quotes(name: &str) -> bool {
    name.is_empty()
        || name.trim() != name
        || name.starts_with("//")
        || name.contains(RESERVED_CHARS)
        || ARROWS.iter().any(|arrow| name.contains(arrow))
        || name
            .split_whitespace()
            .skip(1)
            .any(|word| MODIFIER_WORDS.contains(&word))
        || ends_with_number(name)
        || name
            .split_once(char::is_whitespace)
            .is_some_and(|(first, _)| KEYWORDS.contains(&first))
}

/// Escapes `\`, `"` and line breaks without adding quotes.
pub fn escape(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Formats `name` for writing into a source line, quoting only when needed.
///
/// # Examples
///
/// ```
/// # use wardley_parser::format_name;
/// assert_eq!(format_name("Kettle"), "Kettle");
/// assert_eq!(format_name("Say \"hi\""), r#""Say \"hi\"""#);
/// assert_eq!(format_name("line1\nline2"), r#""line1\nline2""#);
/// ```
pub fn format_name(name: &str) -> String {
    if needs_quotes(name) {
        format!("\"{}\"", escape(name))
    } else {
        name.to_string()
    }
}

/// A bare name ending in a number would be read as `evolve <name> <maturity>`.
fn ends_with_number(name: &str) -> bool {
    name.rsplit_once(char::is_whitespace)
        .is_some_and(|(_, last)| last.parse::<f64>().is_ok())
}
