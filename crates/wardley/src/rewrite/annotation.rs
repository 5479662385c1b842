//! Rewriting one occurrence of a numbered annotation.
//!
//! An annotation is plotted either once, `annotation 1 [0.4, 0.5] text`, or
//! several times, `annotation 1 [[0.4, 0.5], [0.2, 0.7]] text`. All
//! occurrences live in one bracket group on one line, so moving one of them
//! rewrites only its entry in the group.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The `[[...], [...]]` group right after the annotation number.
    static ref OCCURRENCE_LIST: Regex =
        Regex::new(r"^\s*\[\s*\[.*?\]\s*\]").expect("occurrence list pattern");

    /// The single `[v, m]` clause right after the annotation number.
    static ref SINGLE_OCCURRENCE: Regex =
        Regex::new(r"^\s*\[[^\]]*\]").expect("single occurrence pattern");

    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
}

/// Replaces occurrence `index` in `tail`, the text following the number.
///
/// `visibility` and `maturity` are already formatted. The list form is
/// written back compacted, `[[v,m],[v,m]]`; the single form as `[v, m]`.
/// Returns `None` when there is no such occurrence.
pub(crate) fn replace_occurrence(
    tail: &str,
    index: usize,
    visibility: &str,
    maturity: &str,
) -> Option<String> {
    if let Some(found) = OCCURRENCE_LIST.find(tail) {
        let segment = found.as_str();
        let normalized = WHITESPACE.replace_all(segment, "");
        let inner = normalized.strip_prefix("[[")?.strip_suffix("]]")?;

        let mut occurrences: Vec<String> = inner.split("],[").map(str::to_string).collect();
        let occurrence = occurrences.get_mut(index)?;
        *occurrence = format!("{visibility},{maturity}");

        return Some(format!(
            "{}[[{}]]{}",
            leading_whitespace(segment),
            occurrences.join("],["),
            &tail[found.end()..]
        ));
    }

    let found = SINGLE_OCCURRENCE.find(tail)?;
    if index != 0 {
        return None;
    }
    Some(format!(
        "{}[{visibility}, {maturity}]{}",
        leading_whitespace(found.as_str()),
        &tail[found.end()..]
    ))
}

fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}
