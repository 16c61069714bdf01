//! Post-processing of an entry's accumulated description text.
//!
//! Descriptions are free text with embedded parentheticals. A parenthetical
//! whose first character is a digit is a cross-reference and resolves into
//! an anchor; any other parenthetical is ordinary prose and passes through
//! unchanged.

use std::sync::LazyLock;

use regex::Regex;

use super::links::{self, LinkError};

/// Leading text without `(`, then the next `(`…`)` span, then the rest.
static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^(]*)\(([^)]+)\)(.*)$").expect("valid span pattern"));

/// Joins accumulated description lines and resolves embedded references.
///
/// Lines are trimmed and joined with single spaces before scanning. Text
/// outside parentheticals runs through [`tag_characters`].
///
/// # Errors
///
/// Returns a [`LinkError`] when a digit-initial parenthetical matches no
/// production of the link grammar.
pub fn annotate(lines: &[String]) -> Result<String, LinkError> {
    let text = lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let mut html = String::new();
    let mut rest = text.as_str();
    loop {
        let Some(captures) = SPAN.captures(rest) else {
            html.push_str(tag_characters(rest));
            return Ok(html);
        };
        let before = captures.get(1).map_or("", |m| m.as_str());
        let inner = captures.get(2).map_or("", |m| m.as_str());

        html.push_str(tag_characters(before));
        if inner.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            html.push_str(&links::resolve_expression(&format!("({inner})"))?);
        } else {
            html.push('(');
            html.push_str(inner);
            html.push(')');
        }

        rest = captures.get(3).map_or("", |m| m.as_str());
    }
}

/// Inline character-tag markup hook.
///
/// Reserved extension point for tagging character symbols (A, B, A-5, …) in
/// description prose; currently returns the text unchanged.
const fn tag_characters(text: &str) -> &str {
    text
}
