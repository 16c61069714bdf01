//! Cross-reference (link) grammar resolution.
//!
//! Conflict entries refer to one another through a small expression grammar:
//! a reference expression is a run of parenthesised groups, and each group is
//! a sequence (`12; 34`), an alternation (`12 or 34`), or an atom: a decimal
//! entry id with optional branch letters and a trailing qualifier
//! (`123a, b (change A to B)`). Resolution turns each atom into an anchor
//! whose target is the entry id and whose visible text is the unmodified
//! atom.
//!
//! Targets are assumed to exist; nothing here checks them against an index.

use std::sync::LazyLock;

use regex::Regex;

/// An atom: decimal id, optional `a`–`h` branch letters, free-text
/// qualifier. Only the id participates in the anchor target.
static ATOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([a-h](, [a-h])*)?(.*)$").expect("valid atom pattern"));

/// Errors produced while resolving a reference expression.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkError {
    /// The expression is not a run of parenthesised groups.
    #[error("invalid link expression: {0}")]
    Malformed(String),

    /// A group body matched no production of the grammar.
    #[error("unable to parse link: {0}")]
    Unresolvable(String),
}

/// Resolves a full reference expression (one or more parenthesised groups)
/// into anchor markup.
///
/// Each group resolves independently and is wrapped in a
/// `<span class="clinkgroup">` marker; groups are joined with a single
/// space. A bare `()` group resolves to an empty marker with no anchor.
///
/// # Errors
///
/// Returns [`LinkError::Malformed`] if the expression has text outside a
/// parenthesised group, or [`LinkError::Unresolvable`] if a group body
/// matches no production.
pub fn resolve_expression(refs: &str) -> Result<String, LinkError> {
    let mut html = String::new();
    let mut rest = refs;
    while !rest.is_empty() {
        let body = rest
            .strip_prefix('(')
            .ok_or_else(|| LinkError::Malformed(rest.to_string()))?;
        let close = body
            .find(')')
            .ok_or_else(|| LinkError::Malformed(rest.to_string()))?;
        let group = resolve_group(&body[..close])?;

        if !html.is_empty() {
            html.push(' ');
        }
        html.push_str("<span class=\"clinkgroup\">");
        html.push_str(&group);
        html.push_str("</span>");

        let after = &body[close + 1..];
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    Ok(html)
}

/// Resolves one group body, recursing through sequences and alternations
/// down to atoms.
///
/// Recursion terminates because each split strictly shrinks the remaining
/// text and atom matching is non-recursive.
fn resolve_group(link: &str) -> Result<String, LinkError> {
    // Sequence: 123; 234
    if link.contains(';') {
        let segments = link
            .split(';')
            .map(|segment| resolve_group(segment.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(segments.join(" ; "));
    }

    // Alternation: 123 or 234
    if link.contains(" or ") {
        let segments = link
            .split(" or ")
            .map(|segment| resolve_group(segment.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(segments.join(" or "));
    }

    // Empty group: ()
    if link.is_empty() {
        return Ok(String::new());
    }

    // Atom: 123a, b (qualifier)
    let captures = ATOM
        .captures(link)
        .ok_or_else(|| LinkError::Unresolvable(link.to_string()))?;
    let id = captures.get(1).map_or("", |m| m.as_str());

    Ok(format!("<a href=\"#{id}\" class=\"clink\">{link}</a>"))
}
