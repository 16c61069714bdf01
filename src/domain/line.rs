//! Line classification for the catalog's directive and record grammar.
//!
//! Every physical line is either a comment-prefixed [`Directive`] or, when
//! no formatting mode has claimed it, a structural [`Record`]. Both are
//! classified into explicit sum types so the priority order of the grammar
//! is a visible, testable property rather than regex fallthrough.

use std::sync::LazyLock;

use regex::Regex;

static GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ConflictGroup\{(.+)\}$").expect("valid group pattern"));
static SUBGROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ConflictSubGroup\{(.+)\}$").expect("valid subgroup pattern"));
static CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^B\{(\d+)\} (.*)$").expect("valid clause pattern"));
static CONFLICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Conflict\{(\d+)\}$").expect("valid conflict pattern"));
static PRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\((?P<subid>[a-m])\) )?PRE: (?P<refs>.*)$").expect("valid PRE pattern")
});
static POST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^POST: (?P<refs>.*)$").expect("valid POST pattern"));

/// A control line starting with the `--` comment prefix.
///
/// Directives select how following raw lines are wrapped; anything
/// unrecognised after the prefix is an ordinary comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Bare `FORMAT`: cancel the active formatting mode, emit nothing.
    Cancel,
    /// `FORMAT_BEGIN_LINES:<class>`: open a container and emit each
    /// following line with a line break.
    BeginLines(&'a str),
    /// `FORMAT_BEGIN:<class>`: open a container and group following lines
    /// into blank-line-separated paragraphs.
    BeginParagraphs(&'a str),
    /// `FORMAT_END`: close the open container.
    End,
    /// `FORMAT:<class>`: wrap exactly the next line in a tagged container.
    NextLine(&'a str),
    /// `FORMAT_LINKS:<class>`: resolve exactly the next line as a reference
    /// expression, keeping an optional `(a)` label.
    NextLinks(&'a str),
    /// `HR`: emit a horizontal rule. Leaves the mode untouched.
    Rule,
    /// Any other comment line; ignored.
    Comment,
}

impl<'a> Directive<'a> {
    /// Classifies a comment-prefixed line, or returns `None` when the line
    /// does not start with `--`.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix("--")?;
        let Some(body) = rest.strip_prefix(' ') else {
            return Some(Self::Comment);
        };

        if let Some(class) = body.strip_prefix("FORMAT_BEGIN_LINES:") {
            return Some(Self::BeginLines(class));
        }
        if let Some(class) = body.strip_prefix("FORMAT_BEGIN:") {
            return Some(Self::BeginParagraphs(class));
        }
        if body.starts_with("FORMAT_END") {
            return Some(Self::End);
        }
        if let Some(class) = body.strip_prefix("FORMAT:") {
            return Some(Self::NextLine(class));
        }
        if let Some(class) = body.strip_prefix("FORMAT_LINKS:") {
            return Some(Self::NextLinks(class));
        }
        if body.starts_with("FORMAT") {
            return Some(Self::Cancel);
        }
        if body.starts_with("HR") {
            return Some(Self::Rule);
        }
        Some(Self::Comment)
    }

    /// Whether this directive cancels the active formatting mode before
    /// taking effect.
    ///
    /// The whole `FORMAT` family cancels; `HR` and plain comments do not.
    #[must_use]
    pub const fn cancels_formatting(&self) -> bool {
        !matches!(self, Self::Rule | Self::Comment)
    }
}

/// A structural record line, matched in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    /// `ConflictGroup{name}`: a top-level category label.
    Group(&'a str),
    /// `ConflictSubGroup{name}`: a category nested under the current group.
    Subgroup(&'a str),
    /// `B{id} name`: a numbered clause heading.
    Clause {
        /// The clause number.
        id: &'a str,
        /// The clause name.
        name: &'a str,
    },
    /// `Conflict{id}`: the start of a new entry.
    Conflict(&'a str),
    /// `(a) PRE: refs` or `PRE: refs`: a precondition branch of the current
    /// entry.
    Pre {
        /// The optional lowercase branch tag.
        subid: Option<&'a str>,
        /// The unparsed reference expression.
        refs: &'a str,
    },
    /// `POST: refs`: the outcome references closing the current entry.
    Post(&'a str),
    /// Anything else: free text, meaningful only inside an open entry.
    Text(&'a str),
}

impl<'a> Record<'a> {
    /// Classifies a line against the record patterns, first match wins.
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        if let Some(captures) = GROUP.captures(line) {
            return Self::Group(captures.get(1).map_or("", |m| m.as_str()));
        }
        if let Some(captures) = SUBGROUP.captures(line) {
            return Self::Subgroup(captures.get(1).map_or("", |m| m.as_str()));
        }
        if let Some(captures) = CLAUSE.captures(line) {
            return Self::Clause {
                id: captures.get(1).map_or("", |m| m.as_str()),
                name: captures.get(2).map_or("", |m| m.as_str()),
            };
        }
        if let Some(captures) = CONFLICT.captures(line) {
            return Self::Conflict(captures.get(1).map_or("", |m| m.as_str()));
        }
        if let Some(captures) = PRE.captures(line) {
            return Self::Pre {
                subid: captures.name("subid").map(|m| m.as_str()),
                refs: captures.name("refs").map_or("", |m| m.as_str()),
            };
        }
        if let Some(captures) = POST.captures(line) {
            return Self::Post(captures.name("refs").map_or("", |m| m.as_str()));
        }
        Self::Text(line)
    }
}
