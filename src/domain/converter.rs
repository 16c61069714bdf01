//! The line-oriented conversion engine.
//!
//! [`convert`] folds [`State::step`] over the catalog's physical lines.
//! Directives are handled first, then any active formatting mode consumes
//! the raw line, and only then is the line matched as a structural record.
//! The state is an explicit record returned from each step, so transitions
//! can be exercised in isolation.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    body,
    line::{Directive, Record},
    links::{self, LinkError},
};
use crate::render::DocumentWriter;

/// Optional `(a)` label in front of a `FORMAT_LINKS` target line.
static LINKS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(([a-d])\) (.*)$").expect("valid label pattern"));

/// Errors arising during conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A reference expression matched no production of the link grammar.
    #[error("conflict {id}: {source}")]
    Link {
        /// The id of the entry being processed, empty before the first
        /// `Conflict{}` record.
        id: String,
        /// The underlying grammar error.
        #[source]
        source: LinkError,
    },

    /// A `POST:` record was seen with no open `PRE:` region.
    #[error("conflict {id}: POST record without an open PRE region")]
    UnmatchedPost {
        /// The id of the entry being processed.
        id: String,
    },

    /// The document writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The active formatting mode selected by a `FORMAT` directive.
///
/// At most one mode is active at a time; each carries the CSS class of its
/// container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatMode {
    /// Blank-line-separated paragraphs inside an open container.
    Paragraphs(String),
    /// Every line emitted with a trailing line break.
    Lines(String),
    /// Exactly one following line, wrapped in a tagged container.
    NextLine(String),
    /// Exactly one following line, resolved as a reference expression.
    NextLinks(String),
}

/// The entry currently being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: String,
    branches: Vec<String>,
}

impl Entry {
    /// The entry's numeric id, as written in the catalog.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Branch tags in declaration order; an untagged `PRE:` records the
    /// empty string. Duplicates are accepted as-is.
    #[must_use]
    pub fn branches(&self) -> &[String] {
        &self.branches
    }
}

/// Parser state threaded through line processing.
///
/// Group and entry fields are single "current pointers": once replaced,
/// the prior value is gone, matching the linear document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Current group name; its header is emitted lazily at the next
    /// subgroup record.
    group: String,
    entry: Option<Entry>,
    mode: Option<FormatMode>,
    /// Set while inside an open PRE/POST region.
    in_conflict: bool,
    /// Suppresses repeated paragraph breaks on consecutive blank lines.
    blank_line: bool,
    /// Raw description lines accumulated for the open region.
    text: Vec<String>,
}

impl State {
    /// The active formatting mode, if any.
    #[must_use]
    pub const fn mode(&self) -> Option<&FormatMode> {
        self.mode.as_ref()
    }

    /// Whether a PRE/POST region is open.
    #[must_use]
    pub const fn in_conflict(&self) -> bool {
        self.in_conflict
    }

    /// The entry currently being assembled, if any.
    #[must_use]
    pub const fn entry(&self) -> Option<&Entry> {
        self.entry.as_ref()
    }

    fn current_id(&self) -> String {
        self.entry.as_ref().map_or_else(String::new, |e| e.id.clone())
    }

    /// Consumes one physical line and returns the successor state.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvertError`] on a malformed reference expression, a
    /// `POST:` record outside an open region, or a writer failure.
    pub fn step<W: DocumentWriter>(
        mut self,
        line: &str,
        writer: &mut W,
    ) -> Result<Self, ConvertError> {
        if let Some(directive) = Directive::parse(line) {
            return self.apply_directive(directive, writer);
        }
        if let Some(mode) = self.mode.take() {
            return self.consume_in_mode(mode, line, writer);
        }
        self.apply_record(Record::classify(line), writer)
    }

    fn apply_directive<W: DocumentWriter>(
        mut self,
        directive: Directive,
        writer: &mut W,
    ) -> Result<Self, ConvertError> {
        // The whole FORMAT family cancels the active mode before acting;
        // FORMAT_END's closing tag relies on this rather than clearing
        // anything itself.
        if directive.cancels_formatting() {
            self.mode = None;
        }
        match directive {
            Directive::BeginLines(class) => {
                self.mode = Some(FormatMode::Lines(class.to_string()));
                writer.open_block(class)?;
            }
            Directive::BeginParagraphs(class) => {
                self.mode = Some(FormatMode::Paragraphs(class.to_string()));
                writer.open_block(class)?;
            }
            Directive::End => writer.close_block()?,
            Directive::NextLine(class) => {
                self.mode = Some(FormatMode::NextLine(class.to_string()));
            }
            Directive::NextLinks(class) => {
                self.mode = Some(FormatMode::NextLinks(class.to_string()));
            }
            Directive::Rule => writer.rule()?,
            Directive::Cancel | Directive::Comment => {}
        }
        Ok(self)
    }

    fn consume_in_mode<W: DocumentWriter>(
        mut self,
        mode: FormatMode,
        line: &str,
        writer: &mut W,
    ) -> Result<Self, ConvertError> {
        match mode {
            FormatMode::Paragraphs(class) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    if !self.blank_line {
                        writer.paragraph_break(&class)?;
                        self.blank_line = true;
                    }
                } else {
                    writer.text_line(trimmed)?;
                    self.blank_line = false;
                }
                self.mode = Some(FormatMode::Paragraphs(class));
            }
            FormatMode::Lines(class) => {
                writer.broken_line(line.trim())?;
                self.mode = Some(FormatMode::Lines(class));
            }
            // The one-shot modes consume this line and leave the mode clear.
            FormatMode::NextLine(class) => {
                writer.tagged_line(&class, line.trim())?;
            }
            FormatMode::NextLinks(class) => {
                let (label, refs) = LINKS_LABEL.captures(line).map_or((None, line), |captures| {
                    (
                        captures.get(1).map(|m| m.as_str()),
                        captures.get(2).map_or("", |m| m.as_str()),
                    )
                });
                let html = links::resolve_expression(refs.trim())
                    .map_err(|source| ConvertError::Link {
                        id: self.current_id(),
                        source,
                    })?;
                writer.linked_line(&class, label, &html)?;
            }
        }
        Ok(self)
    }

    fn apply_record<W: DocumentWriter>(
        mut self,
        record: Record,
        writer: &mut W,
    ) -> Result<Self, ConvertError> {
        match record {
            Record::Group(name) => {
                // Header deferred until the next subgroup record.
                self.group = name.to_string();
            }
            Record::Subgroup(name) => {
                writer.group_header(&self.group)?;
                writer.subgroup_header(name)?;
            }
            Record::Clause { id, name } => writer.clause_header(id, name)?,
            Record::Conflict(id) => {
                tracing::debug!("conflict {id}");
                self.entry = Some(Entry {
                    id: id.to_string(),
                    branches: Vec::new(),
                });
                writer.conflict_header(id)?;
            }
            Record::Pre { subid, refs } => {
                self.in_conflict = true;
                self.text.clear();
                if let Some(entry) = self.entry.as_mut() {
                    entry.branches.push(subid.unwrap_or("").to_string());
                }
                let html = links::resolve_expression(refs).map_err(|source| {
                    ConvertError::Link {
                        id: self.current_id(),
                        source,
                    }
                })?;
                writer.conflict_subheader(subid, &html)?;
            }
            Record::Post(refs) => {
                if !self.in_conflict {
                    return Err(ConvertError::UnmatchedPost {
                        id: self.current_id(),
                    });
                }
                self.in_conflict = false;
                let html = links::resolve_expression(refs).map_err(|source| {
                    ConvertError::Link {
                        id: self.current_id(),
                        source,
                    }
                })?;
                let description =
                    body::annotate(&self.text).map_err(|source| ConvertError::Link {
                        id: self.current_id(),
                        source,
                    })?;
                writer.conflict_body(&description, &html)?;
            }
            Record::Text(raw) => {
                if self.in_conflict {
                    self.text.push(raw.to_string());
                }
            }
        }
        Ok(self)
    }
}

/// Runs the full conversion: page chrome, one pass over the lines in input
/// order, closing chrome.
///
/// # Errors
///
/// Returns the first [`ConvertError`] encountered; no partial-output
/// suppression is attempted.
pub fn convert<'a, I, W>(lines: I, writer: &mut W) -> Result<(), ConvertError>
where
    I: IntoIterator<Item = &'a str>,
    W: DocumentWriter,
{
    writer.begin_document()?;
    let mut state = State::default();
    for line in lines {
        state = state.step(line, writer)?;
    }
    writer.end_document()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Config, render::HtmlWriter};

    /// Runs lines through a fresh state and a body-only writer, returning
    /// the final state and the emitted fragments.
    fn run(lines: &[&str]) -> (State, String) {
        let mut writer = HtmlWriter::new(Vec::new(), Config::default());
        let mut state = State::default();
        for &line in lines {
            state = state.step(line, &mut writer).expect("step should succeed");
        }
        let html = String::from_utf8(writer.into_inner()).unwrap();
        (state, html)
    }

    #[test]
    fn group_header_is_deferred_until_subgroup() {
        let (_, html) = run(&["ConflictGroup{Love and Courtship}"]);
        assert_eq!(html, "");

        let (_, html) = run(&[
            "ConflictGroup{Love and Courtship}",
            "ConflictSubGroup{Beginnings}",
        ]);
        assert_eq!(
            html,
            "\n<div class=\"group\">Love and Courtship</div>\n\
             \n<div class=\"subgroup\">Beginnings</div>\n"
        );
    }

    #[test]
    fn clause_header_is_emitted_immediately() {
        let (_, html) = run(&["B{3} Misfortune"]);
        assert_eq!(html, "\n<div class=\"bclause\">(3) Misfortune</div>\n");
    }

    #[test]
    fn full_entry_renders_in_order() {
        let (state, html) = run(&["Conflict{1}", "PRE: (2a)", "some text", "POST: (3)"]);

        let header = html.find("<div class=\"conflictid\" id=\"1\">1</div>").unwrap();
        let pre = html
            .find("<div class=\"prelinks\"><span class=\"clinkgroup\">\
                   <a href=\"#2\" class=\"clink\">2a</a></span></div>")
            .unwrap();
        let desc = html.find("<div class=\"desc\">some text</div>").unwrap();
        let post = html
            .find("<div class=\"postlinks\"><span class=\"clinkgroup\">\
                   <a href=\"#3\" class=\"clink\">3</a></span></div>")
            .unwrap();
        assert!(header < pre && pre < desc && desc < post);

        assert!(!state.in_conflict());
        assert_eq!(state.entry().unwrap().id(), "1");
        assert_eq!(state.entry().unwrap().branches(), [String::new()]);
    }

    #[test]
    fn tagged_branches_are_recorded_in_order() {
        let (state, html) = run(&[
            "Conflict{7}",
            "(a) PRE: (12)",
            "first variant",
            "POST: (13)",
            "(b) PRE: (14)",
            "second variant",
            "POST: (15)",
        ]);
        assert_eq!(
            state.entry().unwrap().branches(),
            ["a".to_string(), "b".to_string()]
        );
        assert!(html.contains("<span class=\"subid\">a</span> "));
        assert!(html.contains("<span class=\"subid\">b</span> "));
    }

    #[test]
    fn post_without_open_region_is_a_protocol_error() {
        let mut writer = HtmlWriter::new(Vec::new(), Config::default());
        let state = State::default()
            .step("Conflict{9}", &mut writer)
            .unwrap();
        let error = state.step("POST: (3)", &mut writer).unwrap_err();
        assert!(matches!(error, ConvertError::UnmatchedPost { id } if id == "9"));
    }

    #[test]
    fn free_text_outside_a_region_is_dropped() {
        let (_, html) = run(&["stray text before any entry"]);
        assert_eq!(html, "");
    }

    #[test]
    fn grammar_errors_name_the_current_entry() {
        let mut writer = HtmlWriter::new(Vec::new(), Config::default());
        let state = State::default()
            .step("Conflict{42}", &mut writer)
            .unwrap();
        let error = state.step("PRE: bogus", &mut writer).unwrap_err();
        assert!(matches!(error, ConvertError::Link { id, .. } if id == "42"));
    }

    #[test]
    fn bare_format_cancels_every_mode() {
        for begin in [
            "-- FORMAT_BEGIN:intro",
            "-- FORMAT_BEGIN_LINES:poem",
            "-- FORMAT:title",
            "-- FORMAT_LINKS:xref",
        ] {
            let (state, _) = run(&[begin, "-- FORMAT"]);
            assert_eq!(state.mode(), None, "mode left active after {begin}");
        }
    }

    #[test]
    fn lines_mode_appends_breaks_until_cancelled() {
        // Bare FORMAT cancels the mode without closing the div.
        let (state, html) = run(&[
            "-- FORMAT_BEGIN_LINES:poem",
            "first line",
            "second line",
            "-- FORMAT",
        ]);
        assert_eq!(state.mode(), None);
        assert_eq!(
            html,
            "<div class=\"poem\">\nfirst line<br/>\nsecond line<br/>\n"
        );
        // Regression: the container stays unclosed unless FORMAT_END appears.
        assert!(!html.contains("</div>"));
    }

    #[test]
    fn format_end_closes_the_container() {
        let (state, html) = run(&[
            "-- FORMAT_BEGIN_LINES:poem",
            "only line",
            "-- FORMAT_END",
        ]);
        assert_eq!(state.mode(), None);
        assert_eq!(html, "<div class=\"poem\">\nonly line<br/>\n</div>\n");
    }

    #[test]
    fn paragraph_mode_collapses_consecutive_blanks() {
        let (_, html) = run(&[
            "-- FORMAT_BEGIN:intro",
            "first para",
            "",
            "",
            "second para",
            "-- FORMAT_END",
        ]);
        assert_eq!(
            html,
            "<div class=\"intro\">\nfirst para\n\
             </div><div class=\"intro\">\nsecond para\n</div>\n"
        );
    }

    #[test]
    fn next_line_mode_consumes_exactly_one_line() {
        let (state, html) = run(&["-- FORMAT:title", "The Title", "Conflict{5}"]);
        assert_eq!(state.mode(), None);
        assert!(html.starts_with("<div class=\"title\">The Title</div>\n"));
        // The second line reverts to structural matching.
        assert!(html.contains("<div class=\"conflictid\" id=\"5\">5</div>"));
    }

    #[test]
    fn links_mode_consumes_one_line_and_keeps_the_label() {
        let (state, html) = run(&["-- FORMAT_LINKS:xref", "(a) (123) (456)"]);
        assert_eq!(state.mode(), None);
        assert_eq!(
            html,
            "<div class=\"xref\">(a)<span class=\"clinkgroup\">\
             <a href=\"#123\" class=\"clink\">123</a></span> \
             <span class=\"clinkgroup\"><a href=\"#456\" class=\"clink\">456</a></span></div>\n"
        );
    }

    #[test]
    fn links_mode_without_label_resolves_whole_line() {
        let (_, html) = run(&["-- FORMAT_LINKS:xref", "(123)"]);
        assert_eq!(
            html,
            "<div class=\"xref\"><span class=\"clinkgroup\">\
             <a href=\"#123\" class=\"clink\">123</a></span></div>\n"
        );
    }

    #[test]
    fn hr_directive_emits_a_rule_without_touching_the_mode() {
        let (state, html) = run(&["-- FORMAT_BEGIN_LINES:poem", "-- HR", "still here"]);
        assert!(matches!(state.mode(), Some(FormatMode::Lines(class)) if class == "poem"));
        assert_eq!(html, "<div class=\"poem\">\n<hr/>\nstill here<br/>\n");
    }

    #[test]
    fn comments_are_ignored_everywhere() {
        let (state, html) = run(&["-- a note", "--another", "Conflict{2}", "-- mid-entry note"]);
        assert_eq!(state.entry().unwrap().id(), "2");
        assert_eq!(html, "\n<div class=\"conflictid\" id=\"2\">2</div>\n");
    }

    #[test]
    fn description_references_are_annotated() {
        let (_, html) = run(&[
            "Conflict{10}",
            "PRE: (11)",
            "A, as in (123a), struggles",
            "against odds (aided by B).",
            "POST: (12)",
        ]);
        assert!(html.contains(
            "<div class=\"desc\">A, as in <span class=\"clinkgroup\">\
             <a href=\"#123\" class=\"clink\">123a</a></span>, struggles \
             against odds (aided by B).</div>"
        ));
    }

    #[test]
    fn convert_wraps_fragments_in_page_chrome() {
        let mut writer = HtmlWriter::new(Vec::new(), Config::default());
        convert(["Conflict{1}", "PRE: (2)", "text", "POST: (3)"], &mut writer).unwrap();
        let html = String::from_utf8(writer.into_inner()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>\n"));
        assert!(html.contains("<div class=\"conflictid\" id=\"1\">1</div>"));
        assert!(html.ends_with("</div>\n</body>\n</html>\n"));
    }
}
