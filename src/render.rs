//! Document assembly.
//!
//! The conversion engine emits rendered fragments through the
//! [`DocumentWriter`] trait and never touches markup layout itself;
//! [`HtmlWriter`] is the production implementation. Keeping the seam here
//! lets the engine be exercised against an in-memory sink.

use std::io;

mod html;
pub use html::HtmlWriter;

/// Sink for rendered catalog fragments.
///
/// The engine calls these methods in input order; implementations append
/// and never reorder. Every method returns any error raised by the
/// underlying sink.
#[allow(clippy::missing_errors_doc)]
pub trait DocumentWriter {
    /// Emits the fixed page chrome preceding the catalog body.
    fn begin_document(&mut self) -> io::Result<()>;

    /// Emits the closing page chrome.
    fn end_document(&mut self) -> io::Result<()>;

    /// Emits a group header.
    fn group_header(&mut self, name: &str) -> io::Result<()>;

    /// Emits a subgroup header.
    fn subgroup_header(&mut self, name: &str) -> io::Result<()>;

    /// Emits a numbered clause header.
    fn clause_header(&mut self, id: &str, name: &str) -> io::Result<()>;

    /// Emits an entry header; `id` is both the anchor and the visible text.
    fn conflict_header(&mut self, id: &str) -> io::Result<()>;

    /// Emits a branch sub-header with resolved precondition links.
    fn conflict_subheader(&mut self, subid: Option<&str>, links: &str) -> io::Result<()>;

    /// Emits an entry's annotated description followed by its resolved
    /// outcome links.
    fn conflict_body(&mut self, description: &str, links: &str) -> io::Result<()>;

    /// Opens a tagged container block.
    fn open_block(&mut self, class: &str) -> io::Result<()>;

    /// Closes the open container block.
    fn close_block(&mut self) -> io::Result<()>;

    /// Closes and reopens the current paragraph container.
    fn paragraph_break(&mut self, class: &str) -> io::Result<()>;

    /// Emits a plain text line.
    fn text_line(&mut self, text: &str) -> io::Result<()>;

    /// Emits a text line with a trailing line break.
    fn broken_line(&mut self, text: &str) -> io::Result<()>;

    /// Emits a single line wrapped in a tagged container.
    fn tagged_line(&mut self, class: &str, text: &str) -> io::Result<()>;

    /// Emits resolved links in a tagged container, with an optional
    /// single-letter label.
    fn linked_line(&mut self, class: &str, label: Option<&str>, links: &str) -> io::Result<()>;

    /// Emits a horizontal rule.
    fn rule(&mut self) -> io::Result<()>;
}
