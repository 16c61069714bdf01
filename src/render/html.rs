//! The HTML page implementation of [`DocumentWriter`].
//!
//! Fragment markup matches the published Plotto page byte for byte; the
//! head and navbar are driven by [`Config`]. No escaping is performed;
//! the catalog is trusted input.

use std::io::{self, Write};

use super::DocumentWriter;
use crate::domain::Config;

/// Writes the catalog as a single HTML document to an [`io::Write`] sink.
#[derive(Debug)]
pub struct HtmlWriter<W> {
    out: W,
    config: Config,
}

impl<W: Write> HtmlWriter<W> {
    /// Creates a writer over `out` with the given page configuration.
    #[must_use]
    pub const fn new(out: W, config: Config) -> Self {
        Self { out, config }
    }

    /// Flushes and returns the underlying sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn navbar(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "<nav class=\"navbar navbar-inverse navbar-static-top\">"
        )?;
        writeln!(self.out, "\t<div class=\"container\">")?;
        writeln!(self.out, "\t\t<div class=\"navbar-header\">")?;
        writeln!(
            self.out,
            "\t\t\t<a class=\"navbar-brand\" href=\"{}\">{}</a>",
            self.config.brand_href(),
            self.config.brand()
        )?;
        writeln!(self.out, "\t\t</div>")?;
        writeln!(self.out, "\t</div>")?;
        writeln!(self.out, "</nav>")
    }
}

impl<W: Write> DocumentWriter for HtmlWriter<W> {
    fn begin_document(&mut self) -> io::Result<()> {
        writeln!(self.out, "<!DOCTYPE html>")?;
        writeln!(self.out, "<html lang=\"en\">")?;
        writeln!(self.out, "<head>")?;
        writeln!(self.out, "\t<meta charset=\"utf-8\">")?;
        writeln!(
            self.out,
            "\t<meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">"
        )?;
        writeln!(
            self.out,
            "\t<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(self.out, "\t<title>{}</title>", self.config.title())?;
        for href in self.config.stylesheets() {
            writeln!(
                self.out,
                "\t<link rel=\"stylesheet\" type=\"text/css\" href=\"{href}\"/>"
            )?;
        }
        writeln!(self.out, "</head>")?;
        writeln!(self.out, "<body>")?;

        self.navbar()?;

        writeln!(self.out, "<div class=\"container\">")
    }

    fn end_document(&mut self) -> io::Result<()> {
        writeln!(self.out, "</div>")?;
        writeln!(self.out, "</body>")?;
        writeln!(self.out, "</html>")?;
        self.out.flush()
    }

    fn group_header(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "\n<div class=\"group\">{name}</div>")
    }

    fn subgroup_header(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "\n<div class=\"subgroup\">{name}</div>")
    }

    fn clause_header(&mut self, id: &str, name: &str) -> io::Result<()> {
        writeln!(self.out, "\n<div class=\"bclause\">({id}) {name}</div>")
    }

    fn conflict_header(&mut self, id: &str) -> io::Result<()> {
        writeln!(self.out, "\n<div class=\"conflictid\" id=\"{id}\">{id}</div>")
    }

    fn conflict_subheader(&mut self, subid: Option<&str>, links: &str) -> io::Result<()> {
        let prefix = subid.map_or_else(String::new, |tag| {
            format!("<span class=\"subid\">{tag}</span> ")
        });
        writeln!(self.out, "\n<div class=\"prelinks\">{prefix}{links}</div>")
    }

    fn conflict_body(&mut self, description: &str, links: &str) -> io::Result<()> {
        writeln!(self.out, "<div class=\"desc\">{description}</div>")?;
        writeln!(self.out, "<div class=\"postlinks\">{links}</div>")
    }

    fn open_block(&mut self, class: &str) -> io::Result<()> {
        writeln!(self.out, "<div class=\"{class}\">")
    }

    fn close_block(&mut self) -> io::Result<()> {
        writeln!(self.out, "</div>")
    }

    fn paragraph_break(&mut self, class: &str) -> io::Result<()> {
        writeln!(self.out, "</div><div class=\"{class}\">")
    }

    fn text_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn broken_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}<br/>")
    }

    fn tagged_line(&mut self, class: &str, text: &str) -> io::Result<()> {
        writeln!(self.out, "<div class=\"{class}\">{text}</div>")
    }

    fn linked_line(&mut self, class: &str, label: Option<&str>, links: &str) -> io::Result<()> {
        let prefix = label.map_or_else(String::new, |letter| format!("({letter})"));
        writeln!(self.out, "<div class=\"{class}\">{prefix}{links}</div>")
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "<hr/>")
    }
}
