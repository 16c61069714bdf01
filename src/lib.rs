//! Plotto catalog conversion
//!
//! The Plotto catalog is a plain-text document of numbered "conflict"
//! entries, grouped by theme and cross-referenced through a small link
//! grammar. This crate converts the catalog into a single HTML page with
//! working internal hyperlinks between entries.

pub mod domain;
pub use domain::{convert, Config, ConvertError, LinkError, State};

pub mod render;
pub use render::{DocumentWriter, HtmlWriter};
