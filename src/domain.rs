//! Domain logic for catalog conversion.
//!
//! This module contains the conversion engine: link grammar resolution,
//! line classification, the formatting-mode state machine, the description
//! scanner, and the page configuration.

/// Description text scanning and annotation.
pub mod body;

mod config;
pub use config::Config;

/// The line-folding conversion engine and its state machine.
pub mod converter;
pub use converter::{convert, ConvertError, Entry, FormatMode, State};

/// Directive and structural record classification.
pub mod line;
pub use line::{Directive, Record};

/// Cross-reference grammar resolution.
pub mod links;
pub use links::{resolve_expression, LinkError};
