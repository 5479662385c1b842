//! # Wardley Parser
//!
//! Parser for the Wardley map source language. A map source is line
//! oriented: every line declares one thing, such as a component, a link, an
//! evolution or an annotation. This crate turns a source into a
//! [`WardleyMap`] together with the diagnostics raised along the way.
//!
//! ## Usage
//!
//! ```
//! # use wardley_parser::parse;
//! let source = "\
//! title Tea Shop
//! component Kettle [0.43, 0.35]
//! component Power [0.1, 0.7]
//! evolve Kettle 0.62
//! Kettle->Power
//! ";
//!
//! let outcome = parse(source);
//! assert!(!outcome.has_errors());
//! assert_eq!(outcome.map().components().count(), 2);
//! assert_eq!(outcome.map().links().len(), 1);
//! ```
//!
//! Parsing never stops at a bad line. The line is skipped, a diagnostic is
//! recorded and the rest of the source still contributes to the map. Use
//! [`parse_strict`] to turn any error diagnostic into a [`ParseError`].
//!
//! Single lines can be parsed with [`parse_line`], which exposes the spans of
//! names and coordinates for editors that rewrite source text in place.

mod builder;
pub mod error;
mod parser;
#[cfg(test)]
mod parser_tests;
mod span;
pub mod statement;
mod string;

pub use span::{Span, Spanned};
pub use string::{escape, format_name, needs_quotes};

use log::debug;

use wardley_core::semantic::WardleyMap;

use builder::Builder;
use error::{Diagnostic, ParseError};
use statement::Statement;

/// The result of a lenient parse: the map and every diagnostic raised.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    map: WardleyMap,
    diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn map(&self) -> &WardleyMap {
        &self.map
    }

    /// All diagnostics in source order, followed by cross-line checks.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` when any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity().is_warning())
    }

    pub fn into_parts(self) -> (WardleyMap, Vec<Diagnostic>) {
        (self.map, self.diagnostics)
    }
}

/// Parse a map source leniently.
///
/// Malformed lines are skipped and reported; this function never fails.
pub fn parse(source: &str) -> ParseOutcome {
    let (map, collector) = Builder::new().build(source);
    let diagnostics = collector.into_diagnostics();
    debug!(diagnostics = diagnostics.len(); "Parse finished");
    ParseOutcome { map, diagnostics }
}

/// Parse a map source, failing when any error diagnostic was raised.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic, warnings included,
/// when at least one of them is an error.
///
/// # Example
///
/// ```
/// # use wardley_parser::parse_strict;
/// assert!(parse_strict("component Kettle [0.4, 0.6]").is_ok());
/// assert!(parse_strict("component Kettle [0.4 0.6]").is_err());
/// ```
pub fn parse_strict(source: &str) -> Result<WardleyMap, ParseError> {
    let (map, collector) = Builder::new().build(source);
    collector.finish()?;
    Ok(map)
}

/// Parse a single line into a [`Statement`].
///
/// Spans in the statement are relative to the start of `line`. Text left
/// after a complete statement is ignored here; [`parse`] reports it.
///
/// # Errors
///
/// Returns the [`Diagnostic`] describing why the line is malformed.
///
/// # Example
///
/// ```
/// # use wardley_parser::{parse_line, statement::Statement};
/// let Ok(Statement::Element(element)) = parse_line("component Kettle [0.4, 0.6]") else {
///     panic!("expected an element");
/// };
/// assert_eq!(element.name.inner(), "Kettle");
/// assert_eq!(element.name.span().range(), 10..16);
/// ```
pub fn parse_line(line: &str) -> Result<Statement, Diagnostic> {
    parser::statement(line).map(|parsed| parsed.statement)
}
