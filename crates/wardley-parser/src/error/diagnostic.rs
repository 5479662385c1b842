//! The core diagnostic type for the map parser.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, the line it was raised on, labeled source spans and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E101]: malformed coordinates
///   --> map.owm:2:18
///    |
///  2 | component Kettle [0.4 0.5]
///    |                  ^^^^^^^^^ expected `[visibility, maturity]`
///    |
///    = help: separate both values with a comma
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    line: Option<usize>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use wardley_parser::error::{Diagnostic, ErrorCode};
    /// # use wardley_parser::Span;
    ///
    /// let diag = Diagnostic::error("unknown statement `compnent`")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(0..8), "not a keyword")
    ///     .with_help("did you mean `component`?");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the 1-based source line, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the 1-based source line.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Moves every label forward by `offset` bytes.
    ///
    /// Line grammar diagnostics are raised relative to the line; this places
    /// them in the whole source.
    pub(crate) fn offset_by(mut self, offset: usize) -> Self {
        self.labels = self
            .labels
            .into_iter()
            .map(|label| label.offset_by(offset))
            .collect();
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            line: None,
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.line().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_line() {
        let diag = Diagnostic::warning("no coordinates").with_line(7);
        assert_eq!(diag.line(), Some(7));
    }

    #[test]
    fn test_diagnostic_offset_moves_all_labels() {
        let diag = Diagnostic::error("block never closed")
            .with_label(Span::new(9..15), "pipeline")
            .with_secondary_label(Span::new(0..8), "keyword")
            .offset_by(20);

        assert_eq!(diag.labels()[0].span(), Span::new(29..35));
        assert_eq!(diag.labels()[1].span(), Span::new(20..28));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unknown statement `compnent`").with_code(ErrorCode::E100);

        assert_eq!(diag.to_string(), "error[E100]: unknown statement `compnent`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::new(Severity::Warning, "unused pipeline");

        assert_eq!(diag.to_string(), "warning: unused pipeline");
    }
}
