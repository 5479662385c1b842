//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic.
///
/// Neither level aborts a parse. Severity decides whether a strict parse
/// fails:
/// - [`Severity::Error`] marks a line that was skipped
/// - [`Severity::Warning`] marks a line that was kept with a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The line could not be interpreted and contributed nothing to the map.
    Error,

    /// The line was interpreted, but something about it looks wrong.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
