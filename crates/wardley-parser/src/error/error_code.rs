//! Error codes for the map diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Quoted name errors
//! - `E1xx` - Line grammar errors
//! - `E2xx` - Cross-line reference warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Quoted Name Errors (E0xx)
    // =========================================================================
    /// Unterminated quoted name.
    ///
    /// A name was opened with a quote but the line ended before it closed.
    E001,

    /// Invalid escape sequence.
    ///
    /// Valid escapes in quoted names are `\n`, `\"` and `\\`.
    E003,

    // =========================================================================
    // Line Grammar Errors (E1xx)
    // =========================================================================
    /// Unknown statement.
    ///
    /// The line does not start with a keyword and is not a link.
    E100,

    /// Malformed coordinates.
    ///
    /// A bracketed coordinate clause is incomplete or has the wrong arity.
    E101,

    /// Coordinate out of range.
    ///
    /// A normalized coordinate lies outside `[0, 1]`.
    E102,

    /// Unknown decorator.
    ///
    /// A parenthesised decorator is not one of `build`, `buy`, `outsource`,
    /// `market` or `ecosystem`.
    E103,

    /// Trailing text.
    ///
    /// Text follows a complete statement and was ignored.
    E104,

    /// Missing coordinates.
    ///
    /// A positioned element has no coordinate clause and was placed at the
    /// origin.
    E105,

    /// Invalid pipeline block.
    ///
    /// A `{` without a pipeline, a stray `}`, an unclosed block, or a
    /// statement inside a block that is not a member.
    E106,

    /// Malformed statement.
    ///
    /// A keyword was recognised but its arguments could not be read.
    E107,

    // =========================================================================
    // Reference Warnings (E2xx)
    // =========================================================================
    /// Unknown evolve target.
    ///
    /// An `evolve` line names a component that is never defined.
    E200,

    /// Unknown method target.
    ///
    /// A `build`, `buy` or `outsource` line names a component that is never
    /// defined.
    E201,

    /// Unknown pipeline component.
    ///
    /// A pipeline is declared for a component that is never defined.
    E202,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated quoted name",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E100 => "unknown statement",
            ErrorCode::E101 => "malformed coordinates",
            ErrorCode::E102 => "coordinate out of range",
            ErrorCode::E103 => "unknown decorator",
            ErrorCode::E104 => "trailing text",
            ErrorCode::E105 => "missing coordinates",
            ErrorCode::E106 => "invalid pipeline block",
            ErrorCode::E107 => "malformed statement",
            ErrorCode::E200 => "unknown evolve target",
            ErrorCode::E201 => "unknown method target",
            ErrorCode::E202 => "unknown pipeline component",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
