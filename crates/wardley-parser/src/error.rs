//! Error and diagnostic system for the map parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels, since most problems in a map source are recoverable
//! - Diagnostic collector for accumulating problems across lines
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, the 1-based
//! line it was raised on, source locations and help text. A parse never stops
//! at the first problem; [`ParseError`] wraps every diagnostic when a caller
//! asks for a strict parse.
//!
//! # Example
//!
//! ```
//! # use wardley_parser::error::{Diagnostic, ErrorCode};
//! # use wardley_parser::Span;
//!
//! let diag = Diagnostic::warning("coordinate outside [0, 1]")
//!     .with_code(ErrorCode::E102)
//!     .with_line(3)
//!     .with_label(Span::new(42..46), "out of range")
//!     .with_help("visibility and maturity are normalized");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
