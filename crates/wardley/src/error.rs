//! Error types for map operations.
//!
//! This module provides the main error type [`WardleyError`] which wraps the
//! error conditions of parsing, reading and editing map sources.

use std::io;

use thiserror::Error;

use wardley_parser::error::ParseError;

use crate::{
    rename::{LinkContextError, RenameError},
    rewrite::RewriteError,
};

/// The main error type for map operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source next to the structured diagnostics,
/// so callers can render them against the offending lines.
#[derive(Debug, Error)]
pub enum WardleyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Edit error: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),

    #[error("Link context error: {0}")]
    LinkContext(#[from] LinkContextError),
}

impl WardleyError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
