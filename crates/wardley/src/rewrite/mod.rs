//! Writing edits back into map source text.
//!
//! An edit names a [`Target`] and an [`Update`]. The engine walks the source
//! line by line, parses each line and narrows it to the part the target
//! addresses. On the first line where that works, the call site's strategy
//! chain is tried in order and the first matching strategy rewrites the line.
//! Every other line, line endings included, is copied unchanged.
//!
//! # Example
//!
//! ```
//! # use wardley::rewrite::{Target, Update, update_position};
//! # use wardley_core::geometry::Position;
//! let source = "component Power [0.9, 0.2]\ncomponent Kettle [0.5,0.6]\nPower->Kettle\n";
//! let edited = update_position(
//!     source,
//!     &Target::element("Kettle"),
//!     Update::Position(Position::new(0.55, 0.62)),
//! );
//! assert_eq!(
//!     edited,
//!     "component Power [0.9, 0.2]\ncomponent Kettle [0.55, 0.62]\nPower->Kettle\n"
//! );
//! ```

mod annotation;
mod strategy;
mod target;

pub use target::{Target, TargetKind, Update};

use log::{debug, trace};
use thiserror::Error;

use wardley_core::geometry::DEFAULT_PRECISION;
use wardley_parser::parse_line;

use crate::lines::{BlockTracker, rebuild, source_lines};

use strategy::{Strategy, Subject};

/// Why an edit left the source unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("no line defines the {target}")]
    TargetNotFound { target: String },

    #[error("the {target} cannot take {update}")]
    UnsupportedUpdate { target: String, update: &'static str },

    #[error("annotation {number} has no occurrence {occurrence}")]
    OccurrenceNotFound { number: u32, occurrence: usize },

    #[error("the line of the {target} cannot be rewritten")]
    NotApplicable { target: String },
}

/// Applies edits with a fixed coordinate precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rewriter {
    precision: usize,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl Rewriter {
    /// Creates a rewriter writing `precision` decimal places.
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Applies `update` to the line responsible for `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`RewriteError`] when the target takes no such update, when
    /// no line addresses it, or when the addressed line cannot take it.
    pub fn try_update_position(
        &self,
        text: &str,
        target: &Target,
        update: Update,
    ) -> Result<String, RewriteError> {
        let chain = Strategy::chain(target.kind(), &update);
        if chain.is_empty() {
            return Err(RewriteError::UnsupportedUpdate {
                target: target.to_string(),
                update: update.name(),
            });
        }

        let mut tracker = BlockTracker::default();
        let mut located = false;
        let mut rewritten = None;

        for line in source_lines(text) {
            let statement = parse_line(line.content).ok();
            let in_block = tracker.observe(statement.as_ref());
            if target.line().is_some_and(|hint| hint != line.number) {
                continue;
            }
            let Some(statement) = statement else {
                continue;
            };
            let Some(subject) = Subject::locate(&statement, target.kind(), in_block) else {
                continue;
            };
            located = true;

            let Some(strategy) = chain.iter().find(|strategy| strategy.matches(&subject)) else {
                continue;
            };
            trace!(line = line.number, strategy:? = strategy; "Strategy matched");
            if let Some(content) =
                strategy.apply(line.content, &subject, target.kind(), &update, self.precision)
            {
                rewritten = Some((line.number, content));
                break;
            }
        }

        let Some((number, content)) = rewritten else {
            return Err(match target.kind() {
                _ if !located => RewriteError::TargetNotFound {
                    target: target.to_string(),
                },
                TargetKind::Annotation { number, occurrence } => RewriteError::OccurrenceNotFound {
                    number: *number,
                    occurrence: *occurrence,
                },
                _ => RewriteError::NotApplicable {
                    target: target.to_string(),
                },
            });
        };

        debug!(target = target.to_string(), line = number; "Line rewritten");
        let mut content = Some(content);
        Ok(rebuild(text, |line| {
            if line.number == number {
                content.take().map(Some)
            } else {
                None
            }
        }))
    }

    /// Applies `update` like [`try_update_position`](Self::try_update_position),
    /// returning `text` unchanged when the edit does not apply.
    pub fn update_position(&self, text: &str, target: &Target, update: Update) -> String {
        match self.try_update_position(text, target, update) {
            Ok(edited) => edited,
            Err(err) => {
                debug!(error = err.to_string(); "Edit left the source unchanged");
                text.to_string()
            }
        }
    }
}

/// Applies `update` with the default precision, returning `text` unchanged
/// when the edit does not apply.
pub fn update_position(text: &str, target: &Target, update: Update) -> String {
    Rewriter::default().update_position(text, target, update)
}

/// Applies `update` with the default precision.
///
/// # Errors
///
/// See [`Rewriter::try_update_position`].
pub fn try_update_position(text: &str, target: &Target, update: Update) -> Result<String, RewriteError> {
    Rewriter::default().try_update_position(text, target, update)
}
