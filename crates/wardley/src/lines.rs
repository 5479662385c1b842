//! Line-level access to a map source.
//!
//! Edits replace whole lines. Everything here keeps the original line endings
//! so untouched lines come back byte for byte.

use wardley_parser::statement::Statement;

/// One source line split from its line ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'s> {
    /// 1-based line number.
    pub number: usize,
    pub content: &'s str,
    /// `"\n"`, `"\r\n"` or empty for a last line without one.
    pub ending: &'s str,
}

/// Splits `text` into lines, keeping every byte.
pub(crate) fn source_lines(text: &str) -> impl Iterator<Item = SourceLine<'_>> {
    text.split_inclusive('\n')
        .enumerate()
        .map(|(index, raw)| {
            let content = raw.trim_end_matches(['\n', '\r']);
            SourceLine {
                number: index + 1,
                content,
                ending: &raw[content.len()..],
            }
        })
}

/// Rebuilds `text` with some lines replaced or removed.
///
/// `edit` returns `None` to keep a line, `Some(Some(content))` to replace its
/// content and `Some(None)` to drop it together with its ending.
pub(crate) fn rebuild<F>(text: &str, mut edit: F) -> String
where
    F: FnMut(&SourceLine<'_>) -> Option<Option<String>>,
{
    let mut output = String::with_capacity(text.len() + 16);
    for line in source_lines(text) {
        match edit(&line) {
            None => {
                output.push_str(line.content);
                output.push_str(line.ending);
            }
            Some(Some(content)) => {
                output.push_str(&content);
                output.push_str(line.ending);
            }
            Some(None) => {}
        }
    }
    output
}

/// Tracks whether lines sit inside a `pipeline` block.
///
/// A `{` opens the block when it ends the pipeline line or stands alone on a
/// following line, with only blank lines and comments in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BlockTracker {
    state: BlockState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum BlockState {
    #[default]
    Closed,
    Pending,
    Open,
}

impl BlockTracker {
    /// Feeds the next line and returns `true` when it lies inside a block.
    ///
    /// Lines that did not parse leave the state untouched.
    pub fn observe(&mut self, statement: Option<&Statement>) -> bool {
        let Some(statement) = statement else {
            return self.state == BlockState::Open;
        };

        match (self.state, statement) {
            (BlockState::Open, Statement::BlockClose) => {
                self.state = BlockState::Closed;
                true
            }
            (BlockState::Open, _) => true,
            (_, Statement::Blank | Statement::Comment) => false,
            (BlockState::Pending, Statement::BlockOpen) => {
                self.state = BlockState::Open;
                false
            }
            (_, Statement::Pipeline(pipeline)) => {
                self.state = if pipeline.opens_block {
                    BlockState::Open
                } else {
                    BlockState::Pending
                };
                false
            }
            _ => {
                self.state = BlockState::Closed;
                false
            }
        }
    }
}
