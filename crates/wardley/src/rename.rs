//! Text edits that work on names rather than coordinates.
//!
//! Renames rewrite the exact spans the line grammar reports for a name, so a
//! rename of `A` never touches `Aardvark`, and names that need quoting come
//! out quoted. Link context edits and element insertion or deletion live here
//! too, since they validate user input the same way before touching text.

use log::{debug, info};
use thiserror::Error;

use wardley_core::geometry::{DEFAULT_PRECISION, Position, format_coordinate};
use wardley_parser::{Spanned, format_name, parse_line, statement::Statement};

use crate::lines::{BlockTracker, rebuild, source_lines};

/// Why a name edit was rejected. The source is never touched on error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("a name cannot be empty")]
    EmptyName,

    #[error("a name cannot contain a line break")]
    LineBreak,

    #[error("the new name is the same as the old one")]
    Unchanged,

    #[error("line {line} does not define `{name}`")]
    DefinitionNotFound { name: String, line: usize },

    #[error("`{name}` is already defined on line {line}")]
    AlreadyDefined { name: String, line: usize },
}

/// Why a link context edit was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkContextError {
    #[error("a link context cannot contain a line break")]
    LineBreak,

    #[error("a link context cannot contain `;`, which starts the context")]
    Semicolon,

    #[error("line {line} is not a link")]
    NotALink { line: usize },
}

fn validate_name(name: &str) -> Result<(), RenameError> {
    if name.contains(['\n', '\r']) {
        return Err(RenameError::LineBreak);
    }
    if name.trim().is_empty() {
        return Err(RenameError::EmptyName);
    }
    Ok(())
}

/// The line defining `name`, other than `except`.
fn definition_line(text: &str, name: &str, except: Option<usize>) -> Option<usize> {
    let mut tracker = BlockTracker::default();
    source_lines(text).find_map(|line| {
        let statement = parse_line(line.content).ok();
        let in_block = tracker.observe(statement.as_ref());
        let defined = statement.as_ref()?.defined_name()?;
        (!in_block && defined.inner() == name && Some(line.number) != except).then_some(line.number)
    })
}

/// Replaces every span in `spans` within `content`, last span first.
fn replace_spans(content: &str, spans: &[&Spanned<String>], replacement: &str) -> String {
    let mut ranges: Vec<_> = spans.iter().map(|name| name.span().range()).collect();
    ranges.sort_by_key(|range| std::cmp::Reverse(range.start));

    let mut output = content.to_string();
    for range in ranges {
        output.replace_range(range, replacement);
    }
    output
}

/// Renames the element defined on `line` from `old` to `new`.
///
/// The definition on `line` and every `evolve`, method, pipeline and link
/// reference to `old` are rewritten. Other definitions that happen to share
/// the old name are left alone.
///
/// # Errors
///
/// Returns a [`RenameError`] when `new` is empty, contains a line break or
/// equals `old`, when `line` does not define `old` outside a pipeline block,
/// or when another line already defines `new`.
///
/// # Examples
///
/// ```
/// # use wardley::rename::rename;
/// let text = "component A [0.5, 0.5]\ncomponent Aardvark [0.2, 0.3]\nA->Aardvark\n";
/// let renamed = rename(text, 1, "A", "B").expect("renamed");
/// assert_eq!(renamed, "component B [0.5, 0.5]\ncomponent Aardvark [0.2, 0.3]\nB->Aardvark\n");
/// ```
pub fn rename(text: &str, line: usize, old: &str, new: &str) -> Result<String, RenameError> {
    validate_name(new)?;
    if new == old {
        return Err(RenameError::Unchanged);
    }

    // Pipeline members are not renamed on their own: links naming them mean
    // the top-level element of the same name.
    let mut tracker = BlockTracker::default();
    let defines_old = source_lines(text)
        .find_map(|source_line| {
            let statement = parse_line(source_line.content).ok();
            let in_block = tracker.observe(statement.as_ref());
            (source_line.number == line).then(|| {
                !in_block
                    && statement
                        .as_ref()
                        .and_then(Statement::defined_name)
                        .is_some_and(|name| name.inner() == old)
            })
        })
        .unwrap_or(false);
    if !defines_old {
        return Err(RenameError::DefinitionNotFound {
            name: old.to_string(),
            line,
        });
    }
    if let Some(existing) = definition_line(text, new, Some(line)) {
        return Err(RenameError::AlreadyDefined {
            name: new.to_string(),
            line: existing,
        });
    }

    let replacement = format_name(new);
    let mut references = 0;
    let renamed = rebuild(text, |source_line| {
        let statement = parse_line(source_line.content).ok()?;
        let is_definition = statement.defined_name().is_some();
        if is_definition && source_line.number != line {
            return None;
        }

        let spans: Vec<_> = statement
            .name_references()
            .into_iter()
            .filter(|name| name.inner() == old)
            .collect();
        if spans.is_empty() {
            return None;
        }
        references += spans.len();
        Some(Some(replace_spans(source_line.content, &spans, &replacement)))
    });

    info!(old, new, line, references; "Element renamed");
    Ok(renamed)
}

/// Replaces the context text of the link on `line`.
///
/// An empty `context` removes the `; context` clause.
///
/// # Errors
///
/// Returns a [`LinkContextError`] when `context` contains a line break or a
/// semicolon, or when `line` is not a link.
///
/// # Examples
///
/// ```
/// # use wardley::rename::set_link_context;
/// let text = "Hot Water->Kettle\n";
/// assert_eq!(set_link_context(text, 1, "limited by").unwrap(), "Hot Water->Kettle; limited by\n");
/// ```
pub fn set_link_context(text: &str, line: usize, context: &str) -> Result<String, LinkContextError> {
    if context.contains(['\n', '\r']) {
        return Err(LinkContextError::LineBreak);
    }
    if context.contains(';') {
        return Err(LinkContextError::Semicolon);
    }
    let context = context.trim();

    let mut found = false;
    let edited = rebuild(text, |source_line| {
        if source_line.number != line {
            return None;
        }
        let Ok(Statement::Link(link)) = parse_line(source_line.content) else {
            return None;
        };
        found = true;

        let content = source_line.content;
        let head = match &link.context {
            Some(existing) => &content[..existing.span().start()],
            None => content,
        }
        .trim_end();
        Some(Some(if context.is_empty() {
            head.to_string()
        } else {
            format!("{head}; {context}")
        }))
    });

    if !found {
        return Err(LinkContextError::NotALink { line });
    }
    debug!(line, context; "Link context set");
    Ok(edited)
}

/// Appends a `component` line for `name` at `position`.
///
/// The new line uses the line ending already used in `text`.
///
/// # Errors
///
/// Returns a [`RenameError`] when `name` is empty, contains a line break or
/// is already defined.
pub fn add_component(text: &str, name: &str, position: Position) -> Result<String, RenameError> {
    validate_name(name)?;
    if let Some(line) = definition_line(text, name, None) {
        return Err(RenameError::AlreadyDefined {
            name: name.to_string(),
            line,
        });
    }

    let ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let mut output = text.to_string();
    if !output.is_empty() && !output.ends_with('\n') {
        output.push_str(ending);
    }
    output.push_str(&format!(
        "component {} [{}, {}]{ending}",
        format_name(name),
        format_coordinate(position.visibility(), DEFAULT_PRECISION),
        format_coordinate(position.maturity(), DEFAULT_PRECISION),
    ));

    info!(name; "Component added");
    Ok(output)
}

/// Removes the element defined on `line` with everything referencing it.
///
/// Links to or from it, its `evolve` and method lines and its pipeline,
/// block included, are removed too.
///
/// # Errors
///
/// Returns [`RenameError::DefinitionNotFound`] when `line` defines nothing.
pub fn delete_element(text: &str, line: usize) -> Result<String, RenameError> {
    let name = source_lines(text)
        .find(|source_line| source_line.number == line)
        .and_then(|source_line| parse_line(source_line.content).ok())
        .and_then(|statement| statement.defined_name().map(|name| name.inner().clone()))
        .ok_or_else(|| RenameError::DefinitionNotFound {
            name: String::new(),
            line,
        })?;

    let mut tracker = BlockTracker::default();
    let mut in_removed_pipeline = false;
    let mut removed = 0;
    let output = rebuild(text, |source_line| {
        let statement = parse_line(source_line.content).ok();
        let in_block = tracker.observe(statement.as_ref());

        if in_removed_pipeline {
            match &statement {
                _ if in_block => {
                    removed += 1;
                    return Some(None);
                }
                Some(Statement::BlockOpen) => {
                    removed += 1;
                    return Some(None);
                }
                Some(Statement::Blank | Statement::Comment) | None => {}
                Some(_) => in_removed_pipeline = false,
            }
        }

        let remove = source_line.number == line
            || match &statement {
                Some(Statement::Link(link)) => link.start.inner() == &name || link.end.inner() == &name,
                Some(Statement::Evolve(evolve)) => evolve.name.inner() == &name,
                Some(Statement::Method(method)) => method.name.inner() == &name,
                Some(Statement::Pipeline(pipeline)) if pipeline.name.inner() == &name => {
                    in_removed_pipeline = true;
                    true
                }
                _ => false,
            };
        if remove {
            removed += 1;
            Some(None)
        } else {
            None
        }
    });

    info!(name = name.as_str(), line, removed; "Element deleted");
    Ok(output)
}
