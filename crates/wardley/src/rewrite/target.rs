//! What an edit addresses and what it changes.

use std::fmt;

use wardley_core::{
    geometry::{Position, Region},
    semantic::{AttitudeKind, Element, ElementKind, LabelOffset},
};

/// The statement an edit is aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// A component, submap, market, ecosystem, anchor or accelerator by name.
    Element(String),
    /// The `evolve` line of a base element, by base name or override.
    Evolved(String),
    /// A `component` line inside a pipeline block.
    PipelineMember(String),
    Pipeline(String),
    Attitude(AttitudeKind),
    /// The one `annotations [v, m]` line.
    AnnotationsBox,
    /// One plotted occurrence of a numbered annotation, 0-based.
    Annotation { number: u32, occurrence: usize },
    /// A note, by its text.
    Note(String),
}

/// A [`TargetKind`] with an optional line hint.
///
/// With a hint, only that 1-based line is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    kind: TargetKind,
    line: Option<usize>,
}

impl Target {
    pub fn new(kind: TargetKind) -> Self {
        Self { kind, line: None }
    }

    pub fn element(name: impl Into<String>) -> Self {
        Self::new(TargetKind::Element(name.into()))
    }

    pub fn evolved(name: impl Into<String>) -> Self {
        Self::new(TargetKind::Evolved(name.into()))
    }

    pub fn pipeline_member(name: impl Into<String>) -> Self {
        Self::new(TargetKind::PipelineMember(name.into()))
    }

    pub fn pipeline(name: impl Into<String>) -> Self {
        Self::new(TargetKind::Pipeline(name.into()))
    }

    pub fn attitude(kind: AttitudeKind) -> Self {
        Self::new(TargetKind::Attitude(kind))
    }

    pub fn annotations_box() -> Self {
        Self::new(TargetKind::AnnotationsBox)
    }

    pub fn annotation(number: u32, occurrence: usize) -> Self {
        Self::new(TargetKind::Annotation { number, occurrence })
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self::new(TargetKind::Note(text.into()))
    }

    /// Targets the line an element of the model came from.
    ///
    /// Evolved variants address their `evolve` line, pipeline members their
    /// block line.
    pub fn from_element(element: &Element) -> Self {
        let kind = if element.evolved() {
            TargetKind::Evolved(element.name().to_string())
        } else if element.kind() == ElementKind::PipelineComponent {
            TargetKind::PipelineMember(element.name().to_string())
        } else {
            TargetKind::Element(element.name().to_string())
        };
        Self::new(kind).at_line(element.line())
    }

    /// Restricts the search to one 1-based line.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> &TargetKind {
        &self.kind
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TargetKind::Element(name) => write!(f, "element `{name}`")?,
            TargetKind::Evolved(name) => write!(f, "evolution of `{name}`")?,
            TargetKind::PipelineMember(name) => write!(f, "pipeline component `{name}`")?,
            TargetKind::Pipeline(name) => write!(f, "pipeline `{name}`")?,
            TargetKind::Attitude(kind) => write!(f, "{} region", kind.keyword())?,
            TargetKind::AnnotationsBox => write!(f, "annotations box")?,
            TargetKind::Annotation { number, occurrence } => {
                write!(f, "occurrence {occurrence} of annotation {number}")?
            }
            TargetKind::Note(text) => write!(f, "note `{text}`")?,
        }
        if let Some(line) = self.line {
            write!(f, " on line {line}")?;
        }
        Ok(())
    }
}

/// The new values an edit writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    /// A `[visibility, maturity]` position.
    Position(Position),
    /// A single maturity, for `evolve` lines and pipeline members.
    Maturity(f64),
    /// The `[maturity1, maturity2]` extent of a pipeline.
    Extent { maturity1: f64, maturity2: f64 },
    /// Both corners of an attitude region.
    Region(Region),
    /// The first corner of an attitude region; the second follows by the
    /// same delta so the box keeps its size, stopping at the map border.
    Corner(Position),
    /// A `label [x, y]` offset.
    Label(LabelOffset),
}

impl Update {
    /// The maturity carried by a position or maturity update.
    pub(crate) fn maturity(&self) -> Option<f64> {
        match self {
            Update::Position(position) => Some(position.maturity()),
            Update::Maturity(maturity) => Some(*maturity),
            _ => None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Update::Position(_) => "a position",
            Update::Maturity(_) => "a maturity",
            Update::Extent { .. } => "an extent",
            Update::Region(_) => "a region",
            Update::Corner(_) => "a corner",
            Update::Label(_) => "a label offset",
        }
    }
}
