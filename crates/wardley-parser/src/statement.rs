//! Statements produced by the line grammar.
//!
//! Every source line becomes exactly one [`Statement`]. Leaf values are
//! wrapped in [`Spanned`] with spans relative to the start of the line, so
//! the rewrite engine can address the exact text of a name or coordinate.

use wardley_core::{
    geometry::Position,
    semantic::{AttitudeKind, ElementKind, LabelOffset, Method},
};

use crate::span::{Span, Spanned};

/// A bracketed list of numbers, such as `[0.4, 0.6]` or `[0.6]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub values: Vec<Spanned<f64>>,
    /// Span of the whole clause, brackets included.
    pub span: Span,
}

impl Coordinates {
    /// The clause as a `[visibility, maturity]` position, if it has two values.
    pub fn position(&self) -> Option<Position> {
        match self.values.as_slice() {
            [visibility, maturity] => Some(Position::new(**visibility, **maturity)),
            _ => None,
        }
    }

    /// The clause as a single value, if it has exactly one.
    pub fn single(&self) -> Option<f64> {
        match self.values.as_slice() {
            [value] => Some(**value),
            _ => None,
        }
    }

    /// The clause as a pair of values, if it has exactly two.
    pub fn pair(&self) -> Option<(f64, f64)> {
        match self.values.as_slice() {
            [first, second] => Some((**first, **second)),
            _ => None,
        }
    }
}

/// A `label [x, y]` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelClause {
    pub x: Spanned<f64>,
    pub y: Spanned<f64>,
    pub span: Span,
}

impl LabelClause {
    pub fn offset(&self) -> LabelOffset {
        LabelOffset::new(*self.x, *self.y)
    }
}

/// A parenthesised decorator such as `(buy)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    Market,
    Ecosystem,
    Method(Method),
    Unknown(String),
}

/// Modifiers that may follow a positioned name in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    pub label: Option<LabelClause>,
    pub decorators: Vec<Spanned<Decorator>>,
    pub inertia: bool,
    pub url: Option<Spanned<String>>,
}

/// `component|submap|market|ecosystem|anchor <name> [v, m] ...`
///
/// Inside a pipeline block a `component` line carries a single maturity.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStatement {
    pub kind: ElementKind,
    pub name: Spanned<String>,
    pub coordinates: Option<Coordinates>,
    pub modifiers: Modifiers,
}

/// `evolve <name>[-><override>] <maturity> ...`
#[derive(Debug, Clone, PartialEq)]
pub struct EvolveStatement {
    pub name: Spanned<String>,
    pub override_name: Option<Spanned<String>>,
    pub maturity: Spanned<f64>,
    pub modifiers: Modifiers,
}

/// `pipeline <name> [m1, m2]`, optionally opening a `{` block.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStatement {
    pub name: Spanned<String>,
    pub extent: Option<Coordinates>,
    pub opens_block: bool,
}

/// The arrow between both ends of a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrow {
    pub flow: bool,
    pub future: bool,
    pub past: bool,
    pub value: Option<String>,
}

/// `<start> -> <end> [; context]` and its flow variants.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStatement {
    pub start: Spanned<String>,
    pub end: Spanned<String>,
    pub arrow: Spanned<Arrow>,
    /// The context text after `;`, trimmed. The span covers the `;` too.
    pub context: Option<Spanned<String>>,
}

/// `annotation <n> [v, m] <text>` or `annotation <n> [[v, m], [v, m]] <text>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStatement {
    pub number: Spanned<u32>,
    pub occurrences: Vec<Coordinates>,
    /// `true` for the bracketed list form, even with one occurrence.
    pub multi: bool,
    pub text: Option<String>,
}

/// `note <text> [v, m]`
#[derive(Debug, Clone, PartialEq)]
pub struct NoteStatement {
    pub text: Spanned<String>,
    pub coordinates: Option<Coordinates>,
}

/// `build|buy|outsource <name>`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodStatement {
    pub method: Method,
    pub name: Spanned<String>,
}

/// `pioneers|settlers|townplanners [v1, m1], [v2, m2]`
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeStatement {
    pub kind: AttitudeKind,
    pub first: Coordinates,
    pub second: Coordinates,
}

/// `accelerator|deaccelerator <name> [v, m]`
#[derive(Debug, Clone, PartialEq)]
pub struct AcceleratorStatement {
    pub deaccelerator: bool,
    pub name: Spanned<String>,
    pub coordinates: Option<Coordinates>,
    pub modifiers: Modifiers,
}

/// `url <name> [<address>]`
#[derive(Debug, Clone, PartialEq)]
pub struct UrlStatement {
    pub name: Spanned<String>,
    pub address: Spanned<String>,
}

/// One interpreted source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Blank,
    Comment,
    /// A lone `{` opening the block of the pipeline declared just before.
    BlockOpen,
    /// A lone `}` closing a pipeline block.
    BlockClose,
    Title(Spanned<String>),
    Style(Spanned<String>),
    Evolution(Vec<Spanned<String>>),
    Size(Coordinates),
    Element(ElementStatement),
    Evolve(EvolveStatement),
    Pipeline(PipelineStatement),
    Link(LinkStatement),
    Annotation(AnnotationStatement),
    AnnotationsBox(Coordinates),
    Note(NoteStatement),
    Method(MethodStatement),
    Attitude(AttitudeStatement),
    Accelerator(AcceleratorStatement),
    Url(UrlStatement),
}

impl Statement {
    /// The name this statement defines, for statements that define one.
    pub fn defined_name(&self) -> Option<&Spanned<String>> {
        match self {
            Statement::Element(element) => Some(&element.name),
            Statement::Accelerator(accelerator) => Some(&accelerator.name),
            _ => None,
        }
    }

    /// Every span on this line that refers to an element by name.
    ///
    /// Definitions are included; `evolve` overrides are not, since they are
    /// display names rather than references.
    pub fn name_references(&self) -> Vec<&Spanned<String>> {
        match self {
            Statement::Element(element) => vec![&element.name],
            Statement::Accelerator(accelerator) => vec![&accelerator.name],
            Statement::Evolve(evolve) => vec![&evolve.name],
            Statement::Pipeline(pipeline) => vec![&pipeline.name],
            Statement::Method(method) => vec![&method.name],
            Statement::Link(link) => vec![&link.start, &link.end],
            _ => Vec::new(),
        }
    }

    /// Every coordinate clause on this line.
    pub fn coordinates(&self) -> Vec<&Coordinates> {
        match self {
            Statement::Element(element) => element.coordinates.iter().collect(),
            Statement::Pipeline(pipeline) => pipeline.extent.iter().collect(),
            Statement::Annotation(annotation) => annotation.occurrences.iter().collect(),
            Statement::AnnotationsBox(coordinates) => vec![coordinates],
            Statement::Note(note) => note.coordinates.iter().collect(),
            Statement::Attitude(attitude) => vec![&attitude.first, &attitude.second],
            Statement::Accelerator(accelerator) => accelerator.coordinates.iter().collect(),
            _ => Vec::new(),
        }
    }
}
