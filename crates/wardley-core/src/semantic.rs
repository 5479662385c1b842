//! Semantic model of a parsed map source.
//!
//! Every type here is created fresh on each parse and remembers the 1-based
//! source line it came from. The line is the join key the rewrite engine uses
//! to find the text responsible for an element.
//!
//! - [`WardleyMap`] - The root model holding every collection
//! - [`Element`] - Positioned components, submaps, markets, ecosystems, anchors
//!   and pipeline members, discriminated by [`ElementKind`]
//! - [`EvolvedElement`] - An `evolve` override of an element's maturity
//! - [`Pipeline`], [`Link`], [`Annotation`], [`Attitude`], [`Accelerator`],
//!   [`Note`], [`MethodDeclaration`], [`Url`]

mod element;
mod map;

pub use element::{Decorators, Element, ElementKind, EvolvedElement, LabelOffset, Method};
pub use map::{
    Accelerator, Annotation, Attitude, AttitudeKind, Link, MethodDeclaration, Note, Pipeline,
    PipelineComponent, Url, WardleyMap,
};
