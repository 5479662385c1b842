//! Positioned map elements.

use std::{fmt, str::FromStr};

use crate::geometry::Position;

/// The kind of a positioned element.
///
/// The kind decides which keyword defines the element in a source and which
/// derived views it takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Component,
    Submap,
    Market,
    Ecosystem,
    Anchor,
    PipelineComponent,
}

impl ElementKind {
    /// The keyword that introduces this kind of element in a source line.
    pub fn keyword(self) -> &'static str {
        match self {
            ElementKind::Component | ElementKind::PipelineComponent => "component",
            ElementKind::Submap => "submap",
            ElementKind::Market => "market",
            ElementKind::Ecosystem => "ecosystem",
            ElementKind::Anchor => "anchor",
        }
    }

    /// Returns `true` for kinds that can evolve and carry decorators.
    pub fn is_component_like(self) -> bool {
        matches!(
            self,
            ElementKind::Component
                | ElementKind::Submap
                | ElementKind::Market
                | ElementKind::Ecosystem
        )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::PipelineComponent => write!(f, "pipeline component"),
            kind => write!(f, "{}", kind.keyword()),
        }
    }
}

/// How a component is sourced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Build,
    Buy,
    Outsource,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Build => "build",
            Method::Buy => "buy",
            Method::Outsource => "outsource",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(Method::Build),
            "buy" => Ok(Method::Buy),
            "outsource" => Ok(Method::Outsource),
            other => Err(format!("unknown method `{other}`")),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decorations attached to a component, either inline `(market)` style or
/// through a separate method statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decorators {
    market: bool,
    ecosystem: bool,
    method: Option<Method>,
}

impl Decorators {
    pub fn market(&self) -> bool {
        self.market
    }

    pub fn ecosystem(&self) -> bool {
        self.ecosystem
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn buy(&self) -> bool {
        self.method == Some(Method::Buy)
    }

    pub fn build(&self) -> bool {
        self.method == Some(Method::Build)
    }

    pub fn outsource(&self) -> bool {
        self.method == Some(Method::Outsource)
    }

    pub fn with_market(mut self, market: bool) -> Self {
        self.market = market;
        self
    }

    pub fn with_ecosystem(mut self, ecosystem: bool) -> Self {
        self.ecosystem = ecosystem;
        self
    }

    pub fn with_method(mut self, method: Option<Method>) -> Self {
        self.method = method;
        self
    }
}

/// Pixel offset of an element's label relative to its symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelOffset {
    x: f64,
    y: f64,
}

impl LabelOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }
}

/// A positioned element of the map.
///
/// Base elements come straight from the parser. The aggregator derives
/// copies flagged [`evolving`](Element::evolving) or
/// [`evolved`](Element::evolved) from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: String,
    name: String,
    kind: ElementKind,
    position: Position,
    line: usize,
    decorators: Decorators,
    evolved: bool,
    evolving: bool,
    override_name: Option<String>,
    label: Option<LabelOffset>,
    inertia: bool,
    pipeline: bool,
    url: Option<String>,
}

impl Element {
    /// Create a new element defined on `line`.
    ///
    /// The identifier is derived from the kind and line, which is unique
    /// within one parse.
    pub fn new(kind: ElementKind, name: impl Into<String>, position: Position, line: usize) -> Self {
        let id = match kind {
            ElementKind::PipelineComponent => format!("pipeline_component_{line}"),
            kind => format!("{}_{line}", kind.keyword()),
        };
        Self {
            id,
            name: name.into(),
            kind,
            position,
            line,
            decorators: Decorators::default(),
            evolved: false,
            evolving: false,
            override_name: None,
            label: None,
            inertia: false,
            pipeline: false,
            url: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The name the element is referenced by in links and `evolve` lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn maturity(&self) -> f64 {
        self.position.maturity()
    }

    pub fn visibility(&self) -> f64 {
        self.position.visibility()
    }

    /// The 1-based source line defining or positioning this element.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn decorators(&self) -> Decorators {
        self.decorators
    }

    pub fn evolved(&self) -> bool {
        self.evolved
    }

    pub fn evolving(&self) -> bool {
        self.evolving
    }

    /// The display name given by `evolve <name>-><override>`, if any.
    pub fn override_name(&self) -> Option<&str> {
        self.override_name.as_deref()
    }

    /// The text shown next to the symbol.
    pub fn display_name(&self) -> &str {
        self.override_name.as_deref().unwrap_or(&self.name)
    }

    pub fn label(&self) -> Option<LabelOffset> {
        self.label
    }

    pub fn inertia(&self) -> bool {
        self.inertia
    }

    /// Returns `true` when a pipeline hangs off this component.
    pub fn pipeline(&self) -> bool {
        self.pipeline
    }

    /// The `url(...)` reference of a submap.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn with_decorators(mut self, decorators: Decorators) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_label(mut self, label: Option<LabelOffset>) -> Self {
        self.label = label;
        self
    }

    pub fn with_inertia(mut self, inertia: bool) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Marks the element as the base of an evolution.
    pub fn into_evolving(mut self) -> Self {
        self.evolving = true;
        self
    }

    /// Derives the evolved variant of this base element.
    ///
    /// The variant keeps the base visibility, takes maturity, label, line
    /// and override from `evolved`, and gets its own identifier.
    pub fn to_evolved(&self, evolved: &EvolvedElement) -> Self {
        let mut variant = self.clone();
        variant.id = format!("{}_evolved", self.id);
        variant.position = self.position.with_maturity(evolved.maturity());
        variant.line = evolved.line();
        variant.evolved = true;
        variant.evolving = false;
        variant.label = evolved.label();
        variant.inertia = evolved.inertia();
        if let Some(override_name) = evolved.override_name() {
            variant.name = override_name.to_string();
            variant.override_name = Some(override_name.to_string());
        }
        if evolved.decorators() != Decorators::default() {
            variant.decorators = evolved.decorators();
        }
        variant
    }

    /// Marks the element as having a pipeline.
    pub fn set_pipeline(&mut self, pipeline: bool) {
        self.pipeline = pipeline;
    }

    /// Applies a method declared on a separate line.
    pub fn set_method(&mut self, method: Method) {
        self.decorators.method = Some(method);
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}, {}]",
            self.kind,
            self.display_name(),
            self.visibility(),
            self.maturity()
        )
    }
}

/// An `evolve` statement moving an element to a later maturity.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolvedElement {
    name: String,
    maturity: f64,
    label: Option<LabelOffset>,
    override_name: Option<String>,
    line: usize,
    decorators: Decorators,
    inertia: bool,
}

impl EvolvedElement {
    pub fn new(name: impl Into<String>, maturity: f64, line: usize) -> Self {
        Self {
            name: name.into(),
            maturity,
            label: None,
            override_name: None,
            line,
            decorators: Decorators::default(),
            inertia: false,
        }
    }

    /// The name of the base element being evolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn label(&self) -> Option<LabelOffset> {
        self.label
    }

    pub fn override_name(&self) -> Option<&str> {
        self.override_name.as_deref()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn decorators(&self) -> Decorators {
        self.decorators
    }

    pub fn inertia(&self) -> bool {
        self.inertia
    }

    pub fn with_label(mut self, label: Option<LabelOffset>) -> Self {
        self.label = label;
        self
    }

    pub fn with_override(mut self, override_name: Option<String>) -> Self {
        self.override_name = override_name;
        self
    }

    pub fn with_decorators(mut self, decorators: Decorators) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_inertia(mut self, inertia: bool) -> Self {
        self.inertia = inertia;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_from_kind_and_line() {
        let element = Element::new(ElementKind::Anchor, "User", Position::new(0.9, 0.5), 3);
        assert_eq!(element.id(), "anchor_3");

        let member = Element::new(
            ElementKind::PipelineComponent,
            "Electric",
            Position::new(0.5, 0.6),
            7,
        );
        assert_eq!(member.id(), "pipeline_component_7");
    }

    #[test]
    fn test_to_evolved_keeps_visibility() {
        let base = Element::new(ElementKind::Component, "Kettle", Position::new(0.43, 0.35), 2);
        let evolve = EvolvedElement::new("Kettle", 0.62, 9).with_override(Some("Smart Kettle".into()));

        let variant = base.to_evolved(&evolve);
        assert!(variant.evolved());
        assert!(!variant.evolving());
        assert_eq!(variant.visibility(), 0.43);
        assert_eq!(variant.maturity(), 0.62);
        assert_eq!(variant.line(), 9);
        assert_eq!(variant.name(), "Smart Kettle");
        assert_eq!(variant.id(), "component_2_evolved");
    }

    #[test]
    fn test_to_evolved_inherits_decorators_when_unset() {
        let base = Element::new(ElementKind::Component, "Power", Position::new(0.1, 0.7), 1)
            .with_decorators(Decorators::default().with_method(Some(Method::Buy)));
        let evolve = EvolvedElement::new("Power", 0.9, 4);

        let variant = base.to_evolved(&evolve);
        assert!(variant.decorators().buy());
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("build".parse::<Method>(), Ok(Method::Build));
        assert!("rent".parse::<Method>().is_err());
    }

    #[test]
    fn test_display_name_prefers_override() {
        let base = Element::new(ElementKind::Component, "A", Position::default(), 1);
        assert_eq!(base.display_name(), "A");
    }
}
