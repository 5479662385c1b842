//! The map model and its non-positional statements.

use std::fmt;

use crate::{
    evolution::EvolutionStages,
    geometry::{MapDimensions, Position, Region},
    semantic::element::{Element, ElementKind, EvolvedElement, LabelOffset, Method},
};

/// A member of a pipeline, positioned by maturity only.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineComponent {
    name: String,
    maturity: f64,
    label: Option<LabelOffset>,
    line: usize,
}

impl PipelineComponent {
    pub fn new(name: impl Into<String>, maturity: f64, line: usize) -> Self {
        Self {
            name: name.into(),
            maturity,
            label: None,
            line,
        }
    }

    pub fn with_label(mut self, label: Option<LabelOffset>) -> Self {
        self.label = label;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn label(&self) -> Option<LabelOffset> {
        self.label
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Lifts the member into a full element at the pipeline's visibility.
    pub fn to_element(&self, visibility: f64) -> Element {
        Element::new(
            ElementKind::PipelineComponent,
            self.name.clone(),
            Position::new(visibility, self.maturity),
            self.line,
        )
        .with_label(self.label)
    }
}

/// A pipeline hanging off the component of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    name: String,
    visibility: f64,
    maturity1: Option<f64>,
    maturity2: Option<f64>,
    line: usize,
    components: Vec<PipelineComponent>,
}

impl Pipeline {
    /// Creates a pipeline declared on `line`.
    ///
    /// `extent` is the explicit `[maturity1, maturity2]` bracket, if written.
    pub fn new(
        name: impl Into<String>,
        visibility: f64,
        extent: Option<(f64, f64)>,
        line: usize,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            maturity1: extent.map(|(m1, _)| m1),
            maturity2: extent.map(|(_, m2)| m2),
            line,
            components: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> f64 {
        self.visibility
    }

    /// Left edge of the pipeline. Falls back to the least mature member.
    pub fn maturity1(&self) -> Option<f64> {
        self.maturity1.or_else(|| {
            self.components
                .iter()
                .map(PipelineComponent::maturity)
                .reduce(f64::min)
        })
    }

    /// Right edge of the pipeline. Falls back to the most mature member.
    pub fn maturity2(&self) -> Option<f64> {
        self.maturity2.or_else(|| {
            self.components
                .iter()
                .map(PipelineComponent::maturity)
                .reduce(f64::max)
        })
    }

    /// Returns `true` when the pipeline has no explicit extent bracket.
    pub fn hidden(&self) -> bool {
        self.maturity1.is_none()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Members in declaration order.
    pub fn components(&self) -> &[PipelineComponent] {
        &self.components
    }

    pub fn set_visibility(&mut self, visibility: f64) {
        self.visibility = visibility;
    }

    pub fn push_component(&mut self, component: PipelineComponent) {
        self.components.push(component);
    }
}

/// A dependency between two named elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    start: String,
    end: String,
    line: usize,
    flow: bool,
    flow_value: Option<String>,
    context: Option<String>,
    future: bool,
    past: bool,
}

impl Link {
    pub fn new(start: impl Into<String>, end: impl Into<String>, line: usize) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            line,
            flow: false,
            flow_value: None,
            context: None,
            future: false,
            past: false,
        }
    }

    pub fn with_flow(mut self, flow: bool) -> Self {
        self.flow = flow;
        self
    }

    pub fn with_flow_value(mut self, flow_value: Option<String>) -> Self {
        self.flow_value = flow_value;
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn with_future(mut self, future: bool) -> Self {
        self.future = future;
        self
    }

    pub fn with_past(mut self, past: bool) -> Self {
        self.past = past;
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn flow(&self) -> bool {
        self.flow
    }

    pub fn flow_value(&self) -> Option<&str> {
        self.flow_value.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn future(&self) -> bool {
        self.future
    }

    pub fn past(&self) -> bool {
        self.past
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.start, self.end)
    }
}

/// A numbered annotation plotted at one or more occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    number: u32,
    occurrences: Vec<Position>,
    text: Option<String>,
    line: usize,
}

impl Annotation {
    pub fn new(number: u32, occurrences: Vec<Position>, line: usize) -> Self {
        Self {
            number,
            occurrences,
            text: None,
            line,
        }
    }

    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text;
        self
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn occurrences(&self) -> &[Position] {
        &self.occurrences
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// The flavour of an attitude region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttitudeKind {
    Pioneers,
    Settlers,
    Townplanners,
}

impl AttitudeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            AttitudeKind::Pioneers => "pioneers",
            AttitudeKind::Settlers => "settlers",
            AttitudeKind::Townplanners => "townplanners",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "pioneers" => Some(AttitudeKind::Pioneers),
            "settlers" => Some(AttitudeKind::Settlers),
            "townplanners" => Some(AttitudeKind::Townplanners),
            _ => None,
        }
    }
}

impl fmt::Display for AttitudeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A pioneers/settlers/townplanners (PST) region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    kind: AttitudeKind,
    region: Region,
    line: usize,
}

impl Attitude {
    pub fn new(kind: AttitudeKind, region: Region, line: usize) -> Self {
        Self { kind, region, line }
    }

    pub fn kind(&self) -> AttitudeKind {
        self.kind
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// An accelerator or deaccelerator arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct Accelerator {
    name: String,
    deaccelerator: bool,
    position: Position,
    label: Option<LabelOffset>,
    line: usize,
}

impl Accelerator {
    pub fn new(name: impl Into<String>, deaccelerator: bool, position: Position, line: usize) -> Self {
        Self {
            name: name.into(),
            deaccelerator,
            position,
            label: None,
            line,
        }
    }

    pub fn with_label(mut self, label: Option<LabelOffset>) -> Self {
        self.label = label;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deaccelerator(&self) -> bool {
        self.deaccelerator
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn label(&self) -> Option<LabelOffset> {
        self.label
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Free text placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    text: String,
    position: Position,
    line: usize,
}

impl Note {
    pub fn new(text: impl Into<String>, position: Position, line: usize) -> Self {
        Self {
            text: text.into(),
            position,
            line,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// A `build|buy|outsource <name>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    name: String,
    method: Method,
    line: usize,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>, method: Method, line: usize) -> Self {
        Self {
            name: name.into(),
            method,
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// A `url <name> [<address>]` line a submap can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    name: String,
    url: String,
    line: usize,
}

impl Url {
    pub fn new(name: impl Into<String>, url: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Everything a single parse of a map source produced.
///
/// Elements of every positional kind live in one collection, in source order,
/// and are filtered by [`ElementKind`] on access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardleyMap {
    title: Option<String>,
    style: Option<String>,
    evolution: Option<EvolutionStages>,
    size: Option<MapDimensions>,
    elements: Vec<Element>,
    evolved: Vec<EvolvedElement>,
    pipelines: Vec<Pipeline>,
    links: Vec<Link>,
    annotations: Vec<Annotation>,
    annotations_position: Option<Position>,
    notes: Vec<Note>,
    methods: Vec<MethodDeclaration>,
    attitudes: Vec<Attitude>,
    accelerators: Vec<Accelerator>,
    urls: Vec<Url>,
}

impl WardleyMap {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Stage labels, defaulting to the standard four.
    pub fn evolution(&self) -> EvolutionStages {
        self.evolution.clone().unwrap_or_default()
    }

    pub fn size(&self) -> Option<MapDimensions> {
        self.size
    }

    /// All positional elements in source order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements of one kind in source order.
    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    pub fn components(&self) -> impl Iterator<Item = &Element> {
        self.elements_of(ElementKind::Component)
    }

    pub fn submaps(&self) -> impl Iterator<Item = &Element> {
        self.elements_of(ElementKind::Submap)
    }

    pub fn markets(&self) -> impl Iterator<Item = &Element> {
        self.elements_of(ElementKind::Market)
    }

    pub fn ecosystems(&self) -> impl Iterator<Item = &Element> {
        self.elements_of(ElementKind::Ecosystem)
    }

    pub fn anchors(&self) -> impl Iterator<Item = &Element> {
        self.elements_of(ElementKind::Anchor)
    }

    /// Finds the first element defined under `name`.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn evolved(&self) -> &[EvolvedElement] {
        &self.evolved
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Position of the annotations legend box.
    pub fn annotations_position(&self) -> Option<Position> {
        self.annotations_position
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn methods(&self) -> &[MethodDeclaration] {
        &self.methods
    }

    pub fn attitudes(&self) -> &[Attitude] {
        &self.attitudes
    }

    pub fn accelerators(&self) -> &[Accelerator] {
        &self.accelerators
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.style = Some(style.into());
    }

    pub fn set_evolution(&mut self, evolution: EvolutionStages) {
        self.evolution = Some(evolution);
    }

    pub fn set_size(&mut self, size: MapDimensions) {
        self.size = Some(size);
    }

    pub fn set_annotations_position(&mut self, position: Position) {
        self.annotations_position = Some(position);
    }

    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn push_evolved(&mut self, evolved: EvolvedElement) {
        self.evolved.push(evolved);
    }

    pub fn push_pipeline(&mut self, pipeline: Pipeline) {
        self.pipelines.push(pipeline);
    }

    pub fn push_link(&mut self, link: Link) {
        self.links.push(link);
    }

    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn push_method(&mut self, method: MethodDeclaration) {
        self.methods.push(method);
    }

    pub fn push_attitude(&mut self, attitude: Attitude) {
        self.attitudes.push(attitude);
    }

    pub fn push_accelerator(&mut self, accelerator: Accelerator) {
        self.accelerators.push(accelerator);
    }

    pub fn push_url(&mut self, url: Url) {
        self.urls.push(url);
    }

    /// Mutable access to elements, used while resolving cross-line references.
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Mutable access to the last declared pipeline.
    pub fn last_pipeline_mut(&mut self) -> Option<&mut Pipeline> {
        self.pipelines.last_mut()
    }

    pub fn pipelines_mut(&mut self) -> &mut [Pipeline] {
        &mut self.pipelines
    }
}
