//! Map building phase.
//!
//! The builder walks the source line by line, interprets each statement and
//! pushes the result onto a [`WardleyMap`]. Problems never stop the build:
//! they are collected as diagnostics and the offending line is skipped.
//! References between lines (`evolve`, pipelines, method lines) are checked
//! once every line has been seen.

use log::{debug, info, trace};

use wardley_core::{
    evolution::EvolutionStages,
    geometry::{MapDimensions, Position, Region},
    semantic::{
        Accelerator, Annotation, Attitude, Decorators, Element, ElementKind, EvolvedElement,
        Link, Method, MethodDeclaration, Note, Pipeline, PipelineComponent, Url, WardleyMap,
    },
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parser::{self, ParsedLine},
    span::{Span, Spanned},
    statement::{
        Coordinates, Decorator, ElementStatement, EvolveStatement, LinkStatement, Modifiers,
        PipelineStatement, Statement,
    },
};

/// Where the builder stands with respect to pipeline blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Closed,
    /// The previous statement declared a pipeline; a `{` may follow.
    Pending,
    /// Inside a block opened on `line`.
    Open { line: usize, span: Span },
}

/// A name on one line that must resolve against the finished element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceKind {
    Evolve,
    Method(Method),
    Pipeline,
}

#[derive(Debug, Clone)]
struct Reference {
    kind: ReferenceKind,
    name: String,
    span: Span,
    line: usize,
}

pub(crate) struct Builder {
    map: WardleyMap,
    collector: DiagnosticCollector,
    references: Vec<Reference>,
    block: Block,
    /// 1-based number of the line being built.
    line: usize,
    /// Byte offset of the line being built within the whole source.
    offset: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            map: WardleyMap::default(),
            collector: DiagnosticCollector::new(),
            references: Vec::new(),
            block: Block::Closed,
            line: 0,
            offset: 0,
        }
    }

    /// Build a map out of `source`, returning it with every diagnostic raised.
    pub fn build(mut self, source: &str) -> (WardleyMap, DiagnosticCollector) {
        debug!(bytes = source.len(); "Building map");

        let mut offset = 0;
        for (index, raw) in source.split_inclusive('\n').enumerate() {
            self.line = index + 1;
            self.offset = offset;
            offset += raw.len();

            let text = raw.trim_end_matches(['\n', '\r']);
            match parser::statement(text) {
                Ok(parsed) => self.build_line(parsed),
                Err(diag) => self.emit_at(diag),
            }
        }

        if let Block::Open { line, span } = self.block {
            self.collector.emit(
                Diagnostic::error("pipeline block is never closed")
                    .with_code(ErrorCode::E106)
                    .with_line(line)
                    .with_label(span, "block opened here")
                    .with_help("add a `}` line after the last pipeline component"),
            );
        }

        self.resolve_references();

        info!(
            elements = self.map.elements().len(),
            links = self.map.links().len(),
            pipelines = self.map.pipelines().len(),
            has_errors = self.collector.has_errors();
            "Map built"
        );
        (self.map, self.collector)
    }

    /// Place a line relative diagnostic in the source and collect it.
    fn emit_at(&mut self, diag: Diagnostic) {
        let diag = diag.offset_by(self.offset).with_line(self.line);
        trace!(line = self.line; "{diag}");
        self.collector.emit(diag);
    }

    fn build_line(&mut self, parsed: ParsedLine) {
        let ParsedLine {
            statement,
            trailing,
        } = parsed;

        if let Some(span) = trailing {
            self.emit_at(
                Diagnostic::warning("unexpected text after statement")
                    .with_code(ErrorCode::E104)
                    .with_label(span, "ignored")
                    .with_help("remove the text, or quote the name it belongs to"),
            );
        }

        if let Block::Open { .. } = self.block {
            self.build_block_line(statement);
            return;
        }

        let was_pending = self.block == Block::Pending;
        if !matches!(statement, Statement::Blank | Statement::Comment) {
            self.block = Block::Closed;
        }

        match statement {
            Statement::Blank | Statement::Comment => {}
            Statement::BlockOpen if was_pending => self.open_block(Span::new(0..1)),
            Statement::BlockOpen => self.stray_brace("`{` does not follow a pipeline"),
            Statement::BlockClose => self.stray_brace("`}` closes no pipeline block"),
            Statement::Title(title) => self.map.set_title(title.into_inner()),
            Statement::Style(style) => self.map.set_style(style.into_inner()),
            Statement::Evolution(stages) => self.build_evolution(stages),
            Statement::Size(size) => {
                if let Some((width, height)) = size.pair() {
                    self.map.set_size(MapDimensions::new(width, height));
                }
            }
            Statement::Element(element) => self.build_element(element),
            Statement::Evolve(evolve) => self.build_evolve(evolve),
            Statement::Pipeline(pipeline) => self.build_pipeline(pipeline),
            Statement::Link(link) => self.build_link(link),
            Statement::Annotation(annotation) => {
                let occurrences = annotation
                    .occurrences
                    .iter()
                    .filter_map(|coords| self.checked_position(coords))
                    .collect();
                self.map.push_annotation(
                    Annotation::new(*annotation.number, occurrences, self.line)
                        .with_text(annotation.text),
                );
            }
            Statement::AnnotationsBox(coords) => {
                if let Some(position) = self.checked_position(&coords) {
                    self.map.set_annotations_position(position);
                }
            }
            Statement::Note(note) => {
                if let Some(position) = self.required_position(note.coordinates.as_ref(), &note.text) {
                    self.map
                        .push_note(Note::new(note.text.into_inner(), position, self.line));
                }
            }
            Statement::Method(method) => {
                self.reference(ReferenceKind::Method(method.method), &method.name);
                self.map.push_method(MethodDeclaration::new(
                    method.name.into_inner(),
                    method.method,
                    self.line,
                ));
            }
            Statement::Attitude(attitude) => {
                let first = self.checked_position(&attitude.first);
                let second = self.checked_position(&attitude.second);
                if let (Some(first), Some(second)) = (first, second) {
                    self.map.push_attitude(Attitude::new(
                        attitude.kind,
                        Region::from_corners(first, second),
                        self.line,
                    ));
                }
            }
            Statement::Accelerator(accelerator) => {
                let position =
                    self.required_position(accelerator.coordinates.as_ref(), &accelerator.name);
                if let Some(position) = position {
                    let label = accelerator.modifiers.label.as_ref().map(|l| l.offset());
                    self.map.push_accelerator(
                        Accelerator::new(
                            accelerator.name.into_inner(),
                            accelerator.deaccelerator,
                            position,
                            self.line,
                        )
                        .with_label(label),
                    );
                }
            }
            Statement::Url(url) => self.map.push_url(Url::new(
                url.name.into_inner(),
                url.address.into_inner(),
                self.line,
            )),
        }
    }

    /// Lines inside a pipeline block declare members with a single maturity.
    fn build_block_line(&mut self, statement: Statement) {
        match statement {
            Statement::Blank | Statement::Comment => {}
            Statement::BlockClose => self.block = Block::Closed,
            Statement::Element(ElementStatement {
                kind: ElementKind::Component,
                name,
                coordinates,
                modifiers,
            }) => {
                let Some(coords) = coordinates else {
                    self.missing_coordinates(&name);
                    return;
                };
                let Some(maturity) = coords.single() else {
                    self.emit_at(
                        Diagnostic::error("pipeline components take a single maturity")
                            .with_code(ErrorCode::E101)
                            .with_label(coords.span, "expected `[maturity]`"),
                    );
                    return;
                };
                self.check_range(&coords);

                let component = PipelineComponent::new(name.into_inner(), maturity, self.line)
                    .with_label(modifiers.label.as_ref().map(|l| l.offset()));
                if let Some(pipeline) = self.map.last_pipeline_mut() {
                    pipeline.push_component(component);
                }
            }
            _ => self.emit_at(
                Diagnostic::error("only components may appear inside a pipeline block")
                    .with_code(ErrorCode::E106)
                    .with_help("write `component <name> [maturity]`, or close the block with `}`"),
            ),
        }
    }

    fn open_block(&mut self, span: Span) {
        self.block = Block::Open {
            line: self.line,
            span: span.offset_by(self.offset),
        };
    }

    fn stray_brace(&mut self, message: &'static str) {
        self.emit_at(
            Diagnostic::error(message)
                .with_code(ErrorCode::E106)
                .with_help("pipeline blocks are written as `pipeline <name> [m1, m2] {`"),
        );
    }

    fn build_evolution(&mut self, stages: Vec<Spanned<String>>) {
        let labels: Vec<String> = stages.into_iter().map(Spanned::into_inner).collect();
        if let Ok(labels) = <[String; 4]>::try_from(labels) {
            self.map.set_evolution(EvolutionStages::new(labels));
        }
    }

    fn build_element(&mut self, statement: ElementStatement) {
        let ElementStatement {
            kind,
            name,
            coordinates,
            modifiers,
        } = statement;

        let Some(position) = self.required_position(coordinates.as_ref(), &name) else {
            return;
        };
        let decorators = self.decorators(&modifiers);

        let element = Element::new(kind, name.into_inner(), position, self.line)
            .with_decorators(decorators)
            .with_label(modifiers.label.as_ref().map(|l| l.offset()))
            .with_inertia(modifiers.inertia)
            .with_url(modifiers.url.map(Spanned::into_inner));
        trace!(line = self.line; "{element}");
        self.map.push_element(element);
    }

    fn build_evolve(&mut self, statement: EvolveStatement) {
        let EvolveStatement {
            name,
            override_name,
            maturity,
            modifiers,
        } = statement;

        self.check_value(&maturity);
        self.reference(ReferenceKind::Evolve, &name);
        let decorators = self.decorators(&modifiers);

        self.map.push_evolved(
            EvolvedElement::new(name.into_inner(), *maturity, self.line)
                .with_override(override_name.map(Spanned::into_inner))
                .with_label(modifiers.label.as_ref().map(|l| l.offset()))
                .with_decorators(decorators)
                .with_inertia(modifiers.inertia),
        );
    }

    fn build_pipeline(&mut self, statement: PipelineStatement) {
        let PipelineStatement {
            name,
            extent,
            opens_block,
        } = statement;

        let extent = match extent {
            Some(coords) => {
                self.check_range(&coords);
                coords.pair()
            }
            None => None,
        };
        self.reference(ReferenceKind::Pipeline, &name);
        debug!(name = name.inner().as_str(), line = self.line; "Pipeline declared");
        self.map
            .push_pipeline(Pipeline::new(name.inner().clone(), 0.0, extent, self.line));

        if opens_block {
            self.open_block(name.span());
        } else {
            self.block = Block::Pending;
        }
    }

    fn build_link(&mut self, statement: LinkStatement) {
        let LinkStatement {
            start,
            end,
            arrow,
            context,
        } = statement;
        let arrow = arrow.into_inner();
        let context = context
            .map(Spanned::into_inner)
            .filter(|context| !context.is_empty());

        self.map.push_link(
            Link::new(start.into_inner(), end.into_inner(), self.line)
                .with_flow(arrow.flow)
                .with_flow_value(arrow.value)
                .with_future(arrow.future)
                .with_past(arrow.past)
                .with_context(context),
        );
    }

    fn decorators(&mut self, modifiers: &Modifiers) -> Decorators {
        let mut decorators = Decorators::default();
        for decorator in &modifiers.decorators {
            decorators = match decorator.inner() {
                Decorator::Market => decorators.with_market(true),
                Decorator::Ecosystem => decorators.with_ecosystem(true),
                Decorator::Method(method) => decorators.with_method(Some(*method)),
                Decorator::Unknown(word) => {
                    self.emit_at(
                        Diagnostic::warning(format!("unknown decorator `({word})`"))
                            .with_code(ErrorCode::E103)
                            .with_label(decorator.span(), "ignored")
                            .with_help(
                                "known decorators are `(build)`, `(buy)`, `(outsource)`, \
                                 `(market)` and `(ecosystem)`",
                            ),
                    );
                    decorators
                }
            };
        }
        decorators
    }

    /// The position of a statement that must carry one.
    ///
    /// A missing clause falls back to the origin with a warning. A clause of
    /// the wrong arity makes the statement unusable.
    fn required_position(
        &mut self,
        coordinates: Option<&Coordinates>,
        name: &Spanned<String>,
    ) -> Option<Position> {
        match coordinates {
            Some(coords) => self.checked_position(coords),
            None => {
                self.missing_coordinates(name);
                Some(Position::new(0.0, 0.0))
            }
        }
    }

    fn checked_position(&mut self, coords: &Coordinates) -> Option<Position> {
        let Some(position) = coords.position() else {
            self.emit_at(
                Diagnostic::error(format!(
                    "expected two coordinates, found {}",
                    coords.values.len()
                ))
                .with_code(ErrorCode::E101)
                .with_label(coords.span, "expected `[visibility, maturity]`"),
            );
            return None;
        };
        self.check_range(coords);
        Some(position)
    }

    fn missing_coordinates(&mut self, name: &Spanned<String>) {
        self.emit_at(
            Diagnostic::warning(format!("`{}` has no coordinates", name.inner()))
                .with_code(ErrorCode::E105)
                .with_label(name.span(), "placed at [0, 0]")
                .with_help("add `[visibility, maturity]` after the name"),
        );
    }

    fn check_range(&mut self, coords: &Coordinates) {
        for value in &coords.values {
            self.check_value(value);
        }
    }

    fn check_value(&mut self, value: &Spanned<f64>) {
        if !(0.0..=1.0).contains(value.inner()) {
            self.emit_at(
                Diagnostic::warning(format!("coordinate {} lies outside [0, 1]", value.inner()))
                    .with_code(ErrorCode::E102)
                    .with_label(value.span(), "out of range"),
            );
        }
    }

    fn reference(&mut self, kind: ReferenceKind, name: &Spanned<String>) {
        self.references.push(Reference {
            kind,
            name: name.inner().clone(),
            span: name.span().offset_by(self.offset),
            line: self.line,
        });
    }

    /// Resolve names used by `evolve`, pipeline and method lines.
    ///
    /// Pipelines take the visibility of their component and mark it; method
    /// lines set the method of their component.
    fn resolve_references(&mut self) {
        let references = std::mem::take(&mut self.references);
        let mut pipeline_index = 0;

        for reference in references {
            let found = self
                .map
                .elements_mut()
                .iter_mut()
                .find(|element| element.name() == reference.name);

            let (code, what) = match (reference.kind, found) {
                (ReferenceKind::Evolve, Some(_)) => continue,
                (ReferenceKind::Evolve, None) => (ErrorCode::E200, "evolve"),
                (ReferenceKind::Method(method), Some(element)) => {
                    element.set_method(method);
                    continue;
                }
                (ReferenceKind::Method(_), None) => (ErrorCode::E201, "method"),
                (ReferenceKind::Pipeline, found) => {
                    let visibility = found.map(|element| {
                        element.set_pipeline(true);
                        element.visibility()
                    });
                    let index = pipeline_index;
                    pipeline_index += 1;
                    match visibility {
                        Some(visibility) => {
                            if let Some(pipeline) = self.map.pipelines_mut().get_mut(index) {
                                pipeline.set_visibility(visibility);
                            }
                            continue;
                        }
                        None => (ErrorCode::E202, "pipeline"),
                    }
                }
            };

            self.collector.emit(
                Diagnostic::warning(format!(
                    "{what} refers to unknown component `{}`",
                    reference.name
                ))
                .with_code(code)
                .with_line(reference.line)
                .with_label(reference.span, "no element has this name"),
            );
        }
    }
}
