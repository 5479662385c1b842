//! Unit tests for the line grammar.
//!
//! These tests drive `parser::statement` directly, checking both the
//! interpreted values and the spans editors rely on.

use proptest::prelude::*;

use wardley_core::semantic::{AttitudeKind, ElementKind, Method};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser::{self, ParsedLine},
    statement::{Decorator, Statement},
    string::format_name,
};

fn parse_ok(line: &str) -> ParsedLine {
    match parser::statement(line) {
        Ok(parsed) => parsed,
        Err(err) => panic!("Expected `{line}` to parse, but got error: {err}"),
    }
}

fn parse_err(line: &str) -> Diagnostic {
    match parser::statement(line) {
        Ok(parsed) => panic!("Expected `{line}` to fail, but got {:?}", parsed.statement),
        Err(err) => err,
    }
}

fn assert_code(line: &str, code: ErrorCode) {
    let err = parse_err(line);
    assert_eq!(err.code(), Some(code), "unexpected diagnostic {err}");
}

#[test]
fn test_blank_and_comment_lines() {
    assert_eq!(parse_ok("").statement, Statement::Blank);
    assert_eq!(parse_ok("   \t").statement, Statement::Blank);
    assert_eq!(parse_ok("// component X [0.1, 0.2]").statement, Statement::Comment);
    assert_eq!(parse_ok("  {").statement, Statement::BlockOpen);
    assert_eq!(parse_ok("}").statement, Statement::BlockClose);
}

#[test]
fn test_component_with_label() {
    let line = "component Kettle [0.43, 0.35] label [-57, 4]";
    let Statement::Element(element) = parse_ok(line).statement else {
        panic!("Expected an element");
    };

    assert_eq!(element.kind, ElementKind::Component);
    assert_eq!(element.name.inner(), "Kettle");
    assert_eq!(&line[element.name.span().range()], "Kettle");

    let coords = element.coordinates.expect("coordinates");
    assert_eq!(coords.pair(), Some((0.43, 0.35)));
    assert_eq!(&line[coords.span.range()], "[0.43, 0.35]");

    let label = element.modifiers.label.expect("label");
    assert_eq!(*label.x, -57.0);
    assert_eq!(*label.y, 4.0);
    assert_eq!(&line[label.span.range()], "label [-57, 4]");
}

#[test]
fn test_numbers_tolerate_whitespace() {
    let Statement::Element(element) = parse_ok("anchor Business [ 0.95 ,0.63 ]").statement else {
        panic!("Expected an element");
    };
    assert_eq!(element.kind, ElementKind::Anchor);
    assert_eq!(element.coordinates.and_then(|c| c.pair()), Some((0.95, 0.63)));
}

#[test]
fn test_multi_word_name_and_indent() {
    let line = "    component Power Station [0.1, 0.7]";
    let Statement::Element(element) = parse_ok(line).statement else {
        panic!("Expected an element");
    };
    assert_eq!(element.name.inner(), "Power Station");
    assert_eq!(element.name.span().range(), 14..27);
}

#[test]
fn test_quoted_name_unescapes() {
    let line = r#"component "Tea \"Shop\"\nNorth" [0.5, 0.5]"#;
    let Statement::Element(element) = parse_ok(line).statement else {
        panic!("Expected an element");
    };
    assert_eq!(element.name.inner(), "Tea \"Shop\"\nNorth");
    assert_eq!(
        &line[element.name.span().range()],
        r#""Tea \"Shop\"\nNorth""#
    );
}

#[test]
fn test_quoted_name_errors() {
    assert_code(r#"component "Tea [0.5, 0.5]"#, ErrorCode::E001);
    assert_code(r#"component "Te\q" [0.5, 0.5]"#, ErrorCode::E003);
}

#[test]
fn test_decorators_and_inertia() {
    let line = "component Kettle [0.4, 0.5] (buy) (market) inertia (shiny)";
    let Statement::Element(element) = parse_ok(line).statement else {
        panic!("Expected an element");
    };

    let decorators: Vec<_> = element
        .modifiers
        .decorators
        .iter()
        .map(|d| d.inner().clone())
        .collect();
    assert_eq!(
        decorators,
        vec![
            Decorator::Method(Method::Buy),
            Decorator::Market,
            Decorator::Unknown("shiny".to_string()),
        ]
    );
    assert!(element.modifiers.inertia);
}

#[test]
fn test_submap_with_url() {
    let Statement::Element(element) =
        parse_ok("submap Website [0.83, 0.5] url(websiteMap)").statement
    else {
        panic!("Expected an element");
    };
    assert_eq!(element.kind, ElementKind::Submap);
    assert_eq!(element.modifiers.url.map(|u| u.into_inner()), Some("websiteMap".to_string()));
}

#[test]
fn test_component_without_coordinates() {
    let Statement::Element(element) = parse_ok("component Cup label [5, 5]").statement else {
        panic!("Expected an element");
    };
    assert_eq!(element.name.inner(), "Cup");
    assert!(element.coordinates.is_none());
    assert!(element.modifiers.label.is_some());
}

#[test]
fn test_malformed_coordinates() {
    let err = parse_err("component Kettle [0.4 0.5]");
    assert_eq!(err.code(), Some(ErrorCode::E101));
    assert_eq!(err.labels()[0].span().start(), 17);

    assert_code("component Kettle [0.4, ]", ErrorCode::E101);
    assert_code("component Kettle [0.4, 0.5] label [1]", ErrorCode::E101);
}

#[test]
fn test_trailing_text_is_reported() {
    let line = "component Kettle [0.4, 0.5] extra words";
    let parsed = parse_ok(line);
    let span = parsed.trailing.expect("trailing text");
    assert_eq!(&line[span.range()], "extra words");
}

#[test]
fn test_evolve_plain() {
    let Statement::Evolve(evolve) = parse_ok("evolve Kettle 0.62").statement else {
        panic!("Expected an evolve");
    };
    assert_eq!(evolve.name.inner(), "Kettle");
    assert!(evolve.override_name.is_none());
    assert_eq!(*evolve.maturity, 0.62);
}

#[test]
fn test_evolve_with_override_and_label() {
    let line = "evolve Kettle->Electric Kettle 0.62 label [16, 5]";
    let Statement::Evolve(evolve) = parse_ok(line).statement else {
        panic!("Expected an evolve");
    };
    assert_eq!(evolve.name.inner(), "Kettle");
    assert_eq!(evolve.name.span().range(), 7..13);
    assert_eq!(
        evolve.override_name.as_ref().map(|name| name.inner().as_str()),
        Some("Electric Kettle")
    );
    assert_eq!(*evolve.maturity, 0.62);
    assert_eq!(&line[evolve.maturity.span().range()], "0.62");
    assert!(evolve.modifiers.label.is_some());
}

#[test]
fn test_evolve_quoted_name() {
    let Statement::Evolve(evolve) = parse_ok(r#"evolve "Tea Shop" 0.8 inertia"#).statement else {
        panic!("Expected an evolve");
    };
    assert_eq!(evolve.name.inner(), "Tea Shop");
    assert_eq!(*evolve.maturity, 0.8);
    assert!(evolve.modifiers.inertia);
}

#[test]
fn test_evolve_errors() {
    assert_code("evolve Kettle", ErrorCode::E107);
    assert_code("evolve Kettle soon", ErrorCode::E101);

    let err = parse_err("evolveKettle soon");
    assert_eq!(err.code(), Some(ErrorCode::E100));
    assert!(err.help().is_some_and(|help| help.contains("evolve Kettle")));
}

#[test]
fn test_evolve_without_space() {
    let Statement::Evolve(evolve) = parse_ok("evolveX 0.8").statement else {
        panic!("Expected an evolve");
    };
    assert_eq!(*evolve.name, "X");
    assert_eq!(evolve.name.span().range(), 6..7);
    assert_eq!(*evolve.maturity, 0.8);
    assert!(evolve.override_name.is_none());

    let Statement::Evolve(evolve) = parse_ok("evolveKettle->Electric Kettle 0.62 inertia").statement
    else {
        panic!("Expected an evolve");
    };
    assert_eq!(*evolve.name, "Kettle");
    assert_eq!(
        evolve.override_name.as_ref().map(|name| name.inner().as_str()),
        Some("Electric Kettle")
    );
    assert!(evolve.modifiers.inertia);
}

#[test]
fn test_link_starting_with_evolve() {
    let Statement::Link(link) = parse_ok("evolveX->Y").statement else {
        panic!("Expected a link");
    };
    assert_eq!(*link.start, "evolveX");
    assert_eq!(*link.end, "Y");
}

#[test]
fn test_plain_link() {
    let line = "Cup of Tea->Tea";
    let Statement::Link(link) = parse_ok(line).statement else {
        panic!("Expected a link");
    };
    assert_eq!(link.start.inner(), "Cup of Tea");
    assert_eq!(link.end.inner(), "Tea");
    assert!(!link.arrow.flow);
    assert_eq!(&line[link.arrow.span().range()], "->");
    assert!(link.context.is_none());
}

#[test]
fn test_flow_link_with_value_and_context() {
    let line = "Hot Water+'10'>Kettle; heats the water";
    let Statement::Link(link) = parse_ok(line).statement else {
        panic!("Expected a link");
    };
    assert_eq!(link.start.inner(), "Hot Water");
    assert_eq!(link.end.inner(), "Kettle");
    assert!(link.arrow.flow);
    assert!(link.arrow.future);
    assert!(!link.arrow.past);
    assert_eq!(link.arrow.value.as_deref(), Some("10"));

    let context = link.context.expect("context");
    assert_eq!(context.inner(), "heats the water");
    assert_eq!(&line[context.span().range()], "; heats the water");
}

#[test]
fn test_flow_link_directions() {
    let Statement::Link(both) = parse_ok("A+<>B").statement else {
        panic!("Expected a link");
    };
    assert!(both.arrow.flow && both.arrow.future && both.arrow.past);
    assert_eq!(both.end.inner(), "B");

    let Statement::Link(past) = parse_ok("A+<B").statement else {
        panic!("Expected a link");
    };
    assert!(past.arrow.past && !past.arrow.future);
}

#[test]
fn test_link_with_quoted_names() {
    let Statement::Link(link) = parse_ok(r#""A->B"->"C;D""#).statement else {
        panic!("Expected a link");
    };
    assert_eq!(link.start.inner(), "A->B");
    assert_eq!(link.end.inner(), "C;D");
}

#[test]
fn test_link_missing_end() {
    assert_code("Kettle->", ErrorCode::E107);
}

#[test]
fn test_pipeline_statements() {
    let Statement::Pipeline(pipeline) = parse_ok("pipeline Kettle [0.15, 0.65]").statement else {
        panic!("Expected a pipeline");
    };
    assert_eq!(pipeline.name.inner(), "Kettle");
    assert_eq!(pipeline.extent.and_then(|e| e.pair()), Some((0.15, 0.65)));
    assert!(!pipeline.opens_block);

    let Statement::Pipeline(pipeline) = parse_ok("pipeline Kettle {").statement else {
        panic!("Expected a pipeline");
    };
    assert!(pipeline.extent.is_none());
    assert!(pipeline.opens_block);
}

#[test]
fn test_annotations() {
    let line = "annotation 1 [[0.43,0.49],[0.08,0.79]] Standardising power";
    let Statement::Annotation(annotation) = parse_ok(line).statement else {
        panic!("Expected an annotation");
    };
    assert_eq!(*annotation.number, 1);
    assert!(annotation.multi);
    assert_eq!(annotation.occurrences.len(), 2);
    assert_eq!(annotation.occurrences[1].pair(), Some((0.08, 0.79)));
    assert_eq!(annotation.text.as_deref(), Some("Standardising power"));

    let Statement::Annotation(single) = parse_ok("annotation 2 [0.48, 0.85]").statement else {
        panic!("Expected an annotation");
    };
    assert!(!single.multi);
    assert!(single.text.is_none());

    let Statement::AnnotationsBox(position) = parse_ok("annotations [0.72, 0.03]").statement
    else {
        panic!("Expected an annotations box");
    };
    assert_eq!(position.pair(), Some((0.72, 0.03)));

    assert_code("annotation one [0.1, 0.2]", ErrorCode::E107);
}

#[test]
fn test_attitude() {
    let Statement::Attitude(attitude) =
        parse_ok("pioneers [0.95, 0.2], [0.7, 0.4]").statement
    else {
        panic!("Expected an attitude");
    };
    assert_eq!(attitude.kind, AttitudeKind::Pioneers);
    assert_eq!(attitude.first.pair(), Some((0.95, 0.2)));
    assert_eq!(attitude.second.pair(), Some((0.7, 0.4)));

    assert_code("settlers [0.95, 0.2]", ErrorCode::E101);
}

#[test]
fn test_note_method_url_and_accelerator() {
    let Statement::Note(note) = parse_ok("note +future of tea [0.3, 0.6]").statement else {
        panic!("Expected a note");
    };
    assert_eq!(note.text.inner(), "+future of tea");
    assert!(note.coordinates.is_some());

    let Statement::Method(method) = parse_ok("outsource Power Station").statement else {
        panic!("Expected a method");
    };
    assert_eq!(method.method, Method::Outsource);
    assert_eq!(method.name.inner(), "Power Station");

    let Statement::Url(url) = parse_ok("url websiteMap [https://example.com/map]").statement else {
        panic!("Expected a url");
    };
    assert_eq!(url.name.inner(), "websiteMap");
    assert_eq!(url.address.inner(), "https://example.com/map");

    let Statement::Accelerator(accelerator) =
        parse_ok("deaccelerator Regulation [0.2, 0.6]").statement
    else {
        panic!("Expected an accelerator");
    };
    assert!(accelerator.deaccelerator);
    assert_eq!(accelerator.name.inner(), "Regulation");
}

#[test]
fn test_metadata_statements() {
    let Statement::Title(title) = parse_ok("title Tea Shop  ").statement else {
        panic!("Expected a title");
    };
    assert_eq!(title.inner(), "Tea Shop");

    let Statement::Evolution(stages) =
        parse_ok("evolution Uncharted->Emerging->Good->Best").statement
    else {
        panic!("Expected evolution stages");
    };
    let stages: Vec<_> = stages.iter().map(|s| s.inner().as_str()).collect();
    assert_eq!(stages, ["Uncharted", "Emerging", "Good", "Best"]);

    let Statement::Size(size) = parse_ok("size [800, 600]").statement else {
        panic!("Expected a size");
    };
    assert_eq!(size.pair(), Some((800.0, 600.0)));

    assert_code("evolution A->B", ErrorCode::E107);
    assert_code("size 800", ErrorCode::E107);
    assert_code("size [800]", ErrorCode::E101);
    assert_code("title", ErrorCode::E107);
}

#[test]
fn test_unknown_statement() {
    let err = parse_err("  compnent Kettle [0.4, 0.5]");
    assert_eq!(err.code(), Some(ErrorCode::E100));
    assert_eq!(err.labels()[0].span().range(), 2..10);
}

#[test]
fn test_keyword_as_single_word_link_name() {
    let Statement::Link(link) = parse_ok("note->title").statement else {
        panic!("Expected a link");
    };
    assert_eq!(link.start.inner(), "note");
    assert_eq!(link.end.inner(), "title");
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ()\\[\\];+<>'\"\\\\\n.-]{1,16}"
}

proptest! {
    #[test]
    fn formatted_names_read_back_in_components(name in name_strategy()) {
        let line = format!("component {} [0.5, 0.5]", format_name(&name));
        let parsed = parser::statement(&line);
        prop_assert!(parsed.is_ok(), "{line}");
        match parsed.map(|p| p.statement) {
            Ok(Statement::Element(element)) => prop_assert_eq!(element.name.inner(), &name),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn formatted_names_read_back_in_links(start in name_strategy(), end in name_strategy()) {
        let line = format!("{}->{}", format_name(&start), format_name(&end));
        match parser::statement(&line).map(|p| p.statement) {
            Ok(Statement::Link(link)) => {
                prop_assert_eq!(link.start.inner(), &start);
                prop_assert_eq!(link.end.inner(), &end);
            }
            other => prop_assert!(false, "unexpected {:?} for {}", other, line),
        }
    }
}
