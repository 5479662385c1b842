use wardley_core::semantic::{AttitudeKind, ElementKind, Method};
use wardley_parser::{
    error::{ErrorCode, Severity},
    parse, parse_strict,
};

const TEA_SHOP: &str = "\
title Tea Shop
anchor Business [0.95, 0.63]
anchor Public [0.95, 0.78]
component Cup of Tea [0.79, 0.61] label [19, -4]
component Tea [0.63, 0.81]
component Hot Water [0.52, 0.80]
component Kettle [0.43, 0.35] label [-57, 4]
evolve Kettle->Electric Kettle 0.62 label [16, 5]
component Power [0.1, 0.7] label [-27, 20]
evolve Power 0.89 label [-12, 21]
Business->Cup of Tea
Public->Cup of Tea
Cup of Tea->Tea
Cup of Tea->Hot Water
Hot Water->Kettle; limited by
Kettle->Power
build Kettle

annotation 1 [[0.43,0.49],[0.08,0.79]] Standardising power allows Kettles to evolve faster
annotation 2 [0.48, 0.85] Hot water is obvious and well known
annotations [0.60, 0.02]

note +a generic note appeared [0.23, 0.33]

style wardley
";

#[test]
fn test_tea_shop_map() {
    let outcome = parse(TEA_SHOP);
    assert!(
        outcome.diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        outcome.diagnostics()
    );

    let map = outcome.map();
    assert_eq!(map.title(), Some("Tea Shop"));
    assert_eq!(map.style(), Some("wardley"));
    assert_eq!(map.anchors().count(), 2);
    assert_eq!(map.components().count(), 5);
    assert_eq!(map.links().len(), 6);
    assert_eq!(map.evolved().len(), 2);
    assert_eq!(map.annotations().len(), 2);
    assert_eq!(map.notes().len(), 1);
    assert!(map.annotations_position().is_some());

    let kettle = map.element("Kettle").expect("Kettle");
    assert_eq!(kettle.line(), 7);
    assert_eq!(kettle.id(), "component_7");
    assert_eq!(kettle.decorators().method(), Some(Method::Build));

    let evolved = &map.evolved()[0];
    assert_eq!(evolved.name(), "Kettle");
    assert_eq!(evolved.override_name(), Some("Electric Kettle"));
    assert_eq!(evolved.line(), 8);

    let limited = &map.links()[4];
    assert_eq!(limited.to_string(), "Hot Water->Kettle");
    assert_eq!(limited.context(), Some("limited by"));

    assert_eq!(map.annotations()[0].occurrences().len(), 2);
    assert_eq!(map.annotations()[0].line(), 19);
}

#[test]
fn test_bad_lines_are_skipped() {
    let source = "\
component Kettle [0.4, 0.5]
compnent Power [0.1, 0.7]
component Water [0.4 0.5]
component Tea [0.6, 0.8]
";
    let outcome = parse(source);

    assert_eq!(outcome.map().components().count(), 2);
    let errors: Vec<_> = outcome.errors().collect();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].code(), Some(ErrorCode::E100));
    assert_eq!(errors[0].line(), Some(2));
    assert_eq!(errors[1].code(), Some(ErrorCode::E101));
    assert_eq!(errors[1].line(), Some(3));

    // Labels point into the whole source.
    let span = errors[1].labels()[0].span();
    assert!(source[span.range()].starts_with("[0.4"));
}

#[test]
fn test_warnings_keep_the_element() {
    let source = "\
component Kettle
component Power [1.2, 0.7] (shiny)
component Tea [0.6, 0.8] trailing
";
    let outcome = parse(source);
    assert!(!outcome.has_errors());

    let codes: Vec<_> = outcome.warnings().filter_map(|diag| diag.code()).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::E105, ErrorCode::E102, ErrorCode::E103, ErrorCode::E104]
    );

    let kettle = outcome.map().element("Kettle").expect("Kettle");
    assert_eq!(kettle.maturity(), 0.0);
    assert_eq!(outcome.map().components().count(), 3);
}

#[test]
fn test_unknown_references_warn() {
    let source = "\
component Kettle [0.4, 0.5]
evolve Kettel 0.8
buy Teapot
pipeline Cup [0.2, 0.4]
";
    let outcome = parse(source);
    assert!(!outcome.has_errors());

    let codes: Vec<_> = outcome.warnings().filter_map(|diag| diag.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E201, ErrorCode::E202]);
    assert!(
        outcome
            .warnings()
            .all(|diag| diag.severity() == Severity::Warning)
    );
}

#[test]
fn test_pipeline_block() {
    let source = "\
component Kettle [0.45, 0.57]
pipeline Kettle
{
  component Campfire Kettle [0.35] label [-60, 35]
  component Electric Kettle [0.53]
}
";
    let outcome = parse(source);
    assert!(outcome.diagnostics().is_empty(), "{:?}", outcome.diagnostics());

    let map = outcome.map();
    let pipeline = &map.pipelines()[0];
    assert_eq!(pipeline.name(), "Kettle");
    assert_eq!(pipeline.visibility(), 0.45);
    assert!(pipeline.hidden());
    assert_eq!(pipeline.components().len(), 2);
    assert_eq!(pipeline.maturity1(), Some(0.35));
    assert_eq!(pipeline.maturity2(), Some(0.53));
    assert_eq!(pipeline.components()[0].line(), 4);

    assert!(map.element("Kettle").expect("Kettle").pipeline());
}

#[test]
fn test_pipeline_block_errors() {
    let source = "\
component Kettle [0.45, 0.57]
pipeline Kettle {
  component Campfire Kettle [0.35, 0.2]
  Kettle->Campfire Kettle
";
    let outcome = parse(source);
    let codes: Vec<_> = outcome.errors().filter_map(|diag| diag.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E101, ErrorCode::E106, ErrorCode::E106]);

    let stray = parse("}\n");
    assert_eq!(
        stray.errors().next().and_then(|diag| diag.code()),
        Some(ErrorCode::E106)
    );
}

#[test]
fn test_attitudes_accelerators_and_metadata() {
    let source = "\
evolution Uncharted->Emerging->Good->Best
size [800, 600]
pioneers [0.95, 0.2], [0.7, 0.4]
townplanners [0.4, 0.7], [0.1, 0.95]
accelerator Open Source [0.4, 0.55]
deaccelerator Regulation [0.2, 0.6]
url website [https://example.com]
submap Website [0.83, 0.5] url(website)
";
    let outcome = parse(source);
    assert!(outcome.diagnostics().is_empty(), "{:?}", outcome.diagnostics());

    let map = outcome.map();
    assert_eq!(map.evolution().labels()[0], "Uncharted");
    assert_eq!(map.size().map(|size| size.width()), Some(800.0));

    let attitudes = map.attitudes();
    assert_eq!(attitudes.len(), 2);
    assert_eq!(attitudes[1].kind(), AttitudeKind::Townplanners);
    assert!(attitudes[0].region().is_well_formed());

    assert_eq!(map.accelerators().len(), 2);
    assert!(map.accelerators()[1].deaccelerator());
    assert_eq!(map.urls()[0].url(), "https://example.com");

    let website = map.element("Website").expect("Website");
    assert_eq!(website.kind(), ElementKind::Submap);
    assert_eq!(website.url(), Some("website"));
}

#[test]
fn test_crlf_sources() {
    let outcome = parse("component Kettle [0.4, 0.5]\r\nKettle->Power\r\ncomponent Power [0.1, 0.7]\r\n");
    assert!(outcome.diagnostics().is_empty());
    assert_eq!(outcome.map().links()[0].end(), "Power");
    assert_eq!(outcome.map().element("Power").map(|e| e.line()), Some(3));
}

#[test]
fn test_parse_strict() {
    assert!(parse_strict(TEA_SHOP).is_ok());

    let err = parse_strict("component Kettle\ncompnent X [0.1, 0.2]\n").unwrap_err();
    assert_eq!(err.diagnostics().len(), 2);
    assert_eq!(err.errors().count(), 1);
    assert!(err.to_string().starts_with("error[E100]"));
}
