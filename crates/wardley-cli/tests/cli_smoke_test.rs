use std::fs;

use tempfile::tempdir;

use wardley::{WardleyError, rewrite::RewriteError};
use wardley_cli::{Args, Command, FileArgs, run};

const TEA_SHOP: &str = "\
title Tea Shop
anchor Business [0.95, 0.63]
component Cup of Tea [0.79, 0.61] label [19, -4]
component Kettle [0.43, 0.35] label [-57, 4]
evolve Kettle->Electric Kettle 0.62
component Power [0.1, 0.7]
Business->Cup of Tea
Cup of Tea->Kettle
Kettle->Power; limited by
pioneers [0.95, 0.2], [0.7, 0.4]
";

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn smoke_check_and_show() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("tea.owm");
    fs::write(&input, TEA_SHOP).expect("write input");
    let input = input.to_string_lossy().to_string();

    run(&args(Command::Check {
        input: input.clone(),
    }))
    .expect("check");
    run(&args(Command::Show { input })).expect("show");
}

#[test]
fn smoke_check_reports_parse_errors() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("broken.owm");
    fs::write(&input, "component Kettle [0.4 0.6]\n").expect("write input");

    let result = run(&args(Command::Check {
        input: input.to_string_lossy().to_string(),
    }));
    assert!(matches!(result, Err(WardleyError::Parse { .. })));
}

#[test]
fn smoke_edits_write_output() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("tea.owm");
    let output = dir.path().join("edited.owm");
    fs::write(&input, TEA_SHOP).expect("write input");

    let file = |in_place: bool| FileArgs {
        input: input.to_string_lossy().to_string(),
        output: (!in_place).then(|| output.to_string_lossy().to_string()),
        in_place,
    };

    run(&args(Command::Move {
        file: file(false),
        name: "Electric Kettle".to_string(),
        visibility: 0.35,
        maturity: 0.7,
        evolved: true,
    }))
    .expect("move");
    let edited = fs::read_to_string(&output).expect("read output");
    assert!(edited.contains("evolve Kettle->Electric Kettle 0.70\n"));
    assert_eq!(fs::read_to_string(&input).expect("read input"), TEA_SHOP);

    run(&args(Command::Label {
        file: file(true),
        name: "Power".to_string(),
        x: -27.0,
        y: 20.0,
        evolved: false,
    }))
    .expect("label");
    run(&args(Command::Rename {
        file: file(true),
        line: 4,
        old: "Kettle".to_string(),
        new: "Teapot".to_string(),
    }))
    .expect("rename");
    run(&args(Command::Context {
        file: file(true),
        line: 9,
        context: String::new(),
    }))
    .expect("context");

    let edited = fs::read_to_string(&input).expect("read input");
    assert!(edited.contains("component Power [0.1, 0.7] label [-27, 20]\n"));
    assert!(edited.contains("component Teapot [0.43, 0.35] label [-57, 4]\n"));
    assert!(edited.contains("evolve Teapot->Electric Kettle 0.62\n"));
    assert!(edited.contains("Cup of Tea->Teapot\n"));
    assert!(edited.contains("Teapot->Power\n"));
}

#[test]
fn smoke_move_unknown_element() {
    let dir = tempdir().expect("Failed to create temp directory");
    let input = dir.path().join("tea.owm");
    fs::write(&input, TEA_SHOP).expect("write input");

    let result = run(&args(Command::Move {
        file: FileArgs {
            input: input.to_string_lossy().to_string(),
            output: None,
            in_place: true,
        },
        name: "Teapot".to_string(),
        visibility: 0.5,
        maturity: 0.5,
        evolved: false,
    }));
    match result {
        Err(WardleyError::Rewrite(RewriteError::TargetNotFound { target })) => {
            assert_eq!(target, "element `Teapot`");
        }
        other => panic!("Expected a missing element, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(&input).expect("read input"), TEA_SHOP);
}
