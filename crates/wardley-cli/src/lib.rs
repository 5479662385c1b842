//! CLI logic for the Wardley map tool.
//!
//! Each subcommand reads one map source, runs through the `wardley` library
//! and prints a report or writes the edited source.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, FileArgs};

use std::{fmt::Write as _, fs};

use log::{info, warn};

use wardley::{
    MapBuilder, MapEditor, WardleyError,
    geometry::{DEFAULT_PRECISION, Position, format_coordinate},
    rewrite::{RewriteError, Target},
    semantic::{Element, LabelOffset},
    structure::MapElements,
};

/// Run the Wardley CLI application
///
/// # Errors
///
/// Returns `WardleyError` for:
/// - File I/O and configuration errors
/// - Parse errors in the map source
/// - Edits that no line of the source can take
pub fn run(args: &Args) -> Result<(), WardleyError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let builder = MapBuilder::new(app_config);

    match &args.command {
        Command::Check { input } => {
            info!(input_path = input; "Checking map");
            let (_, map) = builder.read(input)?;
            println!(
                "{input}: {} elements, {} links",
                map.elements().len(),
                map.links().len()
            );
            Ok(())
        }
        Command::Show { input } => {
            info!(input_path = input; "Showing map");
            let (_, map) = builder.read(input)?;
            let elements = builder.elements(&map);
            print!("{}", describe(&builder, &elements));
            Ok(())
        }
        Command::Move {
            file,
            name,
            visibility,
            maturity,
            evolved,
        } => edit(&builder, file, |editor, text, elements| {
            let element = find_element(elements, name, *evolved)?;
            editor.move_element(text, element, Position::new(*visibility, *maturity))
        }),
        Command::Label {
            file,
            name,
            x,
            y,
            evolved,
        } => edit(&builder, file, |editor, text, elements| {
            let element = find_element(elements, name, *evolved)?;
            editor.move_label(text, element, LabelOffset::new(*x, *y))
        }),
        Command::Rename {
            file,
            line,
            old,
            new,
        } => edit(&builder, file, |editor, text, _| {
            editor.rename(text, *line, old, new)
        }),
        Command::Context {
            file,
            line,
            context,
        } => edit(&builder, file, |editor, text, _| {
            editor.set_link_context(text, *line, context)
        }),
    }
}

/// Reads the input, applies `operation` and writes the result.
fn edit<F>(builder: &MapBuilder, file: &FileArgs, operation: F) -> Result<(), WardleyError>
where
    F: FnOnce(&MapEditor, &str, &MapElements<'_>) -> Result<String, WardleyError>,
{
    info!(input_path = file.input; "Editing map");
    let text = fs::read_to_string(&file.input)?;
    let map = builder.parse(&text);
    let elements = builder.elements(&map);
    let editor = MapEditor::new(builder.config(), builder.dimensions(&map));

    let edited = operation(&editor, &text, &elements)?;

    let output = if file.in_place {
        Some(file.input.as_str())
    } else {
        file.output.as_deref()
    };
    match output {
        Some(path) => {
            fs::write(path, edited)?;
            info!(output_file = path; "Map written");
        }
        None => print!("{edited}"),
    }
    Ok(())
}

fn find_element<'a>(
    elements: &'a MapElements<'_>,
    name: &str,
    evolved: bool,
) -> Result<&'a Element, WardleyError> {
    elements
        .elements_for_links()
        .into_iter()
        .find(|element| element.name() == name && element.evolved() == evolved)
        .ok_or_else(|| {
            warn!(name, evolved; "No such element");
            let target = if evolved {
                Target::evolved(name)
            } else {
                Target::element(name)
            };
            WardleyError::Rewrite(RewriteError::TargetNotFound {
                target: target.to_string(),
            })
        })
}

/// A plain-text listing of the derived views of a map.
fn describe(builder: &MapBuilder, elements: &MapElements<'_>) -> String {
    let coordinate = |value| format_coordinate(value, DEFAULT_PRECISION);
    let mut out = String::new();

    for element in elements.elements_for_links() {
        let _ = writeln!(
            out,
            "{:<9} {} [{}, {}] line {}{}",
            element.kind().keyword(),
            element.display_name(),
            coordinate(element.visibility()),
            coordinate(element.maturity()),
            element.line(),
            if element.evolved() { " (evolved)" } else { "" },
        );
    }

    let links = builder.resolve_links(elements);
    for (_, group) in links.groups() {
        for link in group {
            let _ = writeln!(
                out,
                "link      {} -> {} ({}) line {}",
                link.start().id(),
                link.end().id(),
                link.kind(),
                link.link().line()
            );
        }
    }
    for link in links.unresolved() {
        let _ = writeln!(out, "unresolved {link} line {}", link.line());
    }

    for pst in elements.pst_elements() {
        let region = pst.region();
        let _ = writeln!(
            out,
            "{:<9} [{}, {}], [{}, {}] line {}",
            pst.kind().keyword(),
            coordinate(region.visibility1()),
            coordinate(region.maturity1()),
            coordinate(region.visibility2()),
            coordinate(region.maturity2()),
            pst.line()
        );
    }
    out
}
