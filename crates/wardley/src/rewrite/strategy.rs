//! The rewrite strategies and the call-site chains they form.
//!
//! A line is first narrowed to the [`Subject`] the target addresses. The
//! strategies of the call site's chain are then tried in order and the first
//! one whose matcher accepts the subject rewrites the line. More specific
//! strategies come first, so a label clause is never mistaken for the
//! coordinates it follows.

use wardley_core::{
    geometry::{Position, Region, format_coordinate, round_to},
    semantic::LabelOffset,
};
use wardley_parser::{
    Span, Spanned,
    statement::{Coordinates, LabelClause, Statement},
};

use crate::pst;

use super::{
    annotation,
    target::{TargetKind, Update},
};

/// The part of a parsed line an edit is aimed at.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Subject<'s> {
    /// A named statement with an optional `[v, m]` clause after the name.
    Positioned {
        name_end: usize,
        coordinates: Option<&'s Coordinates>,
        label: Option<&'s LabelClause>,
        takes_label: bool,
    },
    Evolved {
        maturity: &'s Spanned<f64>,
        label: Option<&'s LabelClause>,
    },
    Member {
        name_end: usize,
        coordinates: Option<&'s Coordinates>,
        label: Option<&'s LabelClause>,
    },
    Pipeline {
        name_end: usize,
        extent: Option<&'s Coordinates>,
    },
    Attitude {
        first: &'s Coordinates,
        second: &'s Coordinates,
    },
    AnnotationsBox(&'s Coordinates),
    Annotation {
        number_end: usize,
    },
}

impl<'s> Subject<'s> {
    /// Narrows `statement` to what `target` addresses, if it addresses it.
    ///
    /// `in_block` tells whether the line sits inside a pipeline block, where
    /// `component` lines declare members rather than components.
    pub(crate) fn locate(statement: &'s Statement, target: &TargetKind, in_block: bool) -> Option<Self> {
        let subject = match (target, statement) {
            (TargetKind::Element(name), Statement::Element(element))
                if !in_block && element.name.inner() == name =>
            {
                Subject::Positioned {
                    name_end: element.name.span().end(),
                    coordinates: element.coordinates.as_ref(),
                    label: element.modifiers.label.as_ref(),
                    takes_label: true,
                }
            }
            (TargetKind::Element(name), Statement::Accelerator(accelerator))
                if accelerator.name.inner() == name =>
            {
                Subject::Positioned {
                    name_end: accelerator.name.span().end(),
                    coordinates: accelerator.coordinates.as_ref(),
                    label: accelerator.modifiers.label.as_ref(),
                    takes_label: true,
                }
            }
            (TargetKind::Note(text), Statement::Note(note)) if note.text.inner() == text => {
                Subject::Positioned {
                    name_end: note.text.span().end(),
                    coordinates: note.coordinates.as_ref(),
                    label: None,
                    takes_label: false,
                }
            }
            (TargetKind::Evolved(name), Statement::Evolve(evolve))
                if evolve.name.inner() == name
                    || evolve
                        .override_name
                        .as_ref()
                        .is_some_and(|override_name| override_name.inner() == name) =>
            {
                Subject::Evolved {
                    maturity: &evolve.maturity,
                    label: evolve.modifiers.label.as_ref(),
                }
            }
            (TargetKind::PipelineMember(name), Statement::Element(element))
                if in_block && element.name.inner() == name =>
            {
                Subject::Member {
                    name_end: element.name.span().end(),
                    coordinates: element.coordinates.as_ref(),
                    label: element.modifiers.label.as_ref(),
                }
            }
            (TargetKind::Pipeline(name), Statement::Pipeline(pipeline))
                if pipeline.name.inner() == name =>
            {
                Subject::Pipeline {
                    name_end: pipeline.name.span().end(),
                    extent: pipeline.extent.as_ref(),
                }
            }
            (TargetKind::Attitude(kind), Statement::Attitude(attitude)) if attitude.kind == *kind => {
                Subject::Attitude {
                    first: &attitude.first,
                    second: &attitude.second,
                }
            }
            (TargetKind::AnnotationsBox, Statement::AnnotationsBox(coordinates)) => {
                Subject::AnnotationsBox(coordinates)
            }
            (TargetKind::Annotation { number, .. }, Statement::Annotation(annotation))
                if *annotation.number == *number =>
            {
                Subject::Annotation {
                    number_end: annotation.number.span().end(),
                }
            }
            _ => return None,
        };
        Some(subject)
    }

    fn label(&self) -> Option<&'s LabelClause> {
        match self {
            Subject::Positioned { label, .. }
            | Subject::Evolved { label, .. }
            | Subject::Member { label, .. } => *label,
            _ => None,
        }
    }

    /// Where a new `label [x, y]` clause goes: after the position.
    fn label_anchor(&self) -> Option<usize> {
        match self {
            Subject::Positioned {
                takes_label: true,
                name_end,
                coordinates,
                ..
            }
            | Subject::Member {
                name_end,
                coordinates,
                ..
            } => Some(coordinates.map_or(*name_end, |coordinates| coordinates.span.end())),
            Subject::Evolved { maturity, .. } => Some(maturity.span().end()),
            _ => None,
        }
    }
}

/// One way of rewriting a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// `[v, m]` followed by `label [x, y]`: rewrite only the text before the label.
    ExistingCoordsWithLabel,
    /// `[v, m]` without a label.
    ExistingCoords,
    /// The single maturity of an `evolve` line.
    EvolvedSingleCoord,
    /// The `[m]` of a pipeline member, inserted when missing.
    PipelineMemberCoord,
    /// The `[m1, m2]` of a pipeline, inserted when missing.
    PipelineExtent,
    /// Both corner pairs of an attitude region.
    ManyCoord,
    /// The one `annotations [v, m]` line.
    Singleton,
    /// One entry of an annotation's occurrence group.
    AnnotationOccurrence,
    /// No `[v, m]` yet: insert one after the name.
    NotYetDefined,
    ExistingLabel,
    InsertLabel,
}

const POSITION_CHAIN: &[Strategy] = &[
    Strategy::ExistingCoordsWithLabel,
    Strategy::ExistingCoords,
    Strategy::NotYetDefined,
];
const LABEL_CHAIN: &[Strategy] = &[Strategy::ExistingLabel, Strategy::InsertLabel];

impl Strategy {
    /// The ordered chain for an update of `target`.
    ///
    /// An empty chain means the target does not take this kind of update.
    pub(crate) fn chain(target: &TargetKind, update: &Update) -> &'static [Strategy] {
        match (target, update) {
            (TargetKind::Element(_) | TargetKind::Note(_), Update::Position(_)) => POSITION_CHAIN,
            (
                TargetKind::Element(_) | TargetKind::Evolved(_) | TargetKind::PipelineMember(_),
                Update::Label(_),
            ) => LABEL_CHAIN,
            (TargetKind::Evolved(_), Update::Position(_) | Update::Maturity(_)) => {
                &[Strategy::EvolvedSingleCoord]
            }
            (TargetKind::PipelineMember(_), Update::Position(_) | Update::Maturity(_)) => {
                &[Strategy::PipelineMemberCoord]
            }
            (TargetKind::Pipeline(_), Update::Extent { .. }) => &[Strategy::PipelineExtent],
            (TargetKind::Attitude(_), Update::Region(_) | Update::Corner(_)) => {
                &[Strategy::ManyCoord]
            }
            (TargetKind::AnnotationsBox, Update::Position(_)) => &[Strategy::Singleton],
            (TargetKind::Annotation { .. }, Update::Position(_)) => {
                &[Strategy::AnnotationOccurrence]
            }
            _ => &[],
        }
    }

    /// Returns `true` when this strategy handles `subject`.
    pub(crate) fn matches(&self, subject: &Subject<'_>) -> bool {
        match (self, subject) {
            (
                Strategy::ExistingCoordsWithLabel,
                Subject::Positioned {
                    coordinates: Some(coordinates),
                    label: Some(label),
                    ..
                },
            ) => coordinates.pair().is_some() && coordinates.span.end() <= label.span.start(),
            (
                Strategy::ExistingCoords,
                Subject::Positioned {
                    coordinates: Some(coordinates),
                    ..
                },
            ) => coordinates.pair().is_some(),
            (
                Strategy::NotYetDefined,
                Subject::Positioned {
                    coordinates: None, ..
                },
            ) => true,
            (Strategy::EvolvedSingleCoord, Subject::Evolved { .. }) => true,
            (Strategy::PipelineMemberCoord, Subject::Member { coordinates, .. }) => {
                coordinates.is_none_or(|coordinates| coordinates.single().is_some())
            }
            (Strategy::PipelineExtent, Subject::Pipeline { extent, .. }) => {
                extent.is_none_or(|extent| extent.pair().is_some())
            }
            (Strategy::ManyCoord, Subject::Attitude { first, second }) => {
                first.position().is_some() && second.position().is_some()
            }
            (Strategy::Singleton, Subject::AnnotationsBox(coordinates)) => {
                coordinates.pair().is_some()
            }
            (Strategy::AnnotationOccurrence, Subject::Annotation { .. }) => true,
            (Strategy::ExistingLabel, subject) => subject.label().is_some(),
            (Strategy::InsertLabel, subject) => {
                subject.label().is_none() && subject.label_anchor().is_some()
            }
            _ => false,
        }
    }

    /// Rewrites `line`, or returns `None` when the update does not fit.
    pub(crate) fn apply(
        &self,
        line: &str,
        subject: &Subject<'_>,
        target: &TargetKind,
        update: &Update,
        precision: usize,
    ) -> Option<String> {
        let format = Format { precision };
        match (self, subject, update) {
            (
                Strategy::ExistingCoordsWithLabel,
                Subject::Positioned {
                    coordinates: Some(coordinates),
                    label: Some(label),
                    ..
                },
                Update::Position(position),
            ) => {
                let (head, label_tail) = line.split_at(label.span.start());
                let head = replace_span(head, coordinates.span, &format.position(*position));
                Some(format!("{head}{label_tail}"))
            }
            (
                Strategy::ExistingCoords | Strategy::Singleton,
                Subject::Positioned {
                    coordinates: Some(coordinates),
                    ..
                }
                | Subject::AnnotationsBox(coordinates),
                Update::Position(position),
            ) => Some(replace_span(line, coordinates.span, &format.position(*position))),
            (
                Strategy::NotYetDefined,
                Subject::Positioned { name_end, .. },
                Update::Position(position),
            ) => Some(insert_at(line, *name_end, &format.position(*position))),
            (Strategy::EvolvedSingleCoord, Subject::Evolved { maturity, .. }, update) => {
                let value = format.coordinate(update.maturity()?);
                Some(replace_span(line, maturity.span(), &value))
            }
            (
                Strategy::PipelineMemberCoord,
                Subject::Member {
                    name_end,
                    coordinates,
                    ..
                },
                update,
            ) => {
                let clause = format!("[{}]", format.coordinate(update.maturity()?));
                Some(match coordinates {
                    Some(coordinates) => replace_span(line, coordinates.span, &clause),
                    None => insert_at(line, *name_end, &clause),
                })
            }
            (
                Strategy::PipelineExtent,
                Subject::Pipeline { name_end, extent },
                Update::Extent {
                    maturity1,
                    maturity2,
                },
            ) => {
                let clause = format!(
                    "[{}, {}]",
                    format.coordinate(*maturity1),
                    format.coordinate(*maturity2)
                );
                Some(match extent {
                    Some(extent) => replace_span(line, extent.span, &clause),
                    None => insert_at(line, *name_end, &clause),
                })
            }
            (Strategy::ManyCoord, Subject::Attitude { first, second }, update) => {
                let region = match update {
                    Update::Region(region) => *region,
                    Update::Corner(corner) => {
                        pst::drag(Region::from_corners(first.position()?, second.position()?), *corner)
                    }
                    _ => return None,
                };
                // Replace the later clause first so the earlier span stays valid.
                let line = replace_span(line, second.span, &format.position(region.second()));
                Some(replace_span(&line, first.span, &format.position(region.first())))
            }
            (
                Strategy::AnnotationOccurrence,
                Subject::Annotation { number_end },
                Update::Position(position),
            ) => {
                let TargetKind::Annotation { occurrence, .. } = target else {
                    return None;
                };
                let (head, tail) = line.split_at(*number_end);
                let tail = annotation::replace_occurrence(
                    tail,
                    *occurrence,
                    &format.coordinate(position.visibility()),
                    &format.coordinate(position.maturity()),
                )?;
                Some(format!("{head}{tail}"))
            }
            (Strategy::ExistingLabel, subject, Update::Label(offset)) => {
                let label = subject.label()?;
                Some(replace_span(line, label.span, &format.label(*offset)))
            }
            (Strategy::InsertLabel, subject, Update::Label(offset)) => {
                Some(insert_at(line, subject.label_anchor()?, &format.label(*offset)))
            }
            _ => None,
        }
    }
}

/// Writes values the way they go into a source.
#[derive(Debug, Clone, Copy)]
struct Format {
    precision: usize,
}

impl Format {
    fn coordinate(self, value: f64) -> String {
        format_coordinate(value, self.precision)
    }

    fn position(self, position: Position) -> String {
        format!(
            "[{}, {}]",
            self.coordinate(position.visibility()),
            self.coordinate(position.maturity())
        )
    }

    /// Label offsets are pixels and keep no trailing zeros.
    fn label(self, offset: LabelOffset) -> String {
        format!(
            "label [{}, {}]",
            round_to(offset.x(), self.precision),
            round_to(offset.y(), self.precision)
        )
    }
}

fn replace_span(line: &str, span: Span, replacement: &str) -> String {
    let mut output = String::with_capacity(line.len() + replacement.len());
    output.push_str(&line[..span.start()]);
    output.push_str(replacement);
    output.push_str(&line[span.end()..]);
    output
}

/// Inserts `clause` at `offset`, separated from the text before by a space.
fn insert_at(line: &str, offset: usize, clause: &str) -> String {
    let (head, tail) = line.split_at(offset);
    format!("{head} {clause}{tail}")
}

#[cfg(test)]
mod tests {
    use wardley_parser::parse_line;

    use super::*;

    fn rewrite(line: &str, target: TargetKind, update: Update) -> Option<String> {
        let statement = parse_line(line).ok()?;
        let subject = Subject::locate(&statement, &target, false)?;
        let strategy = Strategy::chain(&target, &update)
            .iter()
            .find(|strategy| strategy.matches(&subject))?;
        strategy.apply(line, &subject, &target, &update, 2)
    }

    #[test]
    fn test_with_label_is_tried_before_plain_coords() {
        let line = "component Kettle [0.43, 0.35] label [-57, 4]";
        let statement = parse_line(line).expect("statement");
        let target = TargetKind::Element("Kettle".into());
        let subject = Subject::locate(&statement, &target, false).expect("subject");
        let update = Update::Position(Position::new(0.5, 0.6));

        let first = Strategy::chain(&target, &update)
            .iter()
            .find(|strategy| strategy.matches(&subject));
        assert_eq!(first, Some(&Strategy::ExistingCoordsWithLabel));
        assert_eq!(
            rewrite(line, target, update).as_deref(),
            Some("component Kettle [0.50, 0.60] label [-57, 4]")
        );
    }

    #[test]
    fn test_not_yet_defined_inserts_after_name() {
        assert_eq!(
            rewrite(
                "component Kettle (build)",
                TargetKind::Element("Kettle".into()),
                Update::Position(Position::new(0.4, 0.3)),
            )
            .as_deref(),
            Some("component Kettle [0.40, 0.30] (build)")
        );
    }

    #[test]
    fn test_evolved_single_coord() {
        assert_eq!(
            rewrite(
                "evolve Kettle->Electric Kettle 0.62 label [16, 5]",
                TargetKind::Evolved("Electric Kettle".into()),
                Update::Maturity(0.7),
            )
            .as_deref(),
            Some("evolve Kettle->Electric Kettle 0.70 label [16, 5]")
        );
    }

    #[test]
    fn test_many_coord_corner_keeps_size() {
        assert_eq!(
            rewrite(
                "pioneers [0.95, 0.2], [0.7, 0.4]",
                TargetKind::Attitude(wardley_core::semantic::AttitudeKind::Pioneers),
                Update::Corner(Position::new(0.85, 0.3)),
            )
            .as_deref(),
            Some("pioneers [0.85, 0.30], [0.60, 0.50]")
        );
    }

    #[test]
    fn test_many_coord_corner_stops_at_border() {
        assert_eq!(
            rewrite(
                "pioneers [0.95, 0.2], [0.7, 0.4]",
                TargetKind::Attitude(wardley_core::semantic::AttitudeKind::Pioneers),
                Update::Corner(Position::new(0.5, 0.9)),
            )
            .as_deref(),
            Some("pioneers [0.50, 0.80], [0.25, 1.00]")
        );
        assert_eq!(
            rewrite(
                "settlers [0.6, 0.3], [0.2, 0.5]",
                TargetKind::Attitude(wardley_core::semantic::AttitudeKind::Settlers),
                Update::Corner(Position::new(0.1, -0.2)),
            )
            .as_deref(),
            Some("settlers [0.40, 0.00], [0.00, 0.20]")
        );
    }

    #[test]
    fn test_labels() {
        let target = TargetKind::Element("Kettle".into());
        assert_eq!(
            rewrite(
                "component Kettle [0.43, 0.35] label [-57, 4] inertia",
                target.clone(),
                Update::Label(LabelOffset::new(10.0, -2.5)),
            )
            .as_deref(),
            Some("component Kettle [0.43, 0.35] label [10, -2.5] inertia")
        );
        assert_eq!(
            rewrite(
                "component Kettle [0.43, 0.35] inertia",
                target,
                Update::Label(LabelOffset::new(10.0, 4.0)),
            )
            .as_deref(),
            Some("component Kettle [0.43, 0.35] label [10, 4] inertia")
        );
    }

    #[test]
    fn test_pipeline_extent_insert() {
        assert_eq!(
            rewrite(
                "pipeline Kettle {",
                TargetKind::Pipeline("Kettle".into()),
                Update::Extent {
                    maturity1: 0.2,
                    maturity2: 0.65,
                },
            )
            .as_deref(),
            Some("pipeline Kettle [0.20, 0.65] {")
        );
    }

    #[test]
    fn test_chain_rejects_mismatched_update() {
        let target = TargetKind::AnnotationsBox;
        assert!(Strategy::chain(&target, &Update::Maturity(0.3)).is_empty());
    }
}
