//! Line grammar for map sources.
//!
//! Every line is parsed on its own into a [`Statement`]. A line starts either
//! with a keyword followed by whitespace, or it is a link containing an arrow
//! outside of quoted names. The public entry point is [`statement`], which
//! also reports any text left over after a complete statement.
//!
//! Names are read either quoted, with escapes, or bare. A bare name runs up
//! to the first bracket, parenthesis, brace or semicolon, or up to a `label`,
//! `inertia` or `url(` modifier.

use std::ops::Range;

use winnow::{
    Parser as _,
    ascii::{digit1, float, space0},
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, separated, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, take_till, take_while},
};

use wardley_core::semantic::{AttitudeKind, ElementKind, Method};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::{Span, Spanned},
    statement::{
        AcceleratorStatement, AnnotationStatement, Arrow, AttitudeStatement, Coordinates,
        Decorator, ElementStatement, EvolveStatement, LabelClause, LinkStatement,
        MethodStatement, Modifiers, NoteStatement, PipelineStatement, Statement, UrlStatement,
    },
};

/// Words that start a keyword statement.
pub(crate) const KEYWORDS: &[&str] = &[
    "title",
    "style",
    "evolution",
    "size",
    "component",
    "submap",
    "market",
    "ecosystem",
    "anchor",
    "evolve",
    "pipeline",
    "annotation",
    "annotations",
    "note",
    "build",
    "buy",
    "outsource",
    "pioneers",
    "settlers",
    "townplanners",
    "accelerator",
    "deaccelerator",
    "url",
];

/// Rich diagnostic information for grammar errors.
///
/// Attached to winnow errors via `.context()`. The first context pushed, the
/// innermost one, is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LineDiagnostic>>;

/// A parsed line, with the span of any text the grammar did not consume.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine {
    pub statement: Statement,
    pub trailing: Option<Span>,
}

impl ParsedLine {
    fn complete(statement: Statement) -> Self {
        Self {
            statement,
            trailing: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Modifier {
    Label(LabelClause),
    Decorator(Spanned<Decorator>),
    Inertia,
    Url(Spanned<String>),
}

fn cut(input: &Input<'_>, diagnostic: LineDiagnostic) -> ErrMode<ContextError<LineDiagnostic>> {
    ErrMode::Cut(ContextError::new().add_context(input, &input.checkpoint(), diagnostic))
}

fn advance_to(input: &mut Input<'_>, position: usize) {
    let current = input.current_token_start();
    if position > current {
        let count = (position - current).min(input.eof_offset());
        let _ = input.next_slice(count);
    }
}

/// Yields the characters of `text` that lie outside double-quoted names.
fn unquoted_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut in_quotes = false;
    let mut escaped = false;
    text.char_indices().filter(move |&(_, ch)| {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quotes = false;
            }
            false
        } else if ch == '"' {
            in_quotes = true;
            false
        } else {
            true
        }
    })
}

/// Returns `true` when `text` starts with whitespace and a modifier keyword.
fn starts_modifier(text: &str) -> bool {
    let word = text.trim_start();
    let followed_by = |keyword: &str, allowed: &dyn Fn(char) -> bool| {
        word.strip_prefix(keyword)
            .is_some_and(|after| after.chars().next().is_none_or(allowed))
    };
    followed_by("label", &|c| c.is_whitespace() || c == '[')
        || followed_by("inertia", &|c| c.is_whitespace() || c == '(')
        || word.starts_with("url(")
}

fn bare_name_end(text: &str) -> usize {
    text.char_indices()
        .find(|&(index, ch)| {
            matches!(ch, '[' | '(' | '{' | ';')
                || (ch.is_whitespace() && starts_modifier(&text[index..]))
        })
        .map_or(text.len(), |(index, _)| index)
}

fn modifiers_start(text: &str) -> usize {
    unquoted_chars(text)
        .find(|&(index, ch)| ch == '(' || (ch.is_whitespace() && starts_modifier(&text[index..])))
        .map_or(text.len(), |(index, _)| index)
}

/// Finds the first link arrow outside quoted names.
fn find_arrow(text: &str) -> Option<(Range<usize>, Arrow)> {
    for (index, ch) in unquoted_chars(text) {
        let rest = &text[index..];
        if rest.starts_with("->") {
            return Some((index..index + 2, Arrow::default()));
        }
        if ch != '+' {
            continue;
        }

        let after_plus = &rest[1..];
        let (value, after_value) = match after_plus.strip_prefix('\'') {
            Some(quoted) => match quoted.find('\'') {
                Some(close) => (Some(quoted[..close].to_string()), &quoted[close + 1..]),
                None => continue,
            },
            None => (None, after_plus),
        };
        let (future, past, head) = if after_value.starts_with("<>") {
            (true, true, 2)
        } else if after_value.starts_with('>') {
            (true, false, 1)
        } else if after_value.starts_with('<') {
            (false, true, 1)
        } else {
            continue;
        };

        let end = text.len() - after_value.len() + head;
        let arrow = Arrow {
            flow: true,
            future,
            past,
            value,
        };
        return Some((index..end, arrow));
    }
    None
}

fn ws(input: &mut Input<'_>) -> IResult<()> {
    space0.void().parse_next(input)
}

fn rest_text<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(0.., |_: char| true).parse_next(input)
}

/// A keyword that is not followed by an identifier character.
fn keyword<'a>(
    word: &'static str,
) -> impl winnow::Parser<Input<'a>, &'a str, ErrMode<ContextError<LineDiagnostic>>> {
    terminated(
        word,
        peek(not(one_of(|c: char| c.is_alphanumeric() || c == '_'))),
    )
}

fn number(input: &mut Input<'_>) -> IResult<Spanned<f64>> {
    terminated(
        float,
        peek(not(one_of(|c: char| c.is_alphanumeric() || c == '_'))),
    )
    .with_span()
    .map(|(value, range): (f64, Range<usize>)| Spanned::new(value, Span::new(range)))
    .parse_next(input)
}

/// Parse a bracketed list of numbers: `[0.4, 0.6]`.
fn coordinates(input: &mut Input<'_>) -> IResult<Coordinates> {
    let start = input.current_token_start();
    '['.parse_next(input)?;

    let (values, _): (Vec<Spanned<f64>>, char) =
        cut_err((separated(1.., delimited(ws, number, ws), ','), ']'))
            .context(LineDiagnostic {
                code: ErrorCode::E101,
                message: "malformed coordinates",
                help: Some("write coordinates as `[visibility, maturity]`"),
                start,
            })
            .parse_next(input)?;

    Ok(Coordinates {
        values,
        span: Span::new(start..input.current_token_start()),
    })
}

/// Parse coordinates that must hold exactly two values.
fn pair_coordinates(input: &mut Input<'_>) -> IResult<Coordinates> {
    let start = input.current_token_start();
    let coords = coordinates(input)?;
    if coords.values.len() != 2 {
        return Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E101,
                message: "expected exactly two values",
                help: Some("write coordinates as `[visibility, maturity]`"),
                start,
            },
        ));
    }
    Ok(coords)
}

/// Parse the multi-occurrence form `[[v, m], [v, m]]`.
fn occurrence_list(input: &mut Input<'_>) -> IResult<Vec<Coordinates>> {
    let start = input.current_token_start();
    ('[', ws, peek('[')).parse_next(input)?;

    cut_err(terminated(
        separated(1.., delimited(ws, pair_coordinates, ws), ','),
        ']',
    ))
    .context(LineDiagnostic {
        code: ErrorCode::E101,
        message: "malformed annotation occurrences",
        help: Some("write occurrences as `[[visibility, maturity], [visibility, maturity]]`"),
        start,
    })
    .parse_next(input)
}

/// Parse an escape sequence in a quoted name starting with backslash.
fn name_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();
    '\\'.parse_next(input)?;

    cut_err(one_of(['n', '"', '\\']).map(|c| if c == 'n' { '\n' } else { c }))
        .context(LineDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes in names are `\\n`, `\\\"` and `\\\\`"),
            start: escape_start,
        })
        .parse_next(input)
}

/// Parse a double-quoted name, unescaping its content.
fn quoted_name(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    let start = input.current_token_start();
    '"'.parse_next(input)?;

    let content = repeat(0.., alt((name_escape, none_of(['"', '\\'])))).fold(
        String::new,
        |mut acc, ch| {
            acc.push(ch);
            acc
        },
    );

    let value = cut_err(terminated(content, '"'))
        .context(LineDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated quoted name",
            help: Some("add closing `\"`"),
            start,
        })
        .parse_next(input)?;

    Ok(Spanned::new(
        value,
        Span::new(start..input.current_token_start()),
    ))
}

/// Consume a bare name running up to the absolute position `end`.
fn bare_name_until(input: &mut Input<'_>, end: usize) -> IResult<Spanned<String>> {
    let start = input.current_token_start();
    let count = end.saturating_sub(start).min(input.eof_offset());
    let raw = input.next_slice(count);
    let trimmed = raw.trim_end();
    if trimmed.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    Ok(Spanned::new(
        trimmed.to_string(),
        Span::new(start..start + trimmed.len()),
    ))
}

/// Parse a quoted or bare name that fills the input up to `end`.
fn name_until(input: &mut Input<'_>, end: usize) -> IResult<Spanned<String>> {
    ws.parse_next(input)?;
    if !peek(rest_text).parse_next(input)?.starts_with('"') {
        return bare_name_until(input, end);
    }

    let name = quoted_name(input)?;
    ws.parse_next(input)?;
    if input.current_token_start() < end {
        return Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E107,
                message: "unexpected text after quoted name",
                help: None,
                start: name.span().end(),
            },
        ));
    }
    Ok(name)
}

/// Parse a quoted or bare name of a positioned element.
fn name(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    let remaining = peek(rest_text).parse_next(input)?;
    if remaining.starts_with('"') {
        return quoted_name(input);
    }
    let end = input.current_token_start() + bare_name_end(remaining);
    bare_name_until(input, end)
}

fn label_clause(input: &mut Input<'_>) -> IResult<LabelClause> {
    let start = input.current_token_start();
    keyword("label").parse_next(input)?;

    let coords = cut_err(preceded(ws, coordinates))
        .context(LineDiagnostic {
            code: ErrorCode::E101,
            message: "malformed label offset",
            help: Some("write label offsets as `label [x, y]`"),
            start,
        })
        .parse_next(input)?;

    match coords.values.as_slice() {
        [x, y] => Ok(LabelClause {
            x: x.clone(),
            y: y.clone(),
            span: Span::new(start..coords.span.end()),
        }),
        _ => Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E101,
                message: "expected exactly two label offsets",
                help: Some("write label offsets as `label [x, y]`"),
                start,
            },
        )),
    }
}

fn decorator(input: &mut Input<'_>) -> IResult<Spanned<Decorator>> {
    delimited('(', take_till(0.., ')'), ')')
        .with_span()
        .map(|(word, range): (&str, Range<usize>)| {
            let decorator = match word.trim() {
                "market" => Decorator::Market,
                "ecosystem" => Decorator::Ecosystem,
                other => match other.parse::<Method>() {
                    Ok(method) => Decorator::Method(method),
                    Err(_) => Decorator::Unknown(other.to_string()),
                },
            };
            Spanned::new(decorator, Span::new(range))
        })
        .parse_next(input)
}

fn url_clause(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    preceded(keyword("url"), delimited('(', take_till(0.., ')'), ')'))
        .with_span()
        .map(|(url, range): (&str, Range<usize>)| {
            Spanned::new(url.trim().to_string(), Span::new(range))
        })
        .parse_next(input)
}

fn modifier(input: &mut Input<'_>) -> IResult<Modifier> {
    alt((
        label_clause.map(Modifier::Label),
        keyword("inertia").value(Modifier::Inertia),
        url_clause.map(Modifier::Url),
        decorator.map(Modifier::Decorator),
    ))
    .parse_next(input)
}

/// Parse modifiers in any order until none matches.
fn modifiers(input: &mut Input<'_>) -> IResult<Modifiers> {
    let mut modifiers = Modifiers::default();
    while let Some(modifier) = opt(preceded(ws, modifier)).parse_next(input)? {
        match modifier {
            Modifier::Label(label) => modifiers.label = Some(label),
            Modifier::Decorator(decorator) => modifiers.decorators.push(decorator),
            Modifier::Inertia => modifiers.inertia = true,
            Modifier::Url(url) => modifiers.url = Some(url),
        }
    }
    Ok(modifiers)
}

fn text_argument(input: &mut Input<'_>) -> IResult<Spanned<String>> {
    let start = input.current_token_start();
    ws.parse_next(input)?;
    let text_start = input.current_token_start();
    let text = rest_text.parse_next(input)?.trim_end();
    if text.is_empty() {
        return Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E107,
                message: "expected text after the keyword",
                help: None,
                start,
            },
        ));
    }
    Ok(Spanned::new(
        text.to_string(),
        Span::new(text_start..text_start + text.len()),
    ))
}

fn evolution_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let text = rest_text.parse_next(input)?;

    let mut stages = Vec::new();
    let mut offset = start;
    for part in text.split("->") {
        let leading = part.len() - part.trim_start().len();
        let trimmed = part.trim();
        let stage_start = offset + leading;
        stages.push(Spanned::new(
            trimmed.to_string(),
            Span::new(stage_start..stage_start + trimmed.len()),
        ));
        offset += part.len() + 2;
    }

    if stages.len() != 4 || stages.iter().any(|stage| stage.is_empty()) {
        return Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E107,
                message: "expected four evolution stages",
                help: Some("write `evolution Genesis->Custom->Product->Commodity`"),
                start,
            },
        ));
    }
    Ok(Statement::Evolution(stages))
}

fn size_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    cut_err(preceded(ws, pair_coordinates))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected map size",
            help: Some("write `size [width, height]`"),
            start,
        })
        .map(Statement::Size)
        .parse_next(input)
}

fn element_statement(kind: ElementKind, input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let name = cut_err(preceded(ws, name))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected an element name",
            help: Some("write `<keyword> <name> [visibility, maturity]`"),
            start,
        })
        .parse_next(input)?;
    let coordinates = opt(preceded(ws, coordinates)).parse_next(input)?;
    let modifiers = modifiers(input)?;

    Ok(Statement::Element(ElementStatement {
        kind,
        name,
        coordinates,
        modifiers,
    }))
}

/// Parse `evolve <name>[-><override>] <maturity> ...`.
///
/// The maturity is the last token before the modifiers; everything between
/// the keyword and that token is the name, optionally with an override.
fn evolve_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let base = input.current_token_start();
    let malformed = LineDiagnostic {
        code: ErrorCode::E107,
        message: "expected `evolve <name> <maturity>`",
        help: Some("write `evolve <name> <maturity>` or `evolve <name>-><new name> <maturity>`"),
        start: base,
    };

    let remaining = peek(rest_text).parse_next(input)?;
    let head = remaining[..modifiers_start(remaining)].trim_end();
    let Some((split, _)) = unquoted_chars(head)
        .filter(|(_, ch)| ch.is_whitespace())
        .last()
    else {
        return Err(cut(input, malformed));
    };
    let name_part = head[..split].trim_end();
    let name_end = base + name_part.len();
    let name_start = name_part.trim_start();
    if name_start.is_empty() {
        return Err(cut(input, malformed));
    }

    let name = if name_start.starts_with('"') {
        ws.parse_next(input)?;
        quoted_name(input)?
    } else {
        let arrow = name_part.find("->").map_or(name_end, |index| base + index);
        cut_err(preceded(ws, move |i: &mut Input<'_>| bare_name_until(i, arrow)))
            .context(malformed.clone())
            .parse_next(input)?
    };

    ws.parse_next(input)?;
    let override_name = if opt("->").parse_next(input)?.is_some() {
        let parsed = cut_err(move |i: &mut Input<'_>| name_until(i, name_end))
            .context(LineDiagnostic {
                code: ErrorCode::E107,
                message: "expected a name after `->`",
                help: None,
                start: base,
            })
            .parse_next(input)?;
        Some(parsed)
    } else {
        None
    };

    advance_to(input, base + split);
    let maturity_start = input.current_token_start();
    let maturity = cut_err(preceded(ws, number))
        .context(LineDiagnostic {
            code: ErrorCode::E101,
            message: "expected a maturity",
            help: Some("evolve lines carry a single maturity between 0 and 1"),
            start: maturity_start,
        })
        .parse_next(input)?;
    let modifiers = modifiers(input)?;

    Ok(Statement::Evolve(EvolveStatement {
        name,
        override_name,
        maturity,
        modifiers,
    }))
}

fn pipeline_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let name = cut_err(preceded(ws, name))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected a pipeline name",
            help: Some("write `pipeline <component> [maturity1, maturity2]`"),
            start,
        })
        .parse_next(input)?;
    let extent = opt(preceded(ws, pair_coordinates)).parse_next(input)?;
    let opens_block = opt(preceded(ws, '{')).parse_next(input)?.is_some();

    Ok(Statement::Pipeline(PipelineStatement {
        name,
        extent,
        opens_block,
    }))
}

fn annotation_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let (number, range) = cut_err(preceded(
        ws,
        digit1.try_map(|digits: &str| digits.parse::<u32>()).with_span(),
    ))
    .context(LineDiagnostic {
        code: ErrorCode::E107,
        message: "expected an annotation number",
        help: Some("write `annotation <number> [visibility, maturity] <text>`"),
        start,
    })
    .parse_next(input)?;

    let coordinates_start = input.current_token_start();
    let (occurrences, multi) = cut_err(preceded(
        ws,
        alt((
            occurrence_list.map(|occurrences| (occurrences, true)),
            pair_coordinates.map(|coords| (vec![coords], false)),
        )),
    ))
    .context(LineDiagnostic {
        code: ErrorCode::E101,
        message: "expected annotation coordinates",
        help: Some("write `[visibility, maturity]` or `[[v, m], [v, m]]`"),
        start: coordinates_start,
    })
    .parse_next(input)?;

    let text = rest_text.parse_next(input)?.trim();

    Ok(Statement::Annotation(AnnotationStatement {
        number: Spanned::new(number, Span::new(range)),
        occurrences,
        multi,
        text: (!text.is_empty()).then(|| text.to_string()),
    }))
}

fn annotations_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    cut_err(preceded(ws, pair_coordinates))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected the annotations box position",
            help: Some("write `annotations [visibility, maturity]`"),
            start,
        })
        .map(Statement::AnnotationsBox)
        .parse_next(input)
}

fn note_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    ws.parse_next(input)?;
    let text_start = input.current_token_start();
    let remaining = peek(rest_text).parse_next(input)?;
    let text_end = unquoted_chars(remaining)
        .find(|&(_, ch)| ch == '[')
        .map_or(remaining.len(), |(index, _)| index);
    let text = input.next_slice(text_end).trim_end();
    if text.is_empty() {
        return Err(cut(
            input,
            LineDiagnostic {
                code: ErrorCode::E107,
                message: "expected note text",
                help: Some("write `note <text> [visibility, maturity]`"),
                start,
            },
        ));
    }
    let text = Spanned::new(
        text.to_string(),
        Span::new(text_start..text_start + text.len()),
    );
    let coordinates = opt(preceded(ws, coordinates)).parse_next(input)?;

    Ok(Statement::Note(NoteStatement { text, coordinates }))
}

fn method_statement(method: Method, input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let end = start + peek(rest_text).parse_next(input)?.trim_end().len();
    cut_err(move |i: &mut Input<'_>| name_until(i, end))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected a component name",
            help: Some("write `build <component>`, `buy <component>` or `outsource <component>`"),
            start,
        })
        .map(|name| Statement::Method(MethodStatement { method, name }))
        .parse_next(input)
}

fn attitude_statement(kind: AttitudeKind, input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    cut_err((
        preceded(ws, pair_coordinates),
        preceded((ws, ',', ws), pair_coordinates),
    ))
    .context(LineDiagnostic {
        code: ErrorCode::E101,
        message: "malformed region",
        help: Some("write regions as `[visibility1, maturity1], [visibility2, maturity2]`"),
        start,
    })
    .map(|(first, second)| Statement::Attitude(AttitudeStatement { kind, first, second }))
    .parse_next(input)
}

fn accelerator_statement(deaccelerator: bool, input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let name = cut_err(preceded(ws, name))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected an accelerator name",
            help: Some("write `accelerator <name> [visibility, maturity]`"),
            start,
        })
        .parse_next(input)?;
    let coordinates = opt(preceded(ws, coordinates)).parse_next(input)?;
    let modifiers = modifiers(input)?;

    Ok(Statement::Accelerator(AcceleratorStatement {
        deaccelerator,
        name,
        coordinates,
        modifiers,
    }))
}

fn url_statement(input: &mut Input<'_>) -> IResult<Statement> {
    let start = input.current_token_start();
    let malformed = LineDiagnostic {
        code: ErrorCode::E107,
        message: "expected `url <name> [<address>]`",
        help: None,
        start,
    };
    let name = cut_err(preceded(ws, name))
        .context(malformed.clone())
        .parse_next(input)?;
    let (address, range) = cut_err(preceded(
        ws,
        delimited('[', take_till(0.., ']'), ']').with_span(),
    ))
    .context(malformed)
    .parse_next(input)?;

    Ok(Statement::Url(UrlStatement {
        name,
        address: Spanned::new(address.trim().to_string(), Span::new(range)),
    }))
}

fn keyword_statement(keyword: &str, input: &mut Input<'_>) -> IResult<Statement> {
    match keyword {
        "title" => text_argument.map(Statement::Title).parse_next(input),
        "style" => text_argument.map(Statement::Style).parse_next(input),
        "evolution" => evolution_statement(input),
        "size" => size_statement(input),
        "component" => element_statement(ElementKind::Component, input),
        "submap" => element_statement(ElementKind::Submap, input),
        "market" => element_statement(ElementKind::Market, input),
        "ecosystem" => element_statement(ElementKind::Ecosystem, input),
        "anchor" => element_statement(ElementKind::Anchor, input),
        "evolve" => evolve_statement(input),
        "pipeline" => pipeline_statement(input),
        "annotation" => annotation_statement(input),
        "annotations" => annotations_statement(input),
        "note" => note_statement(input),
        "build" => method_statement(Method::Build, input),
        "buy" => method_statement(Method::Buy, input),
        "outsource" => method_statement(Method::Outsource, input),
        "accelerator" => accelerator_statement(false, input),
        "deaccelerator" => accelerator_statement(true, input),
        "url" => url_statement(input),
        other => match AttitudeKind::from_keyword(other) {
            Some(kind) => attitude_statement(kind, input),
            None => Err(ErrMode::Backtrack(ContextError::new())),
        },
    }
}

fn link_statement(
    input: &mut Input<'_>,
    arrow: Range<usize>,
    kind: Arrow,
    content_end: usize,
) -> IResult<Statement> {
    let start = input.current_token_start();
    let arrow_start = arrow.start;
    let link_start = cut_err(move |i: &mut Input<'_>| name_until(i, arrow_start))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected a name before the arrow",
            help: Some("write links as `<start>-><end>`"),
            start,
        })
        .parse_next(input)?;

    advance_to(input, arrow.end);
    let remaining = peek(rest_text).parse_next(input)?;
    let semicolon = unquoted_chars(remaining)
        .find(|&(_, ch)| ch == ';')
        .map(|(index, _)| arrow.end + index)
        .filter(|position| *position < content_end);
    let end_limit = semicolon.unwrap_or(content_end);

    let link_end = cut_err(move |i: &mut Input<'_>| name_until(i, end_limit))
        .context(LineDiagnostic {
            code: ErrorCode::E107,
            message: "expected a name after the arrow",
            help: Some("write links as `<start>-><end>`"),
            start: arrow.end,
        })
        .parse_next(input)?;

    let context = match semicolon {
        Some(position) => {
            advance_to(input, position + 1);
            let text = rest_text.parse_next(input)?.trim();
            Some(Spanned::new(
                text.to_string(),
                Span::new(position..content_end),
            ))
        }
        None => None,
    };

    Ok(Statement::Link(LinkStatement {
        start: link_start,
        end: link_end,
        arrow: Spanned::new(kind, Span::new(arrow)),
        context,
    }))
}

/// Convert an ErrMode and error position to a Diagnostic.
///
/// Extracts `LineDiagnostic` from the error context for rich error info
/// with code, message, and help. Falls back to E107 (malformed statement)
/// if no diagnostic context is found.
fn convert_error(
    err: ErrMode<ContextError<LineDiagnostic>>,
    error_pos: usize,
    line_len: usize,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(LineDiagnostic {
        code,
        message,
        help,
        start,
    }) = context_error.context().next()
    {
        let end = error_pos.max(*start + 1).min(line_len).max(*start);
        let mut diag = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(*start..end), code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        return diag;
    }

    let span = Span::new(error_pos.min(line_len)..(error_pos + 1).min(line_len));
    Diagnostic::error("malformed statement")
        .with_code(ErrorCode::E107)
        .with_label(span, ErrorCode::E107.description())
}

fn unknown_statement(word: &str, indent: usize, content: &str) -> Diagnostic {
    let width = if word.is_empty() {
        content.chars().next().map_or(0, char::len_utf8)
    } else {
        word.len()
    };
    let shown = &content[..width];

    let diag = Diagnostic::error(format!("unknown statement `{shown}`"))
        .with_code(ErrorCode::E100)
        .with_label(Span::new(indent..indent + width), "not a keyword or link");

    match word.strip_prefix("evolve") {
        Some(name) if !name.is_empty() => {
            diag.with_help(format!("write a space after `evolve`: `evolve {name} ...`"))
        }
        _ => diag.with_help("start the line with a keyword such as `component`, or write a link `A->B`"),
    }
}

/// `evolveX 0.8`: an evolve line without a space before the name.
///
/// Only taken when the line ends in a maturity and carries no arrow besides a
/// plain `->` override, so links whose start begins with "evolve" still parse.
fn is_glued_evolve(word: &str, content: &str) -> bool {
    if word.len() <= "evolve".len() || !word.starts_with("evolve") {
        return false;
    }
    let head = content[..modifiers_start(content)].trim_end();
    let Some((split, _)) = unquoted_chars(head).filter(|(_, ch)| ch.is_whitespace()).last() else {
        return false;
    };
    head[split..].trim().parse::<f64>().is_ok()
        && find_arrow(&head[..split]).is_none_or(|(_, arrow)| !arrow.flow)
}

fn trailing_text(input: &mut Input<'_>) -> Option<Span> {
    let parsed: IResult<(&str, Range<usize>)> =
        preceded(ws, rest_text.with_span()).parse_next(input);
    let (text, range) = parsed.ok()?;
    let trimmed = text.trim_end();
    (!trimmed.is_empty()).then(|| Span::new(range.start..range.start + trimmed.len()))
}

/// Parse a single source line.
///
/// `line` must not contain a line break. Spans in the result are relative to
/// the start of `line`.
pub(crate) fn statement(line: &str) -> Result<ParsedLine> {
    let content = line.trim();
    let indent = line.len() - line.trim_start().len();

    match content {
        "" => return Ok(ParsedLine::complete(Statement::Blank)),
        "{" => return Ok(ParsedLine::complete(Statement::BlockOpen)),
        "}" => return Ok(ParsedLine::complete(Statement::BlockClose)),
        _ if content.starts_with("//") => return Ok(ParsedLine::complete(Statement::Comment)),
        _ => {}
    }

    let mut input = LocatingSlice::new(line);
    advance_to(&mut input, indent);

    let word_len = content
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(content.len());
    let word = &content[..word_len];
    let is_keyword = KEYWORDS.contains(&word)
        && content[word_len..]
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '[');

    let result = if is_keyword {
        advance_to(&mut input, indent + word_len);
        keyword_statement(word, &mut input)
    } else if is_glued_evolve(word, content) {
        advance_to(&mut input, indent + "evolve".len());
        evolve_statement(&mut input)
    } else if let Some((arrow, kind)) = find_arrow(content) {
        let arrow = indent + arrow.start..indent + arrow.end;
        link_statement(&mut input, arrow, kind, indent + content.len())
    } else {
        return Err(unknown_statement(word, indent, content));
    };

    let statement = match result {
        Ok(statement) => statement,
        Err(err) => return Err(convert_error(err, input.current_token_start(), line.len())),
    };
    let trailing = trailing_text(&mut input);

    Ok(ParsedLine {
        statement,
        trailing,
    })
}
