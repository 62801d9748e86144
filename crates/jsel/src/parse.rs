//! Parser for the selector string syntax
//!
//! Produces the same `Selector` values as the fluent builder, so
//! `parse(".a.[].[0]")` and `root().field("a").iterate().index(0).compile()`
//! are structurally equal. The legality rules the builder enforces through
//! types are enforced here at parse time: a mandatory marker on a non-field
//! step or a doubled marker is a [`ParseError`] pointing at the marker.

use thiserror::Error;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, delimited, empty, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::ast::{IndexPredicate, NamePredicate, Selector, set_of};

type PResult<T> = winnow::ModalResult<T>;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (line {line}, column {column}, offset {offset})")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Parse a selector from its string syntax
pub fn parse(input: &str) -> Result<Selector, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(build_parse_error("empty selector".to_string(), input, 0));
    }
    let mut stream = input;
    match raw_selector.parse_next(&mut stream) {
        Ok(steps) => {
            if stream.trim().is_empty() {
                assemble(input, steps)
            } else {
                let offset = trailing_input_offset(input, stream);
                Err(build_parse_error(
                    "unexpected trailing input".to_string(),
                    input,
                    offset,
                ))
            }
        }
        Err(e) => {
            let offset = input.len().saturating_sub(stream.len());
            Err(build_parse_error(format!("{:?}", e), input, offset))
        }
    }
}

fn build_parse_error(message: String, input: &str, offset: usize) -> ParseError {
    let (line, column) = offset_to_line_column(input, offset);
    ParseError {
        message,
        offset,
        line,
        column,
    }
}

fn offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let bounded = offset.min(input.len());
    let mut line = 1usize;
    let mut column = 1usize;

    for ch in input[..bounded].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

fn trailing_input_offset(input: &str, trailing: &str) -> usize {
    let base = input.len().saturating_sub(trailing.len());
    let non_ws = trailing
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    base + non_ws
}

// ============ Raw steps ============
//
// Parsing runs in two passes: the grammar below produces flat raw steps, then
// `assemble` folds them into a selector and validates the markers. Keeping
// marker validation out of the winnow phase means a misused `!` surfaces as a
// positioned error instead of a generic backtrack.

#[derive(Debug, Clone)]
struct RawStep {
    body: RawBody,
    modifiers: Vec<RawModifier>,
}

#[derive(Debug, Clone)]
enum RawBody {
    Field(String),
    Names(String, Vec<String>),
    Iterate,
    Range(usize, usize),
    Indices(usize, Vec<usize>),
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Mandatory,
    Lenient,
}

#[derive(Debug, Clone, Copy)]
struct RawModifier {
    marker: Marker,
    /// Remaining input length just before the marker char; `assemble` turns
    /// it back into an absolute offset.
    rest_len: usize,
}

fn raw_selector(input: &mut &str) -> PResult<Vec<RawStep>> {
    // A bare "." is the identity selector.
    alt((repeat(1.., raw_step), '.'.map(|_| Vec::new()))).parse_next(input)
}

fn raw_step(input: &mut &str) -> PResult<RawStep> {
    let body = preceded((ws, '.'), step_body).parse_next(input)?;
    // Markers bind to their step, so no whitespace is allowed before them.
    let modifiers: Vec<RawModifier> = repeat(0.., modifier).parse_next(input)?;
    Ok(RawStep { body, modifiers })
}

fn step_body(input: &mut &str) -> PResult<RawBody> {
    alt((bracket_body, field_name.map(RawBody::Field))).parse_next(input)
}

fn modifier(input: &mut &str) -> PResult<RawModifier> {
    let rest_len = input.len();
    alt(('!'.value(Marker::Mandatory), '?'.value(Marker::Lenient)))
        .map(|marker| RawModifier { marker, rest_len })
        .parse_next(input)
}

// ============ Bracket bodies ============

fn bracket_body(input: &mut &str) -> PResult<RawBody> {
    delimited(
        ('[', ws),
        alt((
            name_list,
            index_range,
            index_list,
            empty.value(RawBody::Iterate),
        )),
        (ws, ']'),
    )
    .parse_next(input)
}

fn name_list(input: &mut &str) -> PResult<RawBody> {
    let first = quoted_name.parse_next(input)?;
    let rest: Vec<String> = repeat(0.., preceded((ws, ',', ws), quoted_name)).parse_next(input)?;
    Ok(RawBody::Names(first, rest))
}

fn index_range(input: &mut &str) -> PResult<RawBody> {
    (int, ws, ':', ws, int)
        .map(|(start, _, _, _, end)| RawBody::Range(start, end))
        .parse_next(input)
}

fn index_list(input: &mut &str) -> PResult<RawBody> {
    let first = int.parse_next(input)?;
    let rest: Vec<usize> = repeat(0.., preceded((ws, ',', ws), int)).parse_next(input)?;
    Ok(RawBody::Indices(first, rest))
}

fn int(input: &mut &str) -> PResult<usize> {
    digit1
        .try_map(|s: &str| s.parse::<usize>())
        .parse_next(input)
}

// ============ Field names ============

fn field_name(input: &mut &str) -> PResult<String> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

fn quoted_name(input: &mut &str) -> PResult<String> {
    alt((
        delimited('"', string_contents('"'), '"'),
        delimited('\'', string_contents('\''), '\''),
    ))
    .parse_next(input)
}

fn string_contents<'a>(quote: char) -> impl FnMut(&mut &'a str) -> PResult<String> {
    move |input: &mut &'a str| {
        let mut result = String::new();
        loop {
            let Some(c) = input.chars().next() else {
                return Err(winnow::error::ErrMode::Backtrack(
                    winnow::error::ContextError::new(),
                ));
            };
            if c == quote {
                break;
            } else if c == '\\' {
                *input = &input[1..];
                let Some(escaped) = input.chars().next() else {
                    return Err(winnow::error::ErrMode::Backtrack(
                        winnow::error::ContextError::new(),
                    ));
                };
                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    '0' => '\0',
                    _ => escaped, // Unknown escapes pass through
                };
                result.push(unescaped);
                *input = &input[escaped.len_utf8()..];
            } else {
                result.push(c);
                *input = &input[c.len_utf8()..];
            }
        }
        Ok(result)
    }
}

// ============ Whitespace ============

fn ws(input: &mut &str) -> PResult<()> {
    multispace0.void().parse_next(input)
}

// ============ Assembly ============

struct StepFlags {
    strict: bool,
    mandatory: bool,
}

fn assemble(input: &str, steps: Vec<RawStep>) -> Result<Selector, ParseError> {
    let mut selector = Selector::This;
    for step in steps {
        let flags = step_flags(input, &step)?;
        let next = match step.body {
            RawBody::Field(name) => Selector::Name {
                predicate: NamePredicate::Single(name),
                strict: flags.strict,
                mandatory: flags.mandatory,
            },
            RawBody::Names(first, rest) => Selector::Name {
                predicate: name_predicate(first, rest),
                strict: flags.strict,
                mandatory: flags.mandatory,
            },
            RawBody::Iterate => Selector::Iterate {
                strict: flags.strict,
            },
            RawBody::Range(start, end) => Selector::Index {
                predicate: IndexPredicate::range(start, end),
                strict: flags.strict,
            },
            RawBody::Indices(first, rest) => Selector::Index {
                predicate: index_predicate(first, rest),
                strict: flags.strict,
            },
        };
        selector = Selector::pipe(selector, next);
    }
    Ok(selector)
}

fn step_flags(input: &str, step: &RawStep) -> Result<StepFlags, ParseError> {
    let takes_mandatory = matches!(step.body, RawBody::Field(_) | RawBody::Names(..));
    let mut mandatory = false;
    let mut lenient = false;

    for modifier in &step.modifiers {
        let offset = input.len() - modifier.rest_len;
        match modifier.marker {
            Marker::Mandatory => {
                if !takes_mandatory {
                    return Err(build_parse_error(
                        "mandatory marker `!` only applies to field steps".to_string(),
                        input,
                        offset,
                    ));
                }
                if mandatory {
                    return Err(build_parse_error(
                        "mandatory marker `!` applied twice to one step".to_string(),
                        input,
                        offset,
                    ));
                }
                mandatory = true;
            }
            Marker::Lenient => {
                if lenient {
                    return Err(build_parse_error(
                        "lenient marker `?` applied twice to one step".to_string(),
                        input,
                        offset,
                    ));
                }
                lenient = true;
            }
        }
    }

    Ok(StepFlags {
        strict: !lenient,
        mandatory,
    })
}

// A one-element bracket list means the same thing as the bare form, so it
// collapses to `Single` before de-duplication can matter.

fn name_predicate(first: String, rest: Vec<String>) -> NamePredicate {
    if rest.is_empty() {
        NamePredicate::Single(first)
    } else {
        NamePredicate::Several(set_of(first, rest))
    }
}

fn index_predicate(first: usize, rest: Vec<usize>) -> IndexPredicate {
    if rest.is_empty() {
        IndexPredicate::Single(first)
    } else {
        IndexPredicate::Several(set_of(first, rest))
    }
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identity() {
        assert_eq!(parse(".").unwrap(), Selector::This);
        assert_eq!(parse("  .  ").unwrap(), Selector::This);
    }

    #[test]
    fn parse_step_chain() {
        let selector = parse(".a.[].[0]").unwrap();
        assert_eq!(
            selector,
            Selector::Pipe {
                first: Box::new(Selector::Pipe {
                    first: Box::new(Selector::Name {
                        predicate: NamePredicate::Single("a".into()),
                        strict: true,
                        mandatory: false,
                    }),
                    second: Box::new(Selector::Iterate { strict: true }),
                }),
                second: Box::new(Selector::Index {
                    predicate: IndexPredicate::Single(0),
                    strict: true,
                }),
            }
        );
    }

    #[test]
    fn parse_markers() {
        assert_eq!(
            parse(".a!?").unwrap(),
            Selector::Name {
                predicate: NamePredicate::Single("a".into()),
                strict: false,
                mandatory: true,
            }
        );
        // Marker order is free.
        assert_eq!(parse(".a?!").unwrap(), parse(".a!?").unwrap());
    }

    #[test]
    fn parse_marker_misuse() {
        let err = parse(".[]!").unwrap_err();
        assert!(err.message.contains("only applies to field steps"));
        assert_eq!(err.offset, 3);

        let err = parse(".a??").unwrap_err();
        assert!(err.message.contains("applied twice"));
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn parse_quoted_name_escapes() {
        assert_eq!(
            parse(r#".["\é"]"#).unwrap(),
            Selector::Name {
                predicate: NamePredicate::Single("é".into()),
                strict: true,
                mandatory: false,
            }
        );
    }
}
