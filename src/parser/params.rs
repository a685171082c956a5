//! Parameter list parsing for lamdef headers
//!
//! The list is split at top-level commas using the token stream, then the
//! head of every parameter (`name`, `*args`, `**kwargs`, `*`, `/`) is parsed
//! with nom. Annotations and defaults are arbitrary expressions and are kept
//! as source text.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{multispace0, satisfy},
    combinator::{all_consuming, map, recognize, value},
    sequence::{delimited, pair, preceded},
};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;

use super::error::{ParseError, ParseResult};
use super::lexer::{is_identifier_continue, is_identifier_start};
use super::span::Spanned;
use super::tokenizer::Token;

/// Kind of a formal parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// `name`, `name=default`
    Positional,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
    /// Bare `*`
    KeywordOnlyMarker,
    /// Bare `/`
    PositionalOnlyMarker,
}

/// One formal parameter of a lamdef header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter kind
    pub kind: ParameterKind,
    /// Name, empty for markers
    pub name: String,
    /// Annotation source text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Default value source text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParameterKind::Positional => write!(f, "{}", self.name)?,
            ParameterKind::VarPositional => write!(f, "*{}", self.name)?,
            ParameterKind::VarKeyword => write!(f, "**{}", self.name)?,
            ParameterKind::KeywordOnlyMarker => return write!(f, "*"),
            ParameterKind::PositionalOnlyMarker => return write!(f, "/"),
        }
        if let Some(annotation) = &self.annotation {
            write!(f, ": {annotation}")?;
        }
        if let Some(default) = &self.default {
            if self.annotation.is_some() {
                write!(f, " = {default}")?;
            } else {
                write!(f, "={default}")?;
            }
        }
        Ok(())
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(is_identifier_start),
        take_while(is_identifier_continue),
    ))
    .parse(input)
}

fn parameter_head(input: &str) -> IResult<&str, (ParameterKind, &str)> {
    all_consuming(delimited(
        multispace0,
        alt((
            map(preceded(pair(tag("**"), multispace0), identifier), |name| {
                (ParameterKind::VarKeyword, name)
            }),
            map(preceded(pair(tag("*"), multispace0), identifier), |name| {
                (ParameterKind::VarPositional, name)
            }),
            value((ParameterKind::KeywordOnlyMarker, ""), tag("*")),
            value((ParameterKind::PositionalOnlyMarker, ""), tag("/")),
            map(identifier, |name| (ParameterKind::Positional, name)),
        )),
        multispace0,
    ))
    .parse(input)
}

/// Text of a parameter list segment with its top-level `:` and `=` offsets
struct Segment {
    start: usize,
    end: usize,
    colon: Option<usize>,
    equal: Option<usize>,
}

/// Split the tokens strictly between `open` and `close` at top-level commas
fn split_segments(tokens: &[Spanned<Token<'_>>], open: usize, close: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut current = Segment {
        start: tokens[open].end,
        end: tokens[close].start,
        colon: None,
        equal: None,
    };

    for token in &tokens[open + 1..close] {
        match token.value {
            ref value if value.is_open_bracket() => depth += 1,
            ref value if value.is_close_bracket() => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                current.end = token.start;
                segments.push(current);
                current = Segment {
                    start: token.end,
                    end: tokens[close].start,
                    colon: None,
                    equal: None,
                };
            }
            Token::Colon if depth == 0 && current.colon.is_none() && current.equal.is_none() => {
                current.colon = Some(token.start);
            }
            Token::Equal if depth == 0 && current.equal.is_none() => {
                current.equal = Some(token.start);
            }
            _ => {}
        }
    }
    segments.push(current);
    segments
}

/// Strip comments that sit between parameters on their own lines
fn clean(text: &str) -> String {
    text.lines()
        .map(|line| match line.find('#') {
            Some(idx) if !line[..idx].contains(['\'', '"']) => &line[..idx],
            _ => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse the parameter list between the tokens at `open` and `close`
pub fn parse_parameters(
    source: &str,
    tokens: &[Spanned<Token<'_>>],
    open: usize,
    close: usize,
) -> ParseResult<Vec<Parameter>> {
    let mut segments = split_segments(tokens, open, close);

    // A trailing comma leaves one empty segment at the end
    if segments.len() > 1
        && segments
            .last()
            .is_some_and(|s| clean(&source[s.start..s.end]).is_empty())
    {
        segments.pop();
    }
    if segments.len() == 1 && clean(&source[segments[0].start..segments[0].end]).is_empty() {
        return Ok(Vec::new());
    }

    let mut parameters = Vec::with_capacity(segments.len());
    let mut seen = FxHashSet::default();
    let mut star_seen = false;
    let mut kwargs_seen = false;
    let mut slash_seen = false;
    let mut default_seen = false;
    // Bare `*` still waiting for a keyword-only parameter
    let mut bare_star: Option<usize> = None;

    for segment in &segments {
        let head_end = segment.colon.or(segment.equal).unwrap_or(segment.end);
        let head = clean(&source[segment.start..head_end]);
        let invalid = |message: String| ParseError::InvalidParameters {
            message,
            position: segment.start,
        };

        if head.is_empty() {
            return Err(invalid("empty parameter".to_string()));
        }
        let (_, (kind, name)) =
            parameter_head(&head).map_err(|_| invalid(format!("'{head}' is not a parameter")))?;

        let annotation = segment.colon.map(|colon| {
            clean(&source[colon + 1..segment.equal.unwrap_or(segment.end)])
        });
        let default = segment
            .equal
            .map(|equal| clean(&source[equal + 1..segment.end]));

        if annotation.as_deref() == Some("") {
            return Err(invalid(format!("missing annotation for '{name}'")));
        }
        if default.as_deref() == Some("") {
            return Err(invalid(format!("missing default value for '{name}'")));
        }

        match kind {
            ParameterKind::KeywordOnlyMarker | ParameterKind::PositionalOnlyMarker
                if annotation.is_some() || default.is_some() =>
            {
                return Err(invalid("markers take no annotation or default".to_string()));
            }
            ParameterKind::VarPositional | ParameterKind::VarKeyword if default.is_some() => {
                return Err(invalid(format!("'{name}' cannot have a default value")));
            }
            _ => {}
        }

        if kwargs_seen {
            return Err(invalid("no parameter may follow **kwargs".to_string()));
        }
        match kind {
            ParameterKind::VarPositional | ParameterKind::KeywordOnlyMarker => {
                if star_seen {
                    return Err(invalid("'*' may appear only once".to_string()));
                }
                star_seen = true;
            }
            ParameterKind::PositionalOnlyMarker => {
                if slash_seen || star_seen || parameters.is_empty() {
                    return Err(invalid("'/' must follow positional parameters".to_string()));
                }
                slash_seen = true;
            }
            ParameterKind::VarKeyword => kwargs_seen = true,
            ParameterKind::Positional if star_seen => bare_star = None,
            ParameterKind::Positional => {
                if default.is_some() {
                    default_seen = true;
                } else if default_seen {
                    return Err(invalid(format!(
                        "parameter '{name}' without a default follows a parameter with one"
                    )));
                }
            }
        }
        if kind == ParameterKind::KeywordOnlyMarker {
            bare_star = Some(segment.start);
        }
        if kind == ParameterKind::VarKeyword && bare_star.is_some() {
            return Err(invalid("named parameters must follow a bare '*'".to_string()));
        }

        if !name.is_empty() && !seen.insert(name.to_string()) {
            return Err(invalid(format!("duplicate parameter '{name}'")));
        }

        parameters.push(Parameter {
            kind,
            name: name.to_string(),
            annotation,
            default,
        });
    }

    if let Some(position) = bare_star {
        return Err(ParseError::InvalidParameters {
            message: "named parameters must follow a bare '*'".to_string(),
            position,
        });
    }

    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::Tokenizer;
    use rstest::rstest;

    fn parse(list: &str) -> ParseResult<Vec<Parameter>> {
        let source = format!("({list})");
        let tokens = Tokenizer::new(&source).tokenize_all().unwrap();
        parse_parameters(&source, &tokens, 0, tokens.len() - 1)
    }

    #[test]
    fn test_simple_and_empty() {
        let params = parse("user").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].kind, ParameterKind::Positional);
        assert_eq!(params[0].name, "user");

        assert!(parse("").unwrap().is_empty());
        assert!(parse("  ").unwrap().is_empty());
    }

    #[test]
    fn test_full_signature() {
        let params = parse("a, b: int = 1, /, c=(1, 2), *args, d: dict[str, int], **kw").unwrap();
        let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "a",
                "b: int = 1",
                "/",
                "c=(1, 2)",
                "*args",
                "d: dict[str, int]",
                "**kw"
            ]
        );
    }

    #[test]
    fn test_keyword_only_after_defaults() {
        let params = parse("a=1, *, b, **kw").unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params[2].kind, ParameterKind::Positional);
        assert!(params[2].default.is_none());
    }

    #[test]
    fn test_multiline_with_trailing_comma() {
        let params = parse("\n    x,  # the item\n    y=lambda q: q,\n").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].default.as_deref(), Some("lambda q: q"));
    }

    #[rstest]
    #[case("1x")]
    #[case("a,,b")]
    #[case("a, a")]
    #[case("*, *")]
    #[case("**kw, a")]
    #[case("*args=1")]
    #[case("/")]
    #[case("a=")]
    #[case("x.y")]
    #[case("a, *")]
    #[case("*, **kw")]
    #[case("a=1, b")]
    fn test_invalid_lists(#[case] list: &str) {
        assert!(
            matches!(parse(list), Err(ParseError::InvalidParameters { .. })),
            "{list} should be rejected"
        );
    }
}
