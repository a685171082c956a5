//! Detection of lamdef headers
//!
//! A header is `KEYWORD(PARAMS):` followed by nothing but an optional
//! comment on its physical line. The keyword must be a plain name: not an
//! attribute (`obj.lamdef(...)`) and not the name in `def lamdef(...)`.
//! `KEYWORD(...)` without the colon is an ordinary call.

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::error::LamdefError;
use crate::parser::lexer::TokenStream;
use crate::parser::{Parameter, ScannedSource, Token, parse_parameters};

use super::error::{LineSpan, RewriteError};

/// A lamdef header, by token index
#[derive(Debug, Clone, PartialEq)]
pub struct LamdefHeader {
    /// The keyword
    pub keyword: usize,
    /// Opening parenthesis of the parameter list
    pub open: usize,
    /// Closing parenthesis of the parameter list
    pub close: usize,
    /// The colon after the parameter list
    pub colon: usize,
    /// Trailing comment on the header line
    pub comment: Option<usize>,
    /// Newline ending the header, `None` at end of input
    pub newline: Option<usize>,
    /// Parsed parameters
    pub parameters: Vec<Parameter>,
}

impl LamdefHeader {
    /// Raw parameter text between the parentheses
    pub fn params_text<'a>(&self, scanned: &ScannedSource<'a>) -> &'a str {
        let tokens = &scanned.tokens;
        &scanned.source[tokens[self.open].end..tokens[self.close].start]
    }

    /// Text following the colon up to the end of the comment, if any
    pub fn trailing_text<'a>(&self, scanned: &ScannedSource<'a>) -> &'a str {
        let tokens = &scanned.tokens;
        let colon_end = tokens[self.colon].end;
        match self.comment {
            Some(comment) => &scanned.source[colon_end..tokens[comment].end],
            None => "",
        }
    }

    /// Location of the keyword
    pub fn keyword_span(&self, scanned: &ScannedSource<'_>) -> LineSpan {
        keyword_span(scanned, self.keyword)
    }
}

fn keyword_span(scanned: &ScannedSource<'_>, keyword: usize) -> LineSpan {
    let token = &scanned.tokens[keyword];
    let (line, column) = scanned.index.position(token.start);
    LineSpan::new(line, column, token.len())
}

/// Result of scanning a source for headers
#[derive(Debug, Default)]
pub struct HeaderScan {
    /// Headers in document order, or the error that made one unusable
    pub entries: Vec<Result<LamdefHeader, LamdefError>>,
    /// Headers left untouched
    pub warnings: Vec<Diagnostic>,
}

impl HeaderScan {
    /// Keyword line of every entry, errors included
    pub fn entry_line(&self, scanned: &ScannedSource<'_>, entry: usize) -> Option<usize> {
        match self.entries.get(entry)? {
            Ok(header) => Some(scanned.token_line(header.keyword)),
            Err(LamdefError::Rewrite(error)) => Some(error.span().line),
            Err(LamdefError::Parse(error)) => Some(scanned.index.line_of(error.position())),
            Err(_) => None,
        }
    }
}

/// Find every header in `scanned`
pub fn scan_headers(scanned: &ScannedSource<'_>, keyword: &str) -> HeaderScan {
    let tokens = &scanned.tokens;
    let mut scan = HeaderScan::default();

    for (idx, token) in tokens.iter().enumerate() {
        if !token.value.is_name(keyword) || !is_plain_name(scanned, idx) {
            continue;
        }
        if tokens.get(idx + 1).map(|t| &t.value) != Some(&Token::LeftParen) {
            continue;
        }

        match parse_header(scanned, keyword, idx) {
            HeaderMatch::Header(header) => scan.entries.push(Ok(header)),
            HeaderMatch::Error(error) => scan.entries.push(Err(error)),
            HeaderMatch::Inline => {
                let at = keyword_span(scanned, idx);
                log::warn!(
                    "{keyword} header on line {} has code after the colon; left unchanged",
                    at.line + 1
                );
                scan.warnings.push(
                    DiagnosticBuilder::warning(DiagnosticCode::InlineBody)
                        .with_message(format!(
                            "{keyword} header followed by code on the same line; left unchanged"
                        ))
                        .with_location(at.line, at.column, at.line, at.column + at.width)
                        .with_source_text(scanned.line_text(at.line))
                        .build(),
                );
            }
            HeaderMatch::NotAHeader => {}
        }
    }

    log::trace!(
        "found {} {keyword} headers and {} inline uses",
        scan.entries.len(),
        scan.warnings.len()
    );
    scan
}

enum HeaderMatch {
    Header(LamdefHeader),
    Error(LamdefError),
    Inline,
    NotAHeader,
}

/// The keyword is neither an attribute nor the name being defined
fn is_plain_name(scanned: &ScannedSource<'_>, idx: usize) -> bool {
    let previous = scanned.tokens[..idx]
        .iter()
        .rev()
        .find(|t| !matches!(t.value, Token::Comment(_)));
    !matches!(
        previous.map(|t| &t.value),
        Some(Token::Dot) | Some(Token::Name("def")) | Some(Token::Name("class"))
    )
}

fn parse_header(scanned: &ScannedSource<'_>, keyword: &str, idx: usize) -> HeaderMatch {
    let tokens = &scanned.tokens;
    let open = idx + 1;
    let mut stream = TokenStream::new(tokens, open + 1);

    let Some(close) = stream.skip_balanced() else {
        return HeaderMatch::Error(
            RewriteError::UnterminatedExpression {
                at: keyword_span(scanned, idx),
            }
            .into(),
        );
    };

    let Some(colon) = stream
        .consume_if(|t| *t == Token::Colon)
        .map(|_| stream.position() - 1)
    else {
        return HeaderMatch::NotAHeader;
    };

    let comment = stream
        .consume_if(|t| matches!(t, Token::Comment(_)))
        .map(|_| stream.position() - 1);
    let newline = match stream.peek().map(|t| &t.value) {
        None => None,
        Some(Token::Newline) => Some(stream.position()),
        Some(_) => return HeaderMatch::Inline,
    };

    if let Some(inner) = (open + 1..close).find(|&i| tokens[i].value.is_name(keyword)) {
        return HeaderMatch::Error(
            RewriteError::KeywordInParameters {
                at: keyword_span(scanned, inner),
            }
            .into(),
        );
    }

    match parse_parameters(scanned.source, tokens, open, close) {
        Ok(parameters) => HeaderMatch::Header(LamdefHeader {
            keyword: idx,
            open,
            close,
            colon,
            comment,
            newline,
            parameters,
        }),
        Err(error) => HeaderMatch::Error(error.into()),
    }
}
