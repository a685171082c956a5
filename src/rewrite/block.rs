// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resolution of a header into a complete lamdef block
//!
//! Given a header, find:
//! - the first line of the statement holding it, where the generated
//!   function will be inserted
//! - the body lines following the header
//! - the terminator line that resumes the enclosing expression

use crate::error::LamdefError;
use crate::parser::ScannedSource;
use crate::parser::Token;

use super::error::{LineSpan, RewriteError};
use super::header::LamdefHeader;
use super::options::RewriteOptions;

/// Statement keywords that cannot be preceded by an inserted definition
const CLAUSE_KEYWORDS: [&str; 4] = ["elif", "else", "except", "finally"];

/// A header together with its statement, body and terminator
#[derive(Debug, Clone, PartialEq)]
pub struct LamdefBlock {
    /// The header this block was resolved from
    pub header: LamdefHeader,
    /// Line holding the keyword
    pub keyword_line: usize,
    /// First token of the enclosing statement
    pub statement_token: usize,
    /// First line of the enclosing statement
    pub statement_line: usize,
    /// Bracket depth at the keyword
    pub depth: usize,
    /// Indentation width of the keyword line
    pub reference_indent: usize,
    /// First body line
    pub body_start: usize,
    /// Last non-blank body line
    pub body_end: usize,
    /// First code line of the body, whose indentation is the body's base
    pub base_line: usize,
    /// First comment line between the body and the terminator, inside brackets
    pub trailing_comment: Option<usize>,
    /// Line resuming the enclosing expression
    pub terminator: Option<usize>,
    /// Target of a `name = lamdef(...):` statement
    pub direct_assignment: Option<String>,
}

impl LamdefBlock {
    /// Number of body lines
    pub fn body_len(&self) -> usize {
        self.body_end + 1 - self.body_start
    }
}

/// Resolve `header` into a block
pub fn resolve_block(
    scanned: &ScannedSource<'_>,
    header: &LamdefHeader,
    options: &RewriteOptions,
) -> Result<LamdefBlock, LamdefError> {
    let tokens = &scanned.tokens;
    let keyword_at = header.keyword_span(scanned);
    let keyword_line = keyword_at.line;

    let (statement_token, depth) = statement_start(scanned, header.keyword);
    let statement_line = scanned.token_line(statement_token);
    let first = &tokens[statement_token];
    let clause = match first.value {
        Token::At => Some("@"),
        Token::Name(name) if CLAUSE_KEYWORDS.contains(&name) => Some(name),
        _ => None,
    };
    if let Some(keyword) = clause {
        let (line, column) = scanned.index.position(first.start);
        return Err(RewriteError::UnsupportedPosition {
            keyword: keyword.to_string(),
            at: LineSpan::new(line, column, first.len()),
        }
        .into());
    }

    let Some(newline) = header.newline else {
        return Err(RewriteError::EmptyBody { at: keyword_at }.into());
    };
    let body_start = scanned.token_line(newline) + 1;
    let reference_indent = scanned.layout.line(keyword_line).indent_width;

    let mut body_end = None;
    let mut base_line = None;
    let mut trailing_comment = None;
    let mut terminator = None;

    for line in body_start..scanned.layout.len() {
        let layout = scanned.layout.line(line);
        if layout.in_string || layout.continued || layout.depth > depth {
            body_end = Some(line);
            trailing_comment = None;
            continue;
        }
        if layout.depth < depth {
            let closing = line.saturating_sub(1).max(body_start);
            let width = scanned.line_text(closing).len();
            return Err(RewriteError::ClosedInsideBody {
                at: LineSpan::new(closing, 0, width),
            }
            .into());
        }
        if layout.blank {
            continue;
        }
        // No statement starts with a closing bracket or a comma
        let resumes_expression = scanned
            .line_text(line)
            .trim_start()
            .starts_with([')', ']', '}', ',']);
        if layout.indent_width > reference_indent && !resumes_expression {
            body_end = Some(line);
            trailing_comment = None;
            if base_line.is_none() && !layout.comment_only {
                base_line = Some(line);
            }
            continue;
        }
        if layout.comment_only {
            // Comments may dedent freely; decided by what follows
            trailing_comment.get_or_insert(line);
            continue;
        }
        terminator = Some(line);
        break;
    }

    let (Some(body_end), Some(base_line)) = (body_end, base_line) else {
        return Err(RewriteError::EmptyBody { at: keyword_at }.into());
    };

    if depth > 0 && terminator.is_none() {
        return Err(RewriteError::UnterminatedExpression { at: keyword_at }.into());
    }
    // At depth 0 the comments stay where they are
    if depth == 0 {
        trailing_comment = None;
    }

    let direct_assignment = if depth == 0 && options.direct_assignment {
        direct_target(scanned, statement_token, header.keyword)
    } else {
        None
    };

    log::trace!(
        "resolved block at line {}: statement line {}, body {}..={}, terminator {:?}",
        keyword_line + 1,
        statement_line + 1,
        body_start + 1,
        body_end + 1,
        terminator.map(|l| l + 1)
    );

    Ok(LamdefBlock {
        header: header.clone(),
        keyword_line,
        statement_token,
        statement_line,
        depth,
        reference_indent,
        body_start,
        body_end,
        base_line,
        trailing_comment,
        terminator,
        direct_assignment,
    })
}

/// First token of the logical line holding `keyword`, and the bracket depth at `keyword`
fn statement_start(scanned: &ScannedSource<'_>, keyword: usize) -> (usize, usize) {
    let mut depth = 0usize;
    let mut at_start = true;
    let mut statement = keyword;

    for (idx, token) in scanned.tokens[..keyword].iter().enumerate() {
        match token.value {
            Token::Newline if depth == 0 => at_start = true,
            Token::Newline | Token::Comment(_) | Token::Continuation => {}
            ref value => {
                if at_start {
                    statement = idx;
                    at_start = false;
                }
                if value.is_open_bracket() {
                    depth += 1;
                } else if value.is_close_bracket() {
                    depth = depth.saturating_sub(1);
                }
            }
        }
    }

    if at_start {
        statement = keyword;
    }
    (statement, depth)
}

/// `NAME =` directly in front of the keyword
fn direct_target(scanned: &ScannedSource<'_>, statement: usize, keyword: usize) -> Option<String> {
    let mut significant = scanned.tokens[statement..keyword]
        .iter()
        .filter(|t| !t.value.is_trivia());
    match (significant.next(), significant.next(), significant.next()) {
        (Some(name), Some(equal), None) if equal.value == Token::Equal => {
            name.value.as_name().map(str::to_string)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::header::scan_headers;

    fn resolve(source: &str) -> Result<LamdefBlock, LamdefError> {
        let scanned = ScannedSource::new(source).unwrap();
        let mut scan = scan_headers(&scanned, "lamdef");
        let header = scan.entries.remove(0)?;
        resolve_block(&scanned, &header, &RewriteOptions::default())
    }

    #[test]
    fn test_call_argument_block() {
        let block = resolve(
            "def f(user_list):\n    ranked = sorted(user_list, key=lamdef(user):\n        n = len(user.name)\n\n        return n\n    )\n    return ranked\n",
        )
        .unwrap();

        assert_eq!(block.statement_line, 1);
        assert_eq!(block.depth, 1);
        assert_eq!(block.reference_indent, 4);
        assert_eq!((block.body_start, block.body_end), (2, 4));
        assert_eq!(block.base_line, 2);
        assert_eq!(block.terminator, Some(5));
        assert_eq!(block.direct_assignment, None);
        assert_eq!(block.body_len(), 3);
    }

    #[test]
    fn test_direct_assignment_block() {
        let block =
            resolve("add_one = lamdef(x):\n    result = x + 1\n    return result\n\nprint(add_one(5))\n")
                .unwrap();
        assert_eq!(block.depth, 0);
        assert_eq!(block.direct_assignment.as_deref(), Some("add_one"));
        assert_eq!(block.body_end, 2);
        assert_eq!(block.terminator, Some(4));
    }

    #[test]
    fn test_statement_spanning_lines() {
        let block = resolve(
            "result = sorted(\n    users,\n    key=lamdef(u):\n        return u.name\n)\n",
        )
        .unwrap();
        assert_eq!(block.statement_line, 0);
        assert_eq!(block.keyword_line, 2);
        assert_eq!(block.reference_indent, 4);
        assert_eq!(block.terminator, Some(4));
    }

    #[test]
    fn test_dedented_string_and_comment_stay_in_body() {
        let block = resolve(
            "f = g(lamdef():\n    doc = '''\nraw\n'''\n# note\n    return doc\n)\n",
        )
        .unwrap();
        assert_eq!(block.body_end, 5);
        assert_eq!(block.terminator, Some(6));
        assert_eq!(block.trailing_comment, None);
    }

    #[test]
    fn test_comment_before_terminator() {
        let block =
            resolve("evens = list(filter(lamdef(n):\n    return n % 2 == 0\n# keep evens\n, ns))\n")
                .unwrap();
        assert_eq!(block.body_end, 1);
        assert_eq!(block.trailing_comment, Some(2));
        assert_eq!(block.terminator, Some(3));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            resolve("x = f(lamdef(a):\n)\n"),
            Err(LamdefError::Rewrite(RewriteError::EmptyBody { .. }))
        ));
        assert!(matches!(
            resolve("x = f(lamdef(a):\n    return a\n"),
            Err(LamdefError::Rewrite(RewriteError::UnterminatedExpression { .. }))
        ));
        assert!(matches!(
            resolve("x = f(lamdef(a):\n    return a)\ny = 1\n"),
            Err(LamdefError::Rewrite(RewriteError::ClosedInsideBody { .. }))
        ));
        assert!(matches!(
            resolve("if a:\n    pass\nelif any(map(lamdef(v):\n    return v\n, vs)):\n    pass\n"),
            Err(LamdefError::Rewrite(RewriteError::UnsupportedPosition { .. }))
        ));
        assert!(matches!(
            resolve("g = lamdef(x):\n    # only a comment\n"),
            Err(LamdefError::Rewrite(RewriteError::EmptyBody { .. }))
        ));
    }
}
