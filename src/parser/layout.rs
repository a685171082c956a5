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

//! Physical line layout
//!
//! Python's block structure is carried by indentation, but only on lines
//! that begin a fresh logical line. A line that starts inside a triple-quoted
//! string, inside an open bracket or after a backslash continuation has an
//! indentation that means nothing. [`SourceLayout`] records, for every
//! physical line, what its start looks like to the tokenizer so the block
//! resolver can tell those apart.

use super::span::{LineIndex, Spanned, indent_width, leading_whitespace};
use super::tokenizer::Token;

/// What the tokenizer sees at the start of one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLayout {
    /// Bracket depth at the start of the line
    pub depth: usize,
    /// The line starts inside a multi-line string literal
    pub in_string: bool,
    /// The previous line ended with a backslash continuation
    pub continued: bool,
    /// Byte length of the leading whitespace
    pub indent_len: usize,
    /// Indentation width, tabs expanded
    pub indent_width: usize,
    /// Whitespace only
    pub blank: bool,
    /// Only a comment after the indentation
    pub comment_only: bool,
}

impl LineLayout {
    /// Whether this line is free-form text rather than an indented code line
    /// at `depth`
    pub fn is_free_form(&self, depth: usize) -> bool {
        self.in_string || self.continued || self.depth != depth
    }
}

/// Line table for one source text
#[derive(Debug, Clone)]
pub struct SourceLayout {
    lines: Vec<LineLayout>,
}

impl SourceLayout {
    /// Compute the layout of `source` from its tokens
    pub fn new(source: &str, index: &LineIndex, tokens: &[Spanned<Token<'_>>]) -> Self {
        let count = index.line_count();
        let mut lines = Vec::with_capacity(count);
        for line in 0..count {
            let text = index.line_text(source, line);
            let indent = leading_whitespace(text);
            let rest = &text[indent.len()..];
            lines.push(LineLayout {
                indent_len: indent.len(),
                indent_width: indent_width(indent),
                blank: rest.is_empty(),
                comment_only: rest.starts_with('#'),
                ..LineLayout::default()
            });
        }

        let mut depth = 0usize;
        let mut next_line = 0usize;
        for token in tokens {
            // Lines starting at or before this token see the depth so far
            while next_line < count && index.line_start(next_line) <= token.start {
                lines[next_line].depth = depth;
                next_line += 1;
            }

            // Lines starting strictly inside a multi-line token
            while next_line < count && index.line_start(next_line) < token.end {
                let layout = &mut lines[next_line];
                layout.depth = depth;
                layout.in_string = matches!(token.value, Token::String(_));
                // A line inside a string holds text, not code
                if layout.in_string {
                    layout.blank = false;
                    layout.comment_only = false;
                }
                next_line += 1;
            }

            match token.value {
                Token::Continuation => {
                    let line = index.line_of(token.end);
                    if index.line_start(line) == token.end && line < count {
                        lines[line].continued = true;
                    }
                }
                ref value if value.is_open_bracket() => depth += 1,
                ref value if value.is_close_bracket() => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        for layout in lines.iter_mut().skip(next_line) {
            layout.depth = depth;
        }

        Self { lines }
    }

    /// Layout of `line`
    pub fn line(&self, line: usize) -> &LineLayout {
        &self.lines[line]
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True for an empty table
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
