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

//! Source location tracking for diagnostics

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::span::LineIndex;

/// A position in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in UTF-8 bytes)
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Convert to 1-indexed position for display
    pub fn to_display(&self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.to_display();
        write!(f, "{line}:{col}")
    }
}

/// A span in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering a whole line up to `width` bytes
    pub const fn line(line: usize, width: usize) -> Self {
        Self::new(Position::new(line, 0), Position::new(line, width))
    }

    /// Create a span from byte offsets using a prebuilt line index
    pub fn from_offsets(index: &LineIndex, start_offset: usize, end_offset: usize) -> Self {
        let (start_line, start_col) = index.position(start_offset);
        let (end_line, end_col) = index.position(end_offset);
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line + 1,
                self.start.column + 1,
                self.end.column + 1
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Source location information
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// The span in the source text
    pub span: Span,
    /// Text of the spanned lines, starting at `span.start.line`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// File path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(span: Span) -> Self {
        Self {
            span,
            source_text: None,
            file_path: None,
        }
    }

    /// Create with source text
    pub fn with_source(span: Span, source_text: String) -> Self {
        Self {
            span,
            source_text: Some(source_text),
            file_path: None,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.file_path {
            write!(f, "{}:{}", path, self.span)
        } else {
            write!(f, "{}", self.span)
        }
    }
}
