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

//! Source location tracking for the scanner

use std::fmt;
use std::ops::Range;

/// A value with source location information
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The value
    pub value: T,
    /// Start byte offset in the input
    pub start: usize,
    /// End byte offset in the input (exclusive)
    pub end: usize,
}

impl<T> Spanned<T> {
    /// Create a new spanned value
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }

    /// Get the span length
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Maps byte offsets to physical lines.
///
/// Lines are 0-indexed. A line's content range never includes its line
/// terminator (`\n` or `\r\n`).
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build the index for `source`
    pub fn new(source: &str) -> Self {
        let mut starts = Vec::with_capacity(source.len() / 32 + 1);
        starts.push(bom_len(source));
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(offset + 1);
            }
        }
        // A trailing newline does not open a new line
        if starts.len() > 1 && starts.last() == Some(&source.len()) {
            starts.pop();
        }
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Number of physical lines
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// 0-indexed (line, column) of `offset`, column in bytes
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        (line, offset.saturating_sub(self.starts[line]))
    }

    /// Byte offset where `line` starts
    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len)
    }

    /// Byte offset just past `line`, including its terminator
    pub fn line_end_with_terminator(&self, line: usize) -> usize {
        self.starts.get(line + 1).copied().unwrap_or(self.len)
    }

    /// Content range of `line`, excluding its terminator
    pub fn line_range(&self, source: &str, line: usize) -> Range<usize> {
        let start = self.line_start(line);
        let mut end = self.line_end_with_terminator(line);
        let bytes = source.as_bytes();
        if end > start && bytes[end - 1] == b'\n' {
            end -= 1;
            if end > start && bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }
        start..end
    }

    /// Content of `line`, excluding its terminator
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> &'a str {
        &source[self.line_range(source, line)]
    }
}

/// Length of a leading byte-order mark; the first line starts after it
pub fn bom_len(source: &str) -> usize {
    if source.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    }
}

/// Leading whitespace of a line
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t', '\x0c']);
    &line[..line.len() - trimmed.len()]
}

/// Indentation width the way Python's tokenizer measures it (tabs to the next multiple of 8)
pub fn indent_width(whitespace: &str) -> usize {
    whitespace.chars().fold(0, |width, ch| match ch {
        '\t' => (width / 8 + 1) * 8,
        '\x0c' => 0,
        _ => width + 1,
    })
}

/// Line terminator used by `source`
pub fn detect_line_ending(source: &str) -> &'static str {
    match source.find('\n') {
        Some(idx) if idx > 0 && source.as_bytes()[idx - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}
