//! Block structure errors

use std::fmt;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Position, Span};
use crate::parser::span::LineIndex;

/// A stretch of one physical line (0-indexed line and byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    /// Line
    pub line: usize,
    /// Start column in bytes
    pub column: usize,
    /// Width in bytes
    pub width: usize,
}

impl LineSpan {
    /// Create a new line span
    pub const fn new(line: usize, column: usize, width: usize) -> Self {
        Self {
            line,
            column,
            width,
        }
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

/// Errors in the structure of a lamdef block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// No indented body after the header
    #[error("lamdef at {at} has an empty body")]
    EmptyBody {
        /// The keyword
        at: LineSpan,
    },

    /// The bracket around the header never closes
    #[error("expression around lamdef at {at} is never closed")]
    UnterminatedExpression {
        /// The keyword
        at: LineSpan,
    },

    /// A body line closes the bracket that encloses the header
    #[error("body of lamdef closes the enclosing bracket at {at}")]
    ClosedInsideBody {
        /// The body line holding the bracket
        at: LineSpan,
    },

    /// A body line dedents below the body's indentation
    #[error("inconsistent indentation in lamdef body at {at}")]
    InconsistentIndentation {
        /// The offending line
        at: LineSpan,
    },

    /// The enclosing statement cannot have a function inserted before it
    #[error("cannot expand lamdef inside a statement starting with '{keyword}' at {at}")]
    UnsupportedPosition {
        /// First word of the statement
        keyword: String,
        /// The statement's first token
        at: LineSpan,
    },

    /// A header inside another header's parameter list
    #[error("lamdef inside a parameter list at {at}")]
    KeywordInParameters {
        /// The inner keyword
        at: LineSpan,
    },

    /// Cursor expansion on a line without a header
    #[error("no lamdef on line {}", .line + 1)]
    NoLamdefOnLine {
        /// The requested line
        line: usize,
    },
}

impl RewriteError {
    /// Location of the error
    pub fn span(&self) -> LineSpan {
        match self {
            RewriteError::EmptyBody { at }
            | RewriteError::UnterminatedExpression { at }
            | RewriteError::ClosedInsideBody { at }
            | RewriteError::InconsistentIndentation { at }
            | RewriteError::UnsupportedPosition { at, .. }
            | RewriteError::KeywordInParameters { at } => *at,
            RewriteError::NoLamdefOnLine { line } => LineSpan::new(*line, 0, 0),
        }
    }

    /// Diagnostic code for this error
    pub fn code(&self) -> DiagnosticCode {
        match self {
            RewriteError::EmptyBody { .. } => DiagnosticCode::EmptyBody,
            RewriteError::UnterminatedExpression { .. } => DiagnosticCode::UnterminatedExpression,
            RewriteError::ClosedInsideBody { .. } => DiagnosticCode::ClosedInsideBody,
            RewriteError::InconsistentIndentation { .. } => {
                DiagnosticCode::InconsistentIndentation
            }
            RewriteError::UnsupportedPosition { .. } => DiagnosticCode::UnsupportedPosition,
            RewriteError::KeywordInParameters { .. } => DiagnosticCode::KeywordInParameters,
            RewriteError::NoLamdefOnLine { .. } => DiagnosticCode::NoLamdefOnLine,
        }
    }

    /// Convert to a diagnostic located in `source`
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let at = self.span();
        let index = LineIndex::new(source);
        let span = Span::new(
            Position::new(at.line, at.column),
            Position::new(at.line, at.column + at.width),
        );

        let mut builder = DiagnosticBuilder::error(self.code())
            .with_message(self.to_string())
            .with_span(span);
        if at.line < index.line_count() {
            builder = builder.with_source_text(index.line_text(source, at.line));
        }
        if let RewriteError::UnsupportedPosition { keyword, .. } = self {
            builder = builder.suggest(
                format!("Assign the lamdef to a name before the '{keyword}' clause"),
                None,
            );
        }
        builder.build()
    }
}
