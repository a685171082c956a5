//! Scanner error types

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Span};
use crate::parser::span::LineIndex;
use thiserror::Error;

/// Result type for scanner operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Scan error with location information
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unclosed string literal
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Byte offset where the string starts
        position: usize,
    },

    /// Character that cannot start any token
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Byte offset of the character
        position: usize,
    },

    /// Parameter list that is not valid Python parameter syntax
    #[error("Invalid parameter list at position {position}: {message}")]
    InvalidParameters {
        /// What is wrong with the list
        message: String,
        /// Byte offset of the offending parameter
        position: usize,
    },
}

impl ParseError {
    /// Byte offset the error refers to
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnclosedString { position }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::InvalidParameters { position, .. } => *position,
        }
    }

    /// Convert to a diagnostic located in `source`
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let index = LineIndex::new(source);
        let position = self.position().min(source.len());
        let (line, column) = index.position(position);

        let (code, message, width) = match self {
            ParseError::UnclosedString { .. } => (
                DiagnosticCode::UnclosedString,
                "Unclosed string literal".to_string(),
                1,
            ),
            ParseError::UnexpectedCharacter { character, .. } => (
                DiagnosticCode::UnexpectedCharacter,
                format!("Unexpected character '{character}'"),
                character.len_utf8(),
            ),
            ParseError::InvalidParameters { message, .. } => (
                DiagnosticCode::InvalidParameters,
                format!("Invalid lamdef parameter list: {message}"),
                1,
            ),
        };

        let mut span = Span::from_offsets(&index, position, position);
        span.end.column = column + width;

        DiagnosticBuilder::error(code)
            .with_message(message)
            .with_span(span)
            .with_source_text(index.line_text(source, line))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclosed_string_diagnostic() {
        let source = "x = 1\ny = 'abc\n";
        let error = ParseError::UnclosedString { position: 10 };
        let diagnostic = error.to_diagnostic(source);

        assert_eq!(diagnostic.code, DiagnosticCode::UnclosedString);
        assert_eq!(diagnostic.location.span.start.line, 1);
        assert_eq!(diagnostic.location.span.start.column, 4);
        assert_eq!(diagnostic.location.source_text.as_deref(), Some("y = 'abc"));
    }

    #[test]
    fn test_error_display() {
        let error = ParseError::UnexpectedCharacter {
            character: '$',
            position: 3,
        };
        assert_eq!(
            error.to_string(),
            "Unexpected character '$' at position 3"
        );
    }
}
