//! Crate-level error type

use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::parser::ParseError;
use crate::rewrite::RewriteError;

/// Result type for lamdef operations
pub type Result<T> = std::result::Result<T, LamdefError>;

/// Any failure while expanding lamdef blocks
#[derive(Error, Debug)]
pub enum LamdefError {
    /// The source could not be tokenized, or a parameter list is malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A lamdef block is malformed
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    /// Options that would produce invalid Python
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl LamdefError {
    /// Convert to a diagnostic located in `source`, when the error has a location
    pub fn to_diagnostic(&self, source: &str) -> Option<Diagnostic> {
        match self {
            LamdefError::Parse(error) => Some(error.to_diagnostic(source)),
            LamdefError::Rewrite(error) => Some(error.to_diagnostic(source)),
            LamdefError::InvalidOptions(_) => None,
        }
    }

    /// Diagnostic code, when the error has a location
    pub fn code(&self) -> Option<DiagnosticCode> {
        match self {
            LamdefError::Parse(ParseError::UnclosedString { .. }) => {
                Some(DiagnosticCode::UnclosedString)
            }
            LamdefError::Parse(ParseError::UnexpectedCharacter { .. }) => {
                Some(DiagnosticCode::UnexpectedCharacter)
            }
            LamdefError::Parse(ParseError::InvalidParameters { .. }) => {
                Some(DiagnosticCode::InvalidParameters)
            }
            LamdefError::Rewrite(error) => Some(error.code()),
            LamdefError::InvalidOptions(_) => None,
        }
    }
}
