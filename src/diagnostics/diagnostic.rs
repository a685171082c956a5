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

//! Core diagnostic types

use super::location::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity levels
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hint - subtle suggestion for improvement
    Hint,
    /// Information - provides helpful information
    #[default]
    Info,
    /// Warning - the block was left untouched
    Warning,
    /// Error - prevents expansion
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Scanning errors
    /// Unclosed string literal
    UnclosedString,
    /// Character the scanner cannot classify
    UnexpectedCharacter,
    /// Parameter list of a lamdef header does not parse
    InvalidParameters,

    // Block structure errors
    /// Header without an indented body
    EmptyBody,
    /// Bracketed expression never closed after the body
    UnterminatedExpression,
    /// Enclosing bracket closed on a body line
    ClosedInsideBody,
    /// Body line dedented below the body's own indentation
    InconsistentIndentation,
    /// Statement kind where a function cannot be inserted before it
    UnsupportedPosition,
    /// Lamdef keyword inside another header's parameter list
    KeywordInParameters,
    /// Requested line holds no lamdef header
    NoLamdefOnLine,

    // Warnings
    /// Header followed by code on the same line, left as is
    InlineBody,
}

/// A suggestion for fixing a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable message describing the suggestion
    pub message: String,
    /// Optional replacement text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: SourceLocation,
    /// Simple contextual help message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Suggestions for fixing the issue
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        code: DiagnosticCode,
        severity: Severity,
        message: String,
        location: SourceLocation,
    ) -> Self {
        let help = Self::generate_help(code);
        Self {
            severity,
            code,
            message,
            location,
            help,
            suggestions: Vec::new(),
        }
    }

    /// Generate simple contextual help based on diagnostic code
    pub(crate) fn generate_help(code: DiagnosticCode) -> Option<String> {
        match code {
            DiagnosticCode::EmptyBody => {
                Some("Indent the lamdef body deeper than the line holding the keyword".to_string())
            }
            DiagnosticCode::UnterminatedExpression => Some(
                "Close the surrounding call on a line indented no deeper than the lamdef line"
                    .to_string(),
            ),
            DiagnosticCode::ClosedInsideBody => Some(
                "Move the closing bracket onto its own line after the lamdef body".to_string(),
            ),
            DiagnosticCode::UnsupportedPosition => Some(
                "Assign the lamdef to a name on a separate statement before this clause"
                    .to_string(),
            ),
            DiagnosticCode::InlineBody => Some(
                "Put the lamdef body on the following lines or use a plain lambda".to_string(),
            ),
            _ => None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Stable short code
    pub fn code_string(&self) -> &'static str {
        match self.code {
            DiagnosticCode::UnclosedString => "L001",
            DiagnosticCode::UnexpectedCharacter => "L002",
            DiagnosticCode::InvalidParameters => "L003",
            DiagnosticCode::EmptyBody => "L101",
            DiagnosticCode::UnterminatedExpression => "L102",
            DiagnosticCode::ClosedInsideBody => "L103",
            DiagnosticCode::InconsistentIndentation => "L104",
            DiagnosticCode::UnsupportedPosition => "L105",
            DiagnosticCode::KeywordInParameters => "L106",
            DiagnosticCode::NoLamdefOnLine => "L107",
            DiagnosticCode::InlineBody => "W001",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::UnclosedString => write!(f, "unclosed string literal"),
            DiagnosticCode::UnexpectedCharacter => write!(f, "unexpected character"),
            DiagnosticCode::InvalidParameters => write!(f, "invalid parameter list"),
            DiagnosticCode::EmptyBody => write!(f, "empty lamdef body"),
            DiagnosticCode::UnterminatedExpression => write!(f, "unterminated expression"),
            DiagnosticCode::ClosedInsideBody => write!(f, "bracket closed inside body"),
            DiagnosticCode::InconsistentIndentation => write!(f, "inconsistent indentation"),
            DiagnosticCode::UnsupportedPosition => write!(f, "unsupported position"),
            DiagnosticCode::KeywordInParameters => write!(f, "lamdef inside parameter list"),
            DiagnosticCode::NoLamdefOnLine => write!(f, "no lamdef on line"),
            DiagnosticCode::InlineBody => write!(f, "inline lamdef body"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::location::{Position, Span};

    #[test]
    fn test_diagnostic_creation() {
        let location = SourceLocation {
            span: Span::new(Position::new(3, 4), Position::new(3, 10)),
            source_text: Some("    lamdef(x):".to_string()),
            file_path: None,
        };

        let diagnostic = Diagnostic::new(
            DiagnosticCode::EmptyBody,
            Severity::Error,
            "lamdef has an empty body".to_string(),
            location,
        );

        assert!(diagnostic.is_error());
        assert!(!diagnostic.is_warning());
        assert_eq!(diagnostic.code_string(), "L101");
        assert!(diagnostic.help.is_some());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Hint);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
