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

//! Builder pattern for constructing diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity, Suggestion};
use super::location::{Position, SourceLocation, Span};

/// Builder for constructing diagnostics fluently
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    location: Option<SourceLocation>,
    suggestions: Vec<Suggestion>,
}

impl DiagnosticBuilder {
    fn with_severity(severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            severity,
            code,
            message: String::new(),
            location: None,
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic builder
    pub fn error(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Error, code)
    }

    /// Create a new warning diagnostic builder
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Warning, code)
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the location from a span
    pub fn with_span(mut self, span: Span) -> Self {
        self.location = Some(SourceLocation::new(span));
        self
    }

    /// Set the location from line/column coordinates
    pub fn with_location(
        self,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        self.with_span(Span::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        ))
    }

    /// Add source text to the location
    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        if let Some(loc) = &mut self.location {
            loc.source_text = Some(text.into());
        }
        self
    }

    /// Add file path to the location
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        if let Some(loc) = &mut self.location {
            loc.file_path = Some(path.into());
        }
        self
    }

    /// Add a suggestion
    pub fn suggest(mut self, message: impl Into<String>, replacement: Option<String>) -> Self {
        self.suggestions.push(Suggestion {
            message: message.into(),
            replacement,
        });
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            help: Diagnostic::generate_help(self.code),
            severity: self.severity,
            code: self.code,
            message: self.message,
            location: self.location.unwrap_or_default(),
            suggestions: self.suggestions,
        }
    }
}
