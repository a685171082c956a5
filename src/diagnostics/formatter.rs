//! Formatting diagnostics for different output formats

use serde::{Deserialize, Serialize};

use super::diagnostic::Diagnostic;
#[cfg(feature = "terminal")]
use super::diagnostic::Severity;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

/// Formatter for diagnostics
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    #[cfg(feature = "terminal")]
    use_color: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            #[cfg(feature = "terminal")]
            use_color: false,
        }
    }

    /// Set whether to show error codes
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Set whether to use color (terminal feature only)
    #[cfg(feature = "terminal")]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
            Format::Json => self.format_json(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Format multiple diagnostics
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        match self.format {
            Format::Text => diagnostics
                .iter()
                .map(|d| self.format_text(d))
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Json => serde_json::to_string_pretty(diagnostics)
                .unwrap_or_else(|_| format!("{diagnostics:?}")),
            Format::Compact => diagnostics
                .iter()
                .map(|d| self.format_compact(d))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn severity_label(&self, diagnostic: &Diagnostic) -> String {
        #[cfg(feature = "terminal")]
        if self.use_color {
            use colored::Colorize;
            let label = diagnostic.severity.to_string();
            return match diagnostic.severity {
                Severity::Error => label.red().bold().to_string(),
                Severity::Warning => label.yellow().bold().to_string(),
                Severity::Info => label.blue().bold().to_string(),
                Severity::Hint => label.green().bold().to_string(),
            };
        }

        diagnostic.severity.to_string()
    }

    fn underline(&self, diagnostic: &Diagnostic, width: usize) -> String {
        let marks = "^".repeat(width.max(1));

        #[cfg(feature = "terminal")]
        if self.use_color {
            use colored::Colorize;
            return match diagnostic.severity {
                Severity::Error => marks.red().to_string(),
                Severity::Warning => marks.yellow().to_string(),
                Severity::Info => marks.blue().to_string(),
                Severity::Hint => marks.green().to_string(),
            };
        }

        let _ = diagnostic;
        marks
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = String::new();

        result.push_str(&format!(
            "{}: {}",
            self.severity_label(diagnostic),
            diagnostic.message
        ));
        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }
        result.push('\n');

        result.push_str(&format!(" --> {}\n", diagnostic.location));

        // The snippet starts at the first spanned line
        if let Some(source) = &diagnostic.location.source_text {
            let span = diagnostic.location.span;
            for (offset, line) in source.lines().enumerate() {
                let line_idx = span.start.line + offset;
                result.push_str(&format!("{:4} | {}\n", line_idx + 1, line));

                if offset == 0 {
                    let start_col = span.start.column.min(line.len());
                    let end_col = if span.end.line == span.start.line {
                        span.end.column.min(line.len())
                    } else {
                        line.len()
                    };
                    result.push_str("     | ");
                    result.push_str(&" ".repeat(start_col));
                    result.push_str(&self.underline(diagnostic, end_col.saturating_sub(start_col)));
                    result.push('\n');
                }
            }
        }

        if let Some(help) = &diagnostic.help {
            result.push_str(&format!(" = help: {help}\n"));
        }

        if !diagnostic.suggestions.is_empty() {
            result.push_str("\nsuggestions:\n");
            for suggestion in &diagnostic.suggestions {
                result.push_str(&format!("  - {}", suggestion.message));
                if let Some(replacement) = &suggestion.replacement {
                    result.push_str(&format!(" (replace with '{replacement}')"));
                }
                result.push('\n');
            }
        }

        result
    }

    fn format_json(&self, diagnostic: &Diagnostic) -> String {
        serde_json::to_string_pretty(diagnostic).unwrap_or_else(|_| format!("{diagnostic:?}"))
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };

        format!(
            "{}: {}: {}{}",
            diagnostic.location, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::builder::DiagnosticBuilder;
    use crate::diagnostics::diagnostic::DiagnosticCode;

    #[test]
    fn test_text_format() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::EmptyBody)
            .with_message("lamdef has an empty body")
            .with_location(4, 14, 4, 20)
            .with_source_text("squares = map(lamdef(v):")
            .suggest("Indent the body", None)
            .build();

        let formatter = DiagnosticFormatter::new(Format::Text).with_code(false);
        let output = formatter.format(&diagnostic);

        assert!(output.contains("error: lamdef has an empty body"));
        assert!(output.contains("   5 | squares = map(lamdef(v):"));
        assert!(output.contains("^^^^^^"));
        assert!(output.contains("Indent the body"));
        assert!(!output.contains("[L101]"));
    }

    #[test]
    fn test_compact_format() {
        let diagnostic = DiagnosticBuilder::warning(DiagnosticCode::InlineBody)
            .with_message("inline lamdef body left unchanged")
            .with_location(5, 10, 5, 16)
            .build();

        let output = DiagnosticFormatter::new(Format::Compact).format(&diagnostic);

        assert!(output.contains("6:11-17"));
        assert!(output.contains("warning"));
        assert!(output.contains("[W001]"));
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diagnostics = vec![
            DiagnosticBuilder::error(DiagnosticCode::EmptyBody).build(),
            DiagnosticBuilder::warning(DiagnosticCode::InlineBody).build(),
        ];

        let compact = DiagnosticFormatter::new(Format::Compact).format_all(&diagnostics);
        assert_eq!(compact.lines().count(), 2);

        let json = DiagnosticFormatter::new(Format::Json).format_all(&diagnostics);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(parsed[1]["severity"], "warning");
    }
}
