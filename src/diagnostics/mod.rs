//! Diagnostic system for lamdef scanning and expansion errors
//!
//! Produces both human-friendly error messages and machine-readable
//! diagnostics suitable for editor integration.

pub mod builder;
pub mod diagnostic;
pub mod formatter;
pub mod location;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Suggestion};
pub use formatter::{DiagnosticFormatter, Format};
pub use location::{Position, SourceLocation, Span};
