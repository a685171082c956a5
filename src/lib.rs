//! Multiline lambdas for Python
//!
//! Expands `lamdef(params):` blocks into nested functions before the source
//! reaches a Python compiler:
//!
//! ```
//! let source = "evens = list(filter(lamdef(n):\n    return n % 2 == 0\n, numbers))\n";
//! let expanded = lamdef::expand(source, &lamdef::RewriteOptions::default()).unwrap();
//! assert_eq!(
//!     expanded.source,
//!     "def _lamdef_1(n):\n    return n % 2 == 0\nevens = list(filter(_lamdef_1, numbers))\n"
//! );
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod rewrite;

// Re-export main types
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticFormatter, Format, Severity};
pub use error::{LamdefError, Result};
pub use parser::ParseError;
pub use rewrite::{
    BlockInfo, ExpandedBlock, Expander, Expansion, IndentStyle, Listing, RewriteError,
    RewriteOptions,
};

/// Expand every lamdef block in `source`
pub fn expand(source: &str, options: &RewriteOptions) -> Result<Expansion> {
    Expander::new(options.clone())?.expand(source)
}

/// Expand the first lamdef block on 1-based `line`
pub fn expand_line(source: &str, line: usize, options: &RewriteOptions) -> Result<Expansion> {
    Expander::new(options.clone())?.expand_line(source, line)
}

/// List the lamdef blocks in `source` without rewriting
pub fn list_blocks(source: &str, options: &RewriteOptions) -> Result<Listing> {
    Expander::new(options.clone())?.list(source)
}

/// Diagnostics for every problem in `source`
pub fn check(source: &str, options: &RewriteOptions) -> Result<Vec<Diagnostic>> {
    Ok(Expander::new(options.clone())?.check(source))
}
