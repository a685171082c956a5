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

//! Rewriting lamdef blocks into nested functions
//!
//! Every block becomes a `def` inserted in front of the statement that held
//! it, and the header through the body is replaced by the function's name:
//!
//! ```python
//! evens = list(filter(lamdef(n):
//!     return n % 2 == 0
//! , numbers))
//! ```
//!
//! becomes
//!
//! ```python
//! def _lamdef_1(n):
//!     return n % 2 == 0
//! evens = list(filter(_lamdef_1, numbers))
//! ```
//!
//! Blocks are rewritten one at a time, outermost first, and the source is
//! rescanned after each rewrite so blocks nested inside a body are expanded
//! from their new position.

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::error::{LamdefError, Result};
use crate::parser::span::{detect_line_ending, leading_whitespace};
use crate::parser::{Parameter, ScannedSource};

use super::block::{LamdefBlock, resolve_block};
use super::error::{LineSpan, RewriteError};
use super::header::{HeaderScan, scan_headers};
use super::naming::NameAllocator;
use super::options::{IndentStyle, RewriteOptions};

/// One rewritten block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedBlock {
    /// Name of the generated function
    pub name: String,
    /// Parameter list as written
    pub params: String,
    /// 1-based line of the keyword in the input
    pub line: usize,
    /// Number of body lines moved into the function
    pub body_lines: usize,
    /// Whether the block was a `name = lamdef(...):` assignment
    pub direct: bool,
}

/// Result of an expansion
#[derive(Debug, Clone, Serialize)]
pub struct Expansion {
    /// The rewritten source
    pub source: String,
    /// Rewrites in the order they were applied
    pub blocks: Vec<ExpandedBlock>,
    /// Warnings about headers that were left alone
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    fn unchanged(source: &str) -> Self {
        Self {
            source: source.to_string(),
            blocks: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Whether anything was rewritten
    pub fn changed(&self) -> bool {
        !self.blocks.is_empty()
    }
}

/// A block found by [`Expander::list`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockInfo {
    /// 1-based line of the keyword
    pub line: usize,
    /// 1-based column of the keyword
    pub column: usize,
    /// Parameter list as written
    pub params: String,
    /// Parsed parameters
    pub parameters: Vec<Parameter>,
    /// Number of body lines
    pub body_lines: usize,
    /// Bracket depth at the keyword
    pub depth: usize,
    /// Target name when expanded as a plain `def`
    pub direct_assignment: Option<String>,
}

impl BlockInfo {
    fn new(scanned: &ScannedSource<'_>, block: &LamdefBlock) -> Self {
        let at = block.header.keyword_span(scanned);
        Self {
            line: at.line + 1,
            column: at.column + 1,
            params: block.header.params_text(scanned).to_string(),
            parameters: block.header.parameters.clone(),
            body_lines: block.body_len(),
            depth: block.depth,
            direct_assignment: block.direct_assignment.clone(),
        }
    }
}

/// Blocks and problems found in a source
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    /// Well-formed blocks in document order
    pub blocks: Vec<BlockInfo>,
    /// Errors for malformed blocks and warnings for skipped headers
    pub diagnostics: Vec<Diagnostic>,
}

/// Expands lamdef blocks with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Expander {
    options: RewriteOptions,
}

impl Expander {
    /// Create an expander, rejecting options that would produce invalid Python
    pub fn new(options: RewriteOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options in use
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    fn mentions_keyword(&self, source: &str) -> bool {
        source.contains(self.options.keyword.as_str())
    }

    /// Expand every block in `source`, nested blocks included.
    ///
    /// All blocks are checked before anything is rewritten, so a malformed
    /// block anywhere fails the whole expansion.
    pub fn expand(&self, source: &str) -> Result<Expansion> {
        if !self.mentions_keyword(source) {
            log::debug!("no '{}' in source, nothing to expand", self.options.keyword);
            return Ok(Expansion::unchanged(source));
        }

        let scanned = ScannedSource::new(source)?;
        let scan = scan_headers(&scanned, &self.options.keyword);
        let lines: Vec<Option<usize>> = (0..scan.entries.len())
            .map(|entry| scan.entry_line(&scanned, entry))
            .collect();
        let HeaderScan { entries, warnings } = scan;

        for entry in entries {
            let block = resolve_block(&scanned, &entry?, &self.options)?;
            render_body(&scanned, &block, "")?;
        }

        let mut names = NameAllocator::for_source(&self.options.name_prefix, &scanned);
        let mut current = source.to_string();
        let mut blocks = Vec::with_capacity(lines.len());

        for (pass, original_line) in lines.iter().enumerate() {
            let (output, mut report) = {
                let scanned = ScannedSource::new(&current)?;
                let Some(entry) = scan_headers(&scanned, &self.options.keyword)
                    .entries
                    .into_iter()
                    .next()
                else {
                    break;
                };
                let block = resolve_block(&scanned, &entry?, &self.options)?;
                splice(&scanned, &block, &mut names, &self.options)?
            };
            if let Some(line) = original_line {
                report.line = line + 1;
            }
            log::debug!(
                "pass {}: expanded {} at line {} into {}",
                pass + 1,
                self.options.keyword,
                report.line,
                report.name
            );
            blocks.push(report);
            current = output;
        }

        Ok(Expansion {
            source: current,
            blocks,
            diagnostics: warnings,
        })
    }

    /// Expand only the first block whose keyword is on 1-based `line`.
    ///
    /// Blocks nested in its body are left for later calls.
    pub fn expand_line(&self, source: &str, line: usize) -> Result<Expansion> {
        let Some(target) = line.checked_sub(1) else {
            return Err(LamdefError::InvalidOptions(
                "line numbers start at 1".to_string(),
            ));
        };
        if !self.mentions_keyword(source) {
            return Err(RewriteError::NoLamdefOnLine { line: target }.into());
        }

        let scanned = ScannedSource::new(source)?;
        let scan = scan_headers(&scanned, &self.options.keyword);
        let Some(position) =
            (0..scan.entries.len()).find(|&entry| scan.entry_line(&scanned, entry) == Some(target))
        else {
            return Err(RewriteError::NoLamdefOnLine { line: target }.into());
        };
        let HeaderScan {
            mut entries,
            warnings,
        } = scan;

        let header = entries.swap_remove(position)?;
        let block = resolve_block(&scanned, &header, &self.options)?;
        let mut names = NameAllocator::for_source(&self.options.name_prefix, &scanned);
        let (output, report) = splice(&scanned, &block, &mut names, &self.options)?;
        log::debug!(
            "expanded {} at line {} into {}",
            self.options.keyword,
            line,
            report.name
        );

        let diagnostics = warnings
            .into_iter()
            .filter(|d| d.location.span.start.line == target)
            .collect();
        Ok(Expansion {
            source: output,
            blocks: vec![report],
            diagnostics,
        })
    }

    /// Find every block without rewriting, collecting a diagnostic for each
    /// malformed one instead of stopping
    pub fn list(&self, source: &str) -> Result<Listing> {
        if !self.mentions_keyword(source) {
            return Ok(Listing::default());
        }

        let scanned = ScannedSource::new(source)?;
        let HeaderScan { entries, warnings } = scan_headers(&scanned, &self.options.keyword);
        let mut listing = Listing {
            blocks: Vec::with_capacity(entries.len()),
            diagnostics: warnings,
        };

        for entry in entries {
            let resolved = entry.and_then(|header| {
                let block = resolve_block(&scanned, &header, &self.options)?;
                render_body(&scanned, &block, "")?;
                Ok(block)
            });
            match resolved {
                Ok(block) => listing.blocks.push(BlockInfo::new(&scanned, &block)),
                Err(error) => listing.diagnostics.extend(error.to_diagnostic(source)),
            }
        }

        listing
            .diagnostics
            .sort_by_key(|d| (d.location.span.start.line, d.location.span.start.column));
        Ok(listing)
    }

    /// Diagnostics for `source`, tokenizer errors included
    pub fn check(&self, source: &str) -> Vec<Diagnostic> {
        match self.list(source) {
            Ok(listing) => listing.diagnostics,
            Err(error) => error.to_diagnostic(source).into_iter().collect(),
        }
    }
}

/// Rewrite one block, returning the new source and a report
fn splice(
    scanned: &ScannedSource<'_>,
    block: &LamdefBlock,
    names: &mut NameAllocator,
    options: &RewriteOptions,
) -> Result<(String, ExpandedBlock)> {
    let source = scanned.source;
    let index = &scanned.index;
    let tokens = &scanned.tokens;
    let eol = detect_line_ending(source);

    let statement_indent = leading_whitespace(scanned.line_text(block.statement_line));
    let base_indent = leading_whitespace(scanned.line_text(block.base_line));
    // Tab-indented code keeps tabs
    let unit = if statement_indent.starts_with('\t') || base_indent.starts_with('\t') {
        IndentStyle::Tabs.unit()
    } else {
        options.indent.unit()
    };
    let body_indent = format!("{statement_indent}{unit}");
    let body = render_body(scanned, block, &body_indent)?;

    let (name, direct) = match &block.direct_assignment {
        Some(target) => (target.clone(), true),
        None => (names.allocate(), false),
    };

    let mut definition = format!(
        "{statement_indent}def {name}({}):{}",
        block.header.params_text(scanned),
        block.header.trailing_text(scanned)
    );
    for line in &body {
        definition.push_str(eol);
        definition.push_str(line);
    }

    let statement_start = index.line_start(block.statement_line);
    let body_end = index.line_range(source, block.body_end).end;
    let mut output = String::with_capacity(source.len() + definition.len());
    output.push_str(&source[..statement_start]);

    if direct {
        output.push_str(&definition);
        output.push_str(&source[body_end..]);
    } else {
        output.push_str(&definition);
        output.push_str(eol);
        output.push_str(&source[statement_start..tokens[block.header.keyword].start]);
        output.push_str(&name);
        // Inside brackets the terminator line joins the reference
        let resume = match (block.trailing_comment, block.terminator) {
            (Some(comment), _) => {
                output.push_str(eol);
                index.line_start(comment)
            }
            (None, Some(terminator)) if block.depth > 0 => {
                index.line_start(terminator) + scanned.layout.line(terminator).indent_len
            }
            _ => body_end,
        };
        output.push_str(&source[resume..]);
    }

    let report = ExpandedBlock {
        name,
        params: block.header.params_text(scanned).to_string(),
        line: block.keyword_line + 1,
        body_lines: block.body_len(),
        direct,
    };
    Ok((output, report))
}

/// Body lines moved under `indent`, without terminators
fn render_body(
    scanned: &ScannedSource<'_>,
    block: &LamdefBlock,
    indent: &str,
) -> Result<Vec<String>> {
    let base = leading_whitespace(scanned.line_text(block.base_line));
    let mut lines = Vec::with_capacity(block.body_len());

    for line in block.body_start..=block.body_end {
        let layout = scanned.layout.line(line);
        let text = scanned.line_text(line);

        let rendered = if layout.in_string {
            text.to_string()
        } else if layout.blank {
            String::new()
        } else if let Some(rest) = text.strip_prefix(base) {
            format!("{indent}{rest}")
        } else if layout.is_free_form(block.depth) {
            text.to_string()
        } else if layout.comment_only {
            format!("{indent}{}", text.trim_start())
        } else {
            return Err(RewriteError::InconsistentIndentation {
                at: LineSpan::new(line, 0, layout.indent_len),
            }
            .into());
        };
        lines.push(rendered);
    }

    Ok(lines)
}
