//! Python source scanning
//!
//! Tokenizes Python source just deeply enough to find lamdef headers and
//! reason about the indentation of the lines around them.

pub mod error;
pub mod layout;
pub mod lexer;
pub mod params;
pub mod span;
pub mod tokenizer;

pub use error::{ParseError, ParseResult};
pub use layout::{LineLayout, SourceLayout};
pub use params::{Parameter, ParameterKind, parse_parameters};
pub use span::{LineIndex, Spanned};
pub use tokenizer::{Token, Tokenizer};

/// A tokenized source text with its line tables
#[derive(Debug, Clone)]
pub struct ScannedSource<'input> {
    /// The source text
    pub source: &'input str,
    /// Offset to line mapping
    pub index: LineIndex,
    /// All tokens, trivia included
    pub tokens: Vec<Spanned<Token<'input>>>,
    /// Per-line layout
    pub layout: SourceLayout,
}

impl<'input> ScannedSource<'input> {
    /// Tokenize `source` and build its line tables
    pub fn new(source: &'input str) -> ParseResult<Self> {
        let tokens = Tokenizer::new(source).tokenize_all()?;
        let index = LineIndex::new(source);
        let layout = SourceLayout::new(source, &index, &tokens);
        Ok(Self {
            source,
            index,
            tokens,
            layout,
        })
    }

    /// Content of a physical line
    pub fn line_text(&self, line: usize) -> &'input str {
        self.index.line_text(self.source, line)
    }

    /// Line holding the token at `token`
    pub fn token_line(&self, token: usize) -> usize {
        self.index.line_of(self.tokens[token].start)
    }
}
