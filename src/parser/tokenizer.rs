//! Python-aware tokenizer
//!
//! Recognises just enough of Python's lexical grammar to locate lamdef
//! headers safely:
//! - Zero-copy string slices for names, numbers, strings and comments
//! - Every string prefix and triple-quoted strings spanning lines
//! - Physical newlines and backslash continuations as explicit tokens
//!
//! Whitespace is skipped. Indentation is recovered from the source text by
//! the layout pass instead of INDENT/DEDENT tokens.

use super::error::{ParseError, ParseResult};
use super::lexer::{is_identifier_continue, is_identifier_start};
use super::span::{Spanned, bom_len};

/// Token produced by [`Tokenizer`]
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'input> {
    /// Identifier or keyword (e.g., `lamdef`, `sorted`, `user`)
    Name(&'input str),
    /// Numeric literal, kept as written
    Number(&'input str),
    /// String literal including prefix and quotes
    String(&'input str),
    /// Comment starting at `#`, excluding the line terminator
    Comment(&'input str),
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left square bracket [
    LeftBracket,
    /// Right square bracket ]
    RightBracket,
    /// Left curly brace {
    LeftBrace,
    /// Right curly brace }
    RightBrace,
    /// Colon (:)
    Colon,
    /// Comma (,)
    Comma,
    /// Semicolon (;)
    Semicolon,
    /// Plain assignment (=)
    Equal,
    /// Attribute access (.)
    Dot,
    /// Decorator or matrix multiplication (@)
    At,
    /// Any other operator (e.g., `==`, `:=`, `**`, `->`)
    Operator(&'input str),
    /// Physical line terminator
    Newline,
    /// Backslash followed by a line terminator
    Continuation,
}

impl<'input> Token<'input> {
    /// Get identifier string
    #[inline]
    pub fn as_name(&self) -> Option<&'input str> {
        match self {
            Token::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Check for a specific identifier
    #[inline]
    pub fn is_name(&self, expected: &str) -> bool {
        matches!(self, Token::Name(name) if *name == expected)
    }

    /// Check if this token opens a bracket
    #[inline]
    pub fn is_open_bracket(&self) -> bool {
        matches!(
            self,
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace
        )
    }

    /// Check if this token closes a bracket
    #[inline]
    pub fn is_close_bracket(&self) -> bool {
        matches!(
            self,
            Token::RightParen | Token::RightBracket | Token::RightBrace
        )
    }

    /// Tokens that carry no code: comments, newlines, continuations
    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Comment(_) | Token::Newline | Token::Continuation
        )
    }
}

const THREE_CHAR_OPERATORS: [&str; 4] = ["**=", "//=", ">>=", "<<="];

const TWO_CHAR_OPERATORS: [&str; 19] = [
    "==", "!=", "<=", ">=", "->", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=",
    "**", "//", "<<", ">>",
];

/// Byte-oriented tokenizer over Python source
#[derive(Clone)]
pub struct Tokenizer<'input> {
    source: &'input str,
    bytes: &'input [u8],
    pos: usize,
    end: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a new tokenizer
    #[inline]
    pub fn new(input: &'input str) -> Self {
        Self {
            source: input,
            bytes: input.as_bytes(),
            pos: bom_len(input),
            end: input.len(),
        }
    }

    #[inline(always)]
    fn slice(&self, start: usize, end: usize) -> &'input str {
        &self.source[start..end]
    }

    #[inline(always)]
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline(always)]
    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline(always)]
    fn skip_whitespace(&mut self) {
        while self.pos < self.end {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\x0c' => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Length of the line terminator at `pos`, if any
    #[inline(always)]
    fn newline_len(&self, pos: usize) -> Option<usize> {
        match self.bytes.get(pos) {
            Some(b'\n') => Some(1),
            Some(b'\r') if self.bytes.get(pos + 1) == Some(&b'\n') => Some(2),
            Some(b'\r') => Some(1),
            _ => None,
        }
    }

    #[inline]
    fn parse_comment(&mut self) -> &'input str {
        let start = self.pos;
        while self.pos < self.end && !matches!(self.bytes[self.pos], b'\n' | b'\r') {
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }

    #[inline]
    fn parse_identifier(&mut self) {
        while self.pos < self.end {
            let byte = self.bytes[self.pos];
            if byte.is_ascii() {
                if byte.is_ascii_alphanumeric() || byte == b'_' {
                    self.pos += 1;
                } else {
                    break;
                }
            } else {
                match self.current_char() {
                    Some(ch) if is_identifier_continue(ch) => self.pos += ch.len_utf8(),
                    _ => break,
                }
            }
        }
    }

    /// Prefixes accepted in front of a string literal, case-insensitively
    fn is_string_prefix(prefix: &str) -> bool {
        matches!(
            prefix.to_ascii_lowercase().as_str(),
            "r" | "u" | "b" | "f" | "t" | "br" | "rb" | "fr" | "rf" | "tr" | "rt"
        )
    }

    /// Parse a string literal whose opening quote is at `self.pos`
    fn parse_string_body(&mut self, start: usize) -> ParseResult<()> {
        let quote = self.bytes[self.pos];
        let triple = self.peek_byte(1) == Some(quote) && self.peek_byte(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        while self.pos < self.end {
            let byte = self.bytes[self.pos];
            if byte == b'\\' {
                // Escapes apply to raw strings too as far as termination goes
                self.pos += 1;
                if let Some(len) = self.newline_len(self.pos) {
                    self.pos += len;
                } else if self.pos < self.end {
                    self.pos += self.current_char().map_or(1, char::len_utf8);
                }
                continue;
            }
            if byte == quote {
                if !triple {
                    self.pos += 1;
                    return Ok(());
                }
                if self.peek_byte(1) == Some(quote) && self.peek_byte(2) == Some(quote) {
                    self.pos += 3;
                    return Ok(());
                }
            }
            if !triple && matches!(byte, b'\n' | b'\r') {
                break;
            }
            self.pos += 1;
        }

        Err(ParseError::UnclosedString { position: start })
    }

    #[inline]
    fn parse_number(&mut self) {
        let start = self.pos;
        let hex = self.bytes[start] == b'0'
            && matches!(self.peek_byte(1), Some(b'x' | b'X'));
        while self.pos < self.end {
            let byte = self.bytes[self.pos];
            let exponent_sign = matches!(byte, b'+' | b'-')
                && !hex
                && self.pos > start
                && matches!(self.bytes[self.pos - 1], b'e' | b'E');
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn parse_operator(&mut self) -> Option<&'input str> {
        let rest = &self.source[self.pos..];
        let matched = THREE_CHAR_OPERATORS
            .iter()
            .chain(TWO_CHAR_OPERATORS.iter())
            .find(|op| rest.starts_with(**op))
            .map(|op| op.len())
            .or_else(|| {
                matches!(
                    self.bytes[self.pos],
                    b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'<' | b'>'
                        | b'!'
                )
                .then_some(1)
            })?;
        let start = self.pos;
        self.pos += matched;
        Some(self.slice(start, self.pos))
    }

    #[inline]
    fn single(&mut self, token: Token<'input>, len: usize) -> Token<'input> {
        self.pos += len;
        token
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        self.skip_whitespace();

        if self.pos >= self.end {
            return Ok(None);
        }

        let start = self.pos;
        let byte = self.bytes[self.pos];
        let token = match byte {
            b'\n' | b'\r' => {
                let len = self.newline_len(self.pos).unwrap_or(1);
                self.single(Token::Newline, len)
            }
            b'(' => self.single(Token::LeftParen, 1),
            b')' => self.single(Token::RightParen, 1),
            b'[' => self.single(Token::LeftBracket, 1),
            b']' => self.single(Token::RightBracket, 1),
            b'{' => self.single(Token::LeftBrace, 1),
            b'}' => self.single(Token::RightBrace, 1),
            b',' => self.single(Token::Comma, 1),
            b';' => self.single(Token::Semicolon, 1),
            b':' if self.peek_byte(1) == Some(b'=') => self.single(Token::Operator(":="), 2),
            b':' => self.single(Token::Colon, 1),
            b'=' if self.peek_byte(1) == Some(b'=') => self.single(Token::Operator("=="), 2),
            b'=' => self.single(Token::Equal, 1),
            b'@' if self.peek_byte(1) == Some(b'=') => self.single(Token::Operator("@="), 2),
            b'@' => self.single(Token::At, 1),
            b'#' => Token::Comment(self.parse_comment()),
            b'\'' | b'"' => {
                self.parse_string_body(start)?;
                Token::String(self.slice(start, self.pos))
            }
            b'\\' => match self.newline_len(self.pos + 1) {
                Some(len) => self.single(Token::Continuation, 1 + len),
                None => {
                    return Err(ParseError::UnexpectedCharacter {
                        character: '\\',
                        position: start,
                    });
                }
            },
            b'.' if self.source[self.pos..].starts_with("...") => {
                self.single(Token::Operator("..."), 3)
            }
            b'.' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.parse_number();
                Token::Number(self.slice(start, self.pos))
            }
            b'.' => self.single(Token::Dot, 1),
            b'0'..=b'9' => {
                self.parse_number();
                Token::Number(self.slice(start, self.pos))
            }
            _ => {
                let ch = self.current_char().unwrap_or('\u{fffd}');
                if is_identifier_start(ch) {
                    self.parse_identifier();
                    let name = self.slice(start, self.pos);
                    if matches!(self.peek_byte(0), Some(b'\'' | b'"'))
                        && Self::is_string_prefix(name)
                    {
                        self.parse_string_body(start)?;
                        Token::String(self.slice(start, self.pos))
                    } else {
                        Token::Name(name)
                    }
                } else if let Some(op) = self.parse_operator() {
                    Token::Operator(op)
                } else {
                    return Err(ParseError::UnexpectedCharacter {
                        character: ch,
                        position: start,
                    });
                }
            }
        };

        Ok(Some(Spanned::new(token, start, self.pos)))
    }

    /// Tokenize the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::with_capacity(self.end / 4);
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        log::trace!("tokenized {} bytes into {} tokens", self.end, tokens.len());
        Ok(tokens)
    }
}
