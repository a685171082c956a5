//! Lexical analysis utilities

use super::span::Spanned;
use super::tokenizer::Token;

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c) || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

/// Check if a whole string is a valid identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

/// Token stream with lookahead capability
#[derive(Debug)]
pub struct TokenStream<'a, 'input> {
    tokens: &'a [Spanned<Token<'input>>],
    position: usize,
}

impl<'a, 'input> TokenStream<'a, 'input> {
    /// Create a token stream positioned at `position`
    pub fn new(tokens: &'a [Spanned<Token<'input>>], position: usize) -> Self {
        Self {
            tokens,
            position: position.min(tokens.len()),
        }
    }

    /// Peek at the current token without consuming
    pub fn peek(&self) -> Option<&'a Spanned<Token<'input>>> {
        self.tokens.get(self.position)
    }

    /// Consume and return the current token
    pub fn next(&mut self) -> Option<&'a Spanned<Token<'input>>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Get the current position in the stream
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume a token if it matches the predicate
    pub fn consume_if<F>(&mut self, predicate: F) -> Option<&'a Spanned<Token<'input>>>
    where
        F: FnOnce(&Token<'input>) -> bool,
    {
        let token = self.peek()?;
        if predicate(&token.value) {
            self.position += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Advance past the bracket closing the one just consumed.
    ///
    /// Returns the index of the closing token, or `None` if the input ends
    /// first.
    pub fn skip_balanced(&mut self) -> Option<usize> {
        let mut depth = 1usize;
        while let Some(token) = self.next() {
            if token.value.is_open_bracket() {
                depth += 1;
            } else if token.value.is_close_bracket() {
                depth -= 1;
                if depth == 0 {
                    return Some(self.position - 1);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::Tokenizer;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('Z'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('λ'));
        assert!(!is_identifier_start('0'));
        assert!(!is_identifier_start('-'));

        assert!(is_identifier_continue('a'));
        assert!(is_identifier_continue('0'));
        assert!(is_identifier_continue('_'));
        assert!(!is_identifier_continue('-'));

        assert!(is_identifier("add_one"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_skip_balanced() {
        let tokens = Tokenizer::new("f(a, (b, [c]))\n").tokenize_all().unwrap();
        let mut stream = TokenStream::new(&tokens, 0);

        assert!(stream.next().is_some_and(|t| t.value.is_name("f")));
        assert!(stream.consume_if(|t| *t == Token::LeftParen).is_some());
        let close = stream.skip_balanced().unwrap();
        assert_eq!(tokens[close].start, 13);
        assert_eq!(stream.peek().map(|t| &t.value), Some(&Token::Newline));
    }

    #[test]
    fn test_skip_balanced_at_end_of_input() {
        let tokens = Tokenizer::new("f(a, [b)").tokenize_all().unwrap();
        let mut stream = TokenStream::new(&tokens, 2);
        assert_eq!(stream.skip_balanced(), None);
        assert!(stream.peek().is_none());
    }
}
