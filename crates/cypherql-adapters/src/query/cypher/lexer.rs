//! openCypher fragment lexer.
//!
//! The lexer is lossless: concatenating the text of every token reproduces
//! the input exactly, so rewritten fragments keep the author's layout.

use cypherql_common::utils::error::{ParseError, ParseKind, Result};

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier or keyword.
    Identifier,
    /// Backtick-quoted identifier.
    QuotedIdentifier,
    /// `$name`
    Parameter,
    /// Single- or double-quoted string literal, quotes included.
    String,
    /// Integer or decimal literal.
    Number,
    /// Any other single character.
    Symbol(char),
    /// A run of whitespace.
    Whitespace,
    /// `// ...` up to the end of the line.
    Comment,
}

/// A token with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// Byte offset in the source.
    pub start: usize,
}

impl Token {
    /// Returns true for whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns true if this is the identifier `keyword`, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Returns true if this is the given symbol.
    pub fn is_symbol(&self, c: char) -> bool {
        self.kind == TokenKind::Symbol(c)
    }
}

/// openCypher fragment lexer.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Splits the whole input into tokens.
    ///
    /// # Errors
    ///
    /// Returns an error on an unterminated string or quoted identifier.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let start = self.position;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = if c.is_whitespace() {
            self.eat_while(char::is_whitespace);
            TokenKind::Whitespace
        } else if c == '/' && self.peek_nth(1) == Some('/') {
            self.eat_while(|c| c != '\n');
            TokenKind::Comment
        } else if c == '\'' || c == '"' {
            self.eat_quoted(c)?;
            TokenKind::String
        } else if c == '`' {
            self.eat_quoted('`')?;
            TokenKind::QuotedIdentifier
        } else if c == '$' && self.peek_nth(1).is_some_and(is_ident_start) {
            self.bump();
            self.eat_while(is_ident_continue);
            TokenKind::Parameter
        } else if c.is_ascii_digit() {
            self.eat_number();
            TokenKind::Number
        } else if is_ident_start(c) {
            self.eat_while(is_ident_continue);
            TokenKind::Identifier
        } else {
            self.bump();
            TokenKind::Symbol(c)
        };

        Ok(Some(Token {
            kind,
            text: self.input[start..self.position].to_string(),
            start,
        }))
    }

    fn eat_quoted(&mut self, quote: char) -> Result<()> {
        let start = self.position;
        self.bump();
        while let Some(c) = self.bump() {
            if c == '\\' && quote != '`' {
                self.bump();
            } else if c == quote {
                return Ok(());
            }
        }
        Err(ParseError::new(
            ParseKind::Fragment,
            format!("unterminated {quote} starting at offset {start}"),
        )
        .into())
    }

    fn eat_number(&mut self) {
        self.eat_while(|c| c.is_ascii_digit());
        // A '.' only continues the number when a digit follows; `0..5` is a range
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lexer_is_lossless() {
        let input = "MATCH (this)-[:knows]->(f:`person` {name: 'O\\'Neil'}) // tail\nRETURN count(f)";
        let tokens = Lexer::new(input).tokenize().unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_lex_pattern() {
        assert_eq!(
            kinds("(a:Person {age: $age})"),
            vec![
                TokenKind::Symbol('('),
                TokenKind::Identifier,
                TokenKind::Symbol(':'),
                TokenKind::Identifier,
                TokenKind::Symbol('{'),
                TokenKind::Identifier,
                TokenKind::Symbol(':'),
                TokenKind::Parameter,
                TokenKind::Symbol('}'),
                TokenKind::Symbol(')'),
            ]
        );
    }

    #[test]
    fn test_lex_range_is_not_decimal() {
        assert_eq!(
            kinds("[0..5]"),
            vec![
                TokenKind::Symbol('['),
                TokenKind::Number,
                TokenKind::Symbol('.'),
                TokenKind::Symbol('.'),
                TokenKind::Number,
                TokenKind::Symbol(']'),
            ]
        );
        assert_eq!(kinds("1.5e3"), vec![TokenKind::Number]);
    }

    #[test]
    fn test_lex_unterminated_string() {
        assert!(Lexer::new("MATCH (n {name: 'oops})").tokenize().is_err());
    }
}
