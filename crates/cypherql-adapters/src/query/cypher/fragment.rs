//! Scoped operations over a lexed openCypher fragment.

use super::lexer::{Lexer, Token, TokenKind};
use cypherql_common::utils::error::Result;
use std::fmt;

/// A lexed openCypher fragment, as written in a `@cypher`/`@graphQuery`
/// directive.
///
/// Identifiers are classified by position: an identifier is a *variable*
/// unless it follows `.` (property access), follows `:` outside a map literal
/// (label or relationship type), precedes `:` inside a map literal (map key),
/// or precedes `(` (function name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    tokens: Vec<Token>,
}

impl Fragment {
    /// Lexes `text` into a fragment.
    ///
    /// # Errors
    ///
    /// Returns an error on an unterminated string or quoted identifier.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            tokens: Lexer::new(text).tokenize()?,
        })
    }

    /// Returns true if the fragment holds nothing but whitespace or comments.
    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(Token::is_trivia)
    }

    /// The first keyword of the fragment, if it starts with an identifier.
    pub fn leading_keyword(&self) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| !t.is_trivia())
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.as_str())
    }

    /// Returns the identifier if the fragment is nothing but a single
    /// variable, as in `RETURN friend`.
    pub fn as_variable(&self) -> Option<&str> {
        let mut significant = self.tokens.iter().filter(|t| !t.is_trivia());
        match (significant.next(), significant.next()) {
            (Some(t), None) if t.kind == TokenKind::Identifier => Some(&t.text),
            _ => None,
        }
    }

    /// Variables the fragment binds, in order of first binding.
    ///
    /// A variable is bound when it opens a node or relationship pattern
    /// (`(x`, `[x`) or is introduced by `AS x`. `this` is never reported.
    pub fn bound_variables(&self) -> Vec<String> {
        let positions = self.variable_positions();
        let mut bound: Vec<String> = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if !positions[i] || token.text == "this" {
                continue;
            }
            let binds = self.prev_significant(i).is_some_and(|prev| {
                prev.is_symbol('(') || prev.is_symbol('[') || prev.is_keyword("AS")
            });
            if binds && !bound.contains(&token.text) {
                bound.push(token.text.clone());
            }
        }
        bound
    }

    /// Returns true if `name` occurs in variable position.
    pub fn mentions(&self, name: &str) -> bool {
        let positions = self.variable_positions();
        self.tokens
            .iter()
            .enumerate()
            .any(|(i, t)| positions[i] && t.text == name)
    }

    /// Rewrites every variable-position identifier for which `rename`
    /// returns a new name. Strings, property keys, labels and map keys are
    /// left untouched.
    #[must_use]
    pub fn rename_variables(&self, rename: impl Fn(&str) -> Option<String>) -> Self {
        let positions = self.variable_positions();
        let tokens = self
            .tokens
            .iter()
            .enumerate()
            .map(|(i, token)| match positions[i].then(|| rename(&token.text)).flatten() {
                Some(text) => Token {
                    text,
                    ..token.clone()
                },
                None => token.clone(),
            })
            .collect();
        Self { tokens }
    }

    /// Splits at the last top-level `RETURN`, yielding the body before it
    /// and the return expression after it, both trimmed.
    ///
    /// Returns `None` if there is no top-level `RETURN`.
    pub fn split_return(&self) -> Option<(Fragment, Fragment)> {
        let mut depth = 0usize;
        let mut at = None;
        for (i, token) in self.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Symbol('(' | '[' | '{') => depth += 1,
                TokenKind::Symbol(')' | ']' | '}') => depth = depth.saturating_sub(1),
                TokenKind::Identifier if depth == 0 && token.is_keyword("RETURN") => at = Some(i),
                _ => {}
            }
        }
        let at = at?;
        Some((
            Self::trimmed(&self.tokens[..at]),
            Self::trimmed(&self.tokens[at + 1..]),
        ))
    }

    /// Returns true if the fragment calls a function, which for a return
    /// expression means it aggregates (`count(x)`, `sum(x)`, ...).
    pub fn is_aggregate(&self) -> bool {
        self.tokens.iter().any(|t| t.is_symbol('('))
    }

    fn trimmed(tokens: &[Token]) -> Self {
        let start = tokens.iter().position(|t| t.kind != TokenKind::Whitespace);
        let end = tokens.iter().rposition(|t| t.kind != TokenKind::Whitespace);
        let tokens = match (start, end) {
            (Some(s), Some(e)) => tokens[s..=e].to_vec(),
            _ => Vec::new(),
        };
        Self { tokens }
    }

    fn variable_positions(&self) -> Vec<bool> {
        let mut stack: Vec<char> = Vec::new();
        let mut positions = vec![false; self.tokens.len()];

        for (i, token) in self.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Symbol(c @ ('(' | '[' | '{')) => stack.push(c),
                TokenKind::Symbol(')' | ']' | '}') => {
                    stack.pop();
                }
                TokenKind::Identifier => {
                    let in_map = stack.last() == Some(&'{');
                    let prev = self.prev_significant(i);
                    let next = self.next_significant(i);

                    let property = prev.is_some_and(|t| t.is_symbol('.'));
                    let label = !in_map && prev.is_some_and(|t| t.is_symbol(':'));
                    let map_key = in_map && next.is_some_and(|t| t.is_symbol(':'));
                    let function = next.is_some_and(|t| t.is_symbol('('));

                    positions[i] = !(property || label || map_key || function);
                }
                _ => {}
            }
        }
        positions
    }

    fn prev_significant(&self, i: usize) -> Option<&Token> {
        self.tokens[..i].iter().rev().find(|t| !t.is_trivia())
    }

    fn next_significant(&self, i: usize) -> Option<&Token> {
        self.tokens[i + 1..].iter().find(|t| !t.is_trivia())
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(&token.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixed(fragment: &Fragment, prefix: &str) -> String {
        let bound = fragment.bound_variables();
        fragment
            .rename_variables(|v| {
                if v == "this" {
                    Some("P".to_string())
                } else if bound.iter().any(|b| b == v) {
                    Some(format!("{prefix}_{v}"))
                } else {
                    None
                }
            })
            .to_string()
    }

    #[test]
    fn test_bound_variables() {
        let f = Fragment::parse(
            "MATCH (this)-[r:knows]->(friend:Person)\nWITH count(friend) AS total RETURN total",
        )
        .unwrap();
        assert_eq!(f.bound_variables(), vec!["r", "friend", "total"]);
    }

    #[test]
    fn test_rename_skips_labels_properties_and_strings() {
        let f = Fragment::parse(
            "MATCH (this)-[:friend]->(friend:friend {friend: 'friend'}) WHERE friend.friend = this.friend RETURN friend",
        )
        .unwrap();
        assert_eq!(
            prefixed(&f, "P_x"),
            "MATCH (P)-[:friend]->(P_x_friend:friend {friend: 'friend'}) WHERE P_x_friend.friend = P.friend RETURN P_x_friend"
        );
    }

    #[test]
    fn test_rename_map_values_are_variables() {
        let f = Fragment::parse("MATCH (a)-[e]->(b) RETURN {from: a, edge: e}").unwrap();
        assert_eq!(
            prefixed(&f, "Q"),
            "MATCH (Q_a)-[Q_e]->(Q_b) RETURN {from: Q_a, edge: Q_e}"
        );
    }

    #[test]
    fn test_split_return_uses_last_top_level() {
        let f = Fragment::parse(
            "CALL { MATCH (x) RETURN x } MATCH (this)-->(y) RETURN count(y) ",
        )
        .unwrap();
        let (body, tail) = f.split_return().unwrap();
        assert_eq!(body.to_string(), "CALL { MATCH (x) RETURN x } MATCH (this)-->(y)");
        assert_eq!(tail.to_string(), "count(y)");
        assert!(tail.is_aggregate());
        assert_eq!(tail.as_variable(), None);
        assert_eq!(body.leading_keyword(), Some("CALL"));
    }

    #[test]
    fn test_split_return_missing() {
        let f = Fragment::parse("MATCH (n) DETACH DELETE n").unwrap();
        assert!(f.split_return().is_none());

        let f = Fragment::parse("MATCH (this)-->(n) RETURN n ").unwrap();
        let (_, tail) = f.split_return().unwrap();
        assert_eq!(tail.as_variable(), Some("n"));
    }

    #[test]
    fn test_mentions() {
        let f = Fragment::parse("this.name + other.name").unwrap();
        assert!(f.mentions("this"));
        assert!(f.mentions("other"));
        assert!(!f.mentions("name"));
        assert!(!f.is_aggregate());
    }
}
