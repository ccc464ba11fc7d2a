//! Property tests for fragment lexing and rewriting.

use cypherql_adapters::query::cypher::Fragment;
use cypherql_adapters::query::cypher::lexer::Lexer;
use proptest::prelude::*;

/// Unquoted fragment text, optionally followed by a closed string literal.
fn fragment_text() -> impl Strategy<Value = String> {
    (
        "[a-zA-Z0-9_ ()\\[\\]{}:.,$<>=*\n-]{0,60}",
        proptest::option::of("'[a-z ]{0,10}'"),
    )
        .prop_map(|(body, literal)| match literal {
            Some(literal) => format!("{body} {literal}"),
            None => body,
        })
}

proptest! {
    #[test]
    fn lexing_is_lossless(text in fragment_text()) {
        let tokens = Lexer::new(&text).tokenize().unwrap();
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn renaming_nothing_changes_nothing(text in fragment_text()) {
        let fragment = Fragment::parse(&text).unwrap();
        prop_assert_eq!(fragment.rename_variables(|_| None).to_string(), text);
    }

    #[test]
    fn string_literals_are_never_renamed(var in "[a-z]{1,6}") {
        let text = format!("MATCH ({var}) WHERE {var}.name = '{var}' RETURN {var}");
        let renamed = Fragment::parse(&text)
            .unwrap()
            .rename_variables(|v| (v == var).then(|| "X".to_string()))
            .to_string();
        prop_assert!(renamed.contains(&format!("'{var}'")), "renamed: {}", renamed);
        prop_assert!(renamed.starts_with("MATCH (X) WHERE X.name"));
    }
}
