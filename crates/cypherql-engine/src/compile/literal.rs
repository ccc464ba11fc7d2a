//! Rendering argument values into fragment text.

use cypherql_common::utils::strings::is_identifier;
use serde_json::Value;

/// Text substituted for a `$placeholder`.
///
/// Scalars go in raw (strings unquoted); objects and lists become
/// openCypher literals.
pub(crate) fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => cypher_literal(value),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Renders a JSON value as an openCypher literal.
pub(crate) fn cypher_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(cypher_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote_key(k), cypher_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn quote_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("`{}`", key.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_scalars() {
        assert_eq!(raw_text(&json!("Ada")), "Ada");
        assert_eq!(raw_text(&json!(3)), "3");
        assert_eq!(raw_text(&json!(true)), "true");
        assert_eq!(raw_text(&Value::Null), "null");
    }

    #[test]
    fn test_object_literal() {
        assert_eq!(
            raw_text(&json!({"name": "O'Neil", "tags": ["a", 1], "first name": null})),
            "{name: 'O\\'Neil', tags: ['a', 1], `first name`: null}"
        );
    }
}
