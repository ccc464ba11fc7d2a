//! Conversions from GraphQL parser values to JSON.

use async_graphql_value::{ConstValue, Name, Value};
use serde_json::{Map, Value as Json};

/// Converts a constant GraphQL value to JSON. Enum tokens become strings.
pub(crate) fn const_to_json(value: ConstValue) -> Json {
    match value {
        ConstValue::Null => Json::Null,
        ConstValue::Number(n) => Json::Number(n),
        ConstValue::String(s) => Json::String(s),
        ConstValue::Boolean(b) => Json::Bool(b),
        ConstValue::Binary(bytes) => Json::String(String::from_utf8_lossy(&bytes).into_owned()),
        ConstValue::Enum(name) => Json::String(name.to_string()),
        ConstValue::List(items) => Json::Array(items.into_iter().map(const_to_json).collect()),
        ConstValue::Object(fields) => Json::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), const_to_json(v)))
                .collect(),
        ),
    }
}

/// Converts an executable value to JSON, resolving `$variables` through `lookup`.
pub(crate) fn value_to_json(value: Value, lookup: &impl Fn(&Name) -> Json) -> Json {
    match value {
        Value::Variable(name) => lookup(&name),
        Value::Null => Json::Null,
        Value::Number(n) => Json::Number(n),
        Value::String(s) => Json::String(s),
        Value::Boolean(b) => Json::Bool(b),
        Value::Binary(bytes) => Json::String(String::from_utf8_lossy(&bytes).into_owned()),
        Value::Enum(name) => Json::String(name.to_string()),
        Value::List(items) => Json::Array(
            items
                .into_iter()
                .map(|v| value_to_json(v, lookup))
                .collect(),
        ),
        Value::Object(fields) => {
            let mut map = Map::new();
            for (k, v) in fields {
                map.insert(k.to_string(), value_to_json(v, lookup));
            }
            Json::Object(map)
        }
    }
}
