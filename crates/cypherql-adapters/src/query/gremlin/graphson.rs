//! GraphSON decoding.
//!
//! Gremlin servers answer with typed JSON: every non-trivial value is an
//! object `{"@type": "g:...", "@value": ...}`. Maps are flattened into
//! alternating key/value arrays because their keys may themselves be typed
//! (`g:T` tokens for `id` and `label`).

use cypherql_common::utils::error::{ParseError, ParseKind, Result};
use serde_json::{Map, Value};

/// A decoded GraphSON value with type tags resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphsonValue {
    /// A plain JSON scalar (typed numbers, dates and ids are unwrapped).
    Scalar(Value),
    /// A `g:T` or `g:Direction` enum token such as `id` or `label`.
    Token(String),
    /// `g:List`, `g:Set` or an untagged array.
    List(Vec<GraphsonValue>),
    /// `g:Map`, `g:Vertex`, `g:Edge` or an untagged object, as ordered pairs.
    Map(Vec<(GraphsonValue, GraphsonValue)>),
}

impl GraphsonValue {
    /// Returns the value as a map key, if it can serve as one.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Token(t) => Some(t.clone()),
            Self::Scalar(Value::String(s)) => Some(s.clone()),
            Self::Scalar(Value::Number(n)) => Some(n.to_string()),
            Self::Scalar(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Converts to untyped JSON. Map keys that are not scalars are rendered
    /// as their JSON text.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(v) => v.clone(),
            Self::Token(t) => Value::String(t.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(pairs) => {
                let mut map = Map::new();
                for (k, v) in pairs {
                    let key = k.as_key().unwrap_or_else(|| k.to_json().to_string());
                    map.insert(key, v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// Decodes GraphSON (v2/v3) typed JSON.
///
/// # Errors
///
/// Returns a [`ParseError`] if a tagged value has the wrong payload shape,
/// such as a `g:Map` with an odd number of entries.
pub fn decode(value: &Value) -> Result<GraphsonValue> {
    match value {
        Value::Array(items) => Ok(GraphsonValue::List(
            items.iter().map(decode).collect::<Result<_>>()?,
        )),
        Value::Object(obj) => match (obj.get("@type").and_then(Value::as_str), obj.get("@value")) {
            (Some(tag), Some(payload)) => decode_typed(tag, payload),
            _ => {
                let pairs = obj
                    .iter()
                    .map(|(k, v)| Ok((GraphsonValue::Scalar(Value::String(k.clone())), decode(v)?)))
                    .collect::<Result<_>>()?;
                Ok(GraphsonValue::Map(pairs))
            }
        },
        scalar => Ok(GraphsonValue::Scalar(scalar.clone())),
    }
}

fn decode_typed(tag: &str, payload: &Value) -> Result<GraphsonValue> {
    match tag {
        "g:List" | "g:Set" => match payload {
            Value::Array(items) => Ok(GraphsonValue::List(
                items.iter().map(decode).collect::<Result<_>>()?,
            )),
            _ => Err(malformed(tag, "expected an array")),
        },
        "g:Map" => {
            let Value::Array(items) = payload else {
                return Err(malformed(tag, "expected an array"));
            };
            if items.len() % 2 != 0 {
                return Err(malformed(tag, "odd number of key/value entries"));
            }
            let pairs = items
                .chunks(2)
                .map(|kv| Ok((decode(&kv[0])?, decode(&kv[1])?)))
                .collect::<Result<_>>()?;
            Ok(GraphsonValue::Map(pairs))
        }
        "g:T" | "g:Direction" => match payload {
            Value::String(s) => Ok(GraphsonValue::Token(s.clone())),
            _ => Err(malformed(tag, "expected a string")),
        },
        "g:Vertex" | "g:Edge" => decode_element(tag, payload),
        "g:VertexProperty" | "g:Property" => payload
            .get("value")
            .map_or_else(|| Err(malformed(tag, "missing value")), decode),
        // Typed scalars: g:Int32, g:Int64, g:Double, g:Float, g:Date, g:UUID, ...
        _ => decode(payload),
    }
}

fn decode_element(tag: &str, payload: &Value) -> Result<GraphsonValue> {
    let Value::Object(obj) = payload else {
        return Err(malformed(tag, "expected an object"));
    };

    let mut pairs = Vec::new();
    if let Some(id) = obj.get("id") {
        pairs.push((GraphsonValue::Token("id".to_string()), decode(id)?));
    }
    if let Some(label) = obj.get("label") {
        pairs.push((GraphsonValue::Token("label".to_string()), decode(label)?));
    }
    if let Some(Value::Object(props)) = obj.get("properties") {
        for (key, value) in props {
            let decoded = match decode(value)? {
                // Vertex properties are multi-valued; a single value is unwrapped
                GraphsonValue::List(mut values) if values.len() == 1 => values.remove(0),
                other => other,
            };
            pairs.push((GraphsonValue::Scalar(Value::String(key.clone())), decoded));
        }
    }
    Ok(GraphsonValue::Map(pairs))
}

fn malformed(tag: &str, message: &str) -> cypherql_common::Error {
    ParseError::new(ParseKind::Response, format!("{tag}: {message}")).into()
}
