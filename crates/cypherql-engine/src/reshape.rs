//! Result Reshaper: Gremlin responses to GraphQL-shaped JSON.
//!
//! The response envelope is a `g:List` whose elements decide the shape: a
//! single map becomes one object, several maps or one nested list become an
//! array of objects, and anything else is returned as the raw value.

use crate::config::MalformedElementPolicy;
use cypherql_adapters::query::gremlin::{self, GraphsonValue};
use cypherql_common::utils::error::{ReshapeError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Reshapes Gremlin responses using a field-alias map.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reshaper {
    policy: MalformedElementPolicy,
}

impl Reshaper {
    /// Creates a reshaper with the given malformed-element policy.
    pub fn new(policy: MalformedElementPolicy) -> Self {
        Self { policy }
    }

    /// Converts a Gremlin response into GraphQL-shaped JSON.
    ///
    /// `response` is either the full HTTP body (`{"result": {"data": ...}}`)
    /// or the data envelope itself. `alias_map` maps stored keys to GraphQL
    /// field names; its `"id"` entry names the identity field.
    ///
    /// # Errors
    ///
    /// Returns [`ReshapeError::UnexpectedEnvelope`] if the envelope is not a
    /// list or holds several nested lists, [`ReshapeError::MalformedElement`]
    /// for a non-map element or a map with a non-scalar key under
    /// [`MalformedElementPolicy::Fail`], or a parse error for invalid GraphSON.
    pub fn reshape(&self, response: &Value, alias_map: &IndexMap<String, String>) -> Result<Value> {
        let envelope = response
            .get("result")
            .and_then(|r| r.get("data"))
            .unwrap_or(response);

        let GraphsonValue::List(elements) = gremlin::decode(envelope)? else {
            return Err(ReshapeError::UnexpectedEnvelope(format!(
                "expected a g:List, got {}",
                kind_of(envelope)
            ))
            .into());
        };

        match elements.as_slice() {
            [] => Ok(Value::Null),
            [GraphsonValue::Map(pairs)] => map_object(pairs, alias_map),
            // One traverser per vertex, as `elementMap()` returns
            [GraphsonValue::Map(_), ..] => self.map_array(&elements, alias_map),
            [GraphsonValue::List(items), rest @ ..] => {
                if !rest.is_empty() {
                    return Err(ReshapeError::UnexpectedEnvelope(format!(
                        "expected a single list, got {} top-level elements",
                        elements.len()
                    ))
                    .into());
                }
                self.map_array(items, alias_map)
            }
            [other] => Ok(other.to_json()),
            [_, ..] => Ok(Value::Array(elements.iter().map(GraphsonValue::to_json).collect())),
        }
    }

    fn map_array(&self, items: &[GraphsonValue], alias_map: &IndexMap<String, String>) -> Result<Value> {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let mapped = match item {
                GraphsonValue::Map(pairs) => map_object(pairs, alias_map),
                other => Err(ReshapeError::MalformedElement {
                    index,
                    message: format!("expected a map, got {}", other.to_json()),
                }
                .into()),
            };
            match (mapped, self.policy) {
                (Ok(object), _) => out.push(object),
                (Err(e), MalformedElementPolicy::Skip) => {
                    tracing::warn!(index, error = %e, "skipping malformed element");
                }
                (
                    Err(cypherql_common::Error::Reshape(ReshapeError::InvalidKey(key))),
                    MalformedElementPolicy::Fail,
                ) => {
                    return Err(ReshapeError::MalformedElement {
                        index,
                        message: format!("map key {key} is not a string"),
                    }
                    .into());
                }
                (Err(e), MalformedElementPolicy::Fail) => return Err(e),
            }
        }
        Ok(Value::Array(out))
    }
}

/// Convenience wrapper using the default policy.
///
/// # Errors
///
/// See [`Reshaper::reshape`].
pub fn reshape(response: &Value, alias_map: &IndexMap<String, String>) -> Result<Value> {
    Reshaper::default().reshape(response, alias_map)
}

fn map_object(pairs: &[(GraphsonValue, GraphsonValue)], alias_map: &IndexMap<String, String>) -> Result<Value> {
    let mut object = Map::new();
    for (key, value) in pairs {
        let Some(stored) = key.as_key() else {
            return Err(ReshapeError::InvalidKey(key.to_json().to_string()).into());
        };
        let output = match stored.as_str() {
            "label" => "type".to_string(),
            "id" => alias_map.get("id").cloned().unwrap_or(stored),
            _ => alias_map.get(&stored).cloned().unwrap_or(stored),
        };
        object.insert(output, value.to_json());
    }
    Ok(Value::Object(object))
}

fn kind_of(value: &Value) -> &'static str {
    match value.get("@type").and_then(Value::as_str) {
        Some("g:Map") => "g:Map",
        Some(_) => "a typed scalar",
        None if value.is_object() => "an object",
        None => "a scalar",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aliases() -> IndexMap<String, String> {
        IndexMap::from([
            ("id".to_string(), "identity".to_string()),
            ("fullName".to_string(), "name".to_string()),
        ])
    }

    #[test]
    fn test_empty_list_is_null() {
        let response = json!({"@type": "g:List", "@value": []});
        assert_eq!(reshape(&response, &aliases()).unwrap(), Value::Null);
    }

    #[test]
    fn test_scalar_result() {
        let response = json!({"@type": "g:List", "@value": [{"@type": "g:Int64", "@value": 12}]});
        assert_eq!(reshape(&response, &aliases()).unwrap(), json!(12));
    }

    #[test]
    fn test_not_a_list() {
        let response = json!({"@type": "g:Map", "@value": []});
        let err = reshape(&response, &aliases()).unwrap_err();
        assert!(err.to_string().contains("expected a g:List, got g:Map"));
    }

    #[test]
    fn test_invalid_key() {
        let response = json!({"@type": "g:List", "@value": [
            {"@type": "g:Map", "@value": [{"@type": "g:List", "@value": []}, 1]}
        ]});
        assert!(matches!(
            reshape(&response, &aliases()),
            Err(cypherql_common::Error::Reshape(ReshapeError::InvalidKey(_)))
        ));
    }
}
