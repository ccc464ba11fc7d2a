//! Descriptors derived from the annotated schema.

use cypherql_common::{Direction, OperationKind};
use serde::Serialize;
use serde_json::Value;

/// How a field maps onto the graph. Resolved once per lookup from the
/// field's directives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldKind {
    /// A stored property, read as `var.`alias``.
    Plain,
    /// The graph engine's internal identity (`@id`), read as `ID(var)`.
    Identity,
    /// An edge traversal (`@relationship`).
    #[serde(rename_all = "camelCase")]
    Relationship {
        /// Edge type in the graph.
        edge_type: String,
        /// Traversal direction from the parent.
        direction: Direction,
    },
    /// A literal query fragment (`@graphQuery`/`@cypher`) using `this` for
    /// the current pattern variable.
    Overridden {
        /// Fragment text.
        fragment: String,
    },
}

/// A resolved object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// GraphQL field name.
    pub name: String,
    /// Stored property name (`@alias`), defaults to `name`.
    pub alias: String,
    /// Named GraphQL type, list and non-null wrappers removed.
    pub graph_type: String,
    /// Whether the field returns a list.
    pub is_array: bool,
    /// Whether the field is non-null.
    pub is_required: bool,
    /// Whether `graph_type` is an object type rather than a scalar or enum.
    pub is_schema_type: bool,
    /// Graph mapping.
    pub kind: FieldKind,
    /// Declared arguments.
    pub declared_args: Vec<ArgDescriptor>,
}

impl FieldDescriptor {
    /// Returns true if the field carries `@id` and no override.
    pub fn is_id(&self) -> bool {
        self.kind == FieldKind::Identity
    }

    /// Returns the override fragment, if any.
    pub fn override_query(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Overridden { fragment } => Some(fragment),
            _ => None,
        }
    }

    /// Returns the declared argument with the given name.
    pub fn declared_arg(&self, name: &str) -> Option<&ArgDescriptor> {
        self.declared_args.iter().find(|a| a.name == name)
    }
}

/// A declared argument or input-object field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDescriptor {
    /// GraphQL name.
    pub name: String,
    /// Named GraphQL type.
    pub graph_type: String,
    /// Whether the argument is a list.
    pub is_list: bool,
    /// Whether the argument is non-null.
    pub is_required: bool,
    /// Stored property name (`@alias`), if different from `name`.
    pub alias: Option<String>,
    /// Whether the argument carries `@id`.
    pub is_id: bool,
    /// Declared default value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ArgDescriptor {
    /// The stored property name this argument filters on.
    pub fn property(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Descriptor for the invoked root field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRootInfo {
    /// Query or mutation.
    pub operation_kind: OperationKind,
    /// Root field name.
    pub name: String,
    /// Named return type.
    pub return_type: String,
    /// Graph label of the return type (type-level `@alias`).
    pub return_type_alias: String,
    /// Pattern variable for the root: `{name}_{returnType}`.
    pub path_name: String,
    /// Whether the root returns a list.
    pub return_is_array: bool,
    /// Whether the return type is an object type.
    pub return_is_object: bool,
    /// Override fragment on the root field.
    pub override_query: Option<String>,
    /// Declared arguments.
    pub args: Vec<ArgDescriptor>,
    /// Argument (or input field) name that filters on identity.
    pub id_arg_name: Option<String>,
    /// `options.limit` or `limit` supplied by the operation.
    pub limit: Option<u64>,
}
