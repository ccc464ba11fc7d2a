//! Executable GraphQL document, reduced to what the compiler consumes.
//!
//! Variables are already inlined into argument values and `@skip`/`@include`
//! have been applied, so every value here is a plain JSON constant.

use cypherql_common::OperationKind;
use indexmap::IndexMap;
use serde_json::Value;

/// A parsed executable document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Operations, in source order (named operations sorted by name).
    pub operations: Vec<OperationDefinition>,
}

impl Document {
    /// Returns the named operation, or the only operation if `name` is `None`.
    pub fn operation(&self, name: Option<&str>) -> Option<&OperationDefinition> {
        match name {
            Some(name) => self
                .operations
                .iter()
                .find(|op| op.name.as_deref() == Some(name)),
            None => self.operations.first(),
        }
    }
}

/// A query or mutation.
#[derive(Debug, Clone)]
pub struct OperationDefinition {
    /// Operation name, if given.
    pub name: Option<String>,
    /// Query or mutation.
    pub kind: OperationKind,
    /// Root selection set.
    pub selection_set: SelectionSet,
    /// The document's fragment definitions by name, with variables resolved
    /// against this operation.
    pub fragments: IndexMap<String, FragmentDefinition>,
}

impl OperationDefinition {
    /// Returns the first selected root field, looking through fragments.
    pub fn root_field(&self) -> Option<&Field> {
        self.selection_set.first_field(&self.fragments)
    }
}

/// A selection set.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    /// Selections in source order.
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    fn first_field<'a>(&'a self, fragments: &'a IndexMap<String, FragmentDefinition>) -> Option<&'a Field> {
        self.selections.iter().find_map(|sel| match sel {
            Selection::Field(field) => Some(field),
            Selection::FragmentSpread(name) => fragments
                .get(name)
                .and_then(|f| f.selection_set.first_field(fragments)),
            Selection::InlineFragment(inline) => inline.selection_set.first_field(fragments),
        })
    }
}

/// A single selection.
#[derive(Debug, Clone)]
pub enum Selection {
    /// A field.
    Field(Field),
    /// `...FragmentName`
    FragmentSpread(String),
    /// `... on Type { ... }`
    InlineFragment(InlineFragment),
}

/// A selected field.
#[derive(Debug, Clone)]
pub struct Field {
    /// Response alias (`alias: name`).
    pub alias: Option<String>,
    /// Schema field name.
    pub name: String,
    /// Arguments with variables resolved.
    pub arguments: IndexMap<String, Value>,
    /// Nested selections (empty for leaves).
    pub selection_set: SelectionSet,
}

impl Field {
    /// The key this field occupies in the response object.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns the argument with the given name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

/// An inline fragment.
#[derive(Debug, Clone)]
pub struct InlineFragment {
    /// `on Type`, if given.
    pub type_condition: Option<String>,
    /// Selections.
    pub selection_set: SelectionSet,
}

/// A named fragment definition.
#[derive(Debug, Clone)]
pub struct FragmentDefinition {
    /// Fragment name.
    pub name: String,
    /// `on Type`.
    pub type_condition: String,
    /// Selections.
    pub selection_set: SelectionSet,
}
