//! Owned model of an annotated schema document.
//!
//! Only what the compiler needs survives conversion: object, interface and
//! input types with their fields, arguments and directives. Directive
//! argument values are kept as JSON so enum tokens (`direction: IN`) and
//! strings read the same way.

use indexmap::IndexMap;
use serde_json::Value;

/// A parsed, immutable schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    /// Type definitions in declaration order.
    pub types: Vec<TypeDefinition>,
}

impl SchemaDocument {
    /// Returns the type definition with the given name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `type X { ... }`
    Object,
    /// `interface X { ... }`
    Interface,
    /// `input X { ... }`
    InputObject,
    /// `enum X { ... }`
    Enum,
    /// `scalar X`
    Scalar,
    /// `union X = ...`
    Union,
}

/// A named type definition.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    /// Type name.
    pub name: String,
    /// Definition kind.
    pub kind: TypeKind,
    /// Directives attached to the type.
    pub directives: Vec<Directive>,
    /// Fields (object/interface) or input fields (input objects).
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the first directive with the given name.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }
}

/// A field of an object, interface, or input type.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Declared arguments (always empty for input fields).
    pub arguments: Vec<InputValueDefinition>,
    /// Directives attached to the field.
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// Returns the first directive with the given name.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Returns true if a directive with the given name is attached.
    pub fn has_directive(&self, name: &str) -> bool {
        self.directive(name).is_some()
    }
}

/// A field argument.
#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    /// Argument name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Default value, if declared.
    pub default_value: Option<Value>,
    /// Directives attached to the argument.
    pub directives: Vec<Directive>,
}

impl InputValueDefinition {
    /// Returns the first directive with the given name.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }
}

/// A type reference reduced to what the compiler cares about.
///
/// `[Person!]!` becomes `{ name: "Person", is_list: true, required: true }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Innermost named type.
    pub name: String,
    /// Whether the outermost wrapper is a list.
    pub is_list: bool,
    /// Whether the outermost wrapper is non-null.
    pub required: bool,
}

impl TypeRef {
    /// A nullable, non-list reference to `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_list: false,
            required: false,
        }
    }
}

/// A directive application such as `@relationship(type: "knows", direction: OUT)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directive name without the `@`.
    pub name: String,
    /// Arguments in declaration order.
    pub arguments: IndexMap<String, Value>,
}

impl Directive {
    /// Returns the argument with the given name.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Returns the argument as a string, if it is a string or enum token.
    pub fn string_argument(&self, name: &str) -> Option<&str> {
        self.argument(name).and_then(Value::as_str)
    }

    /// Returns the first argument that is a string, whatever its name.
    pub fn first_string_argument(&self) -> Option<&str> {
        self.arguments.values().find_map(Value::as_str)
    }
}
