//! Conversion from the GraphQL parser's SDL tree to [`SchemaDocument`].

use super::document::{
    Directive, FieldDefinition, InputValueDefinition, SchemaDocument, TypeDefinition, TypeKind,
    TypeRef,
};
use crate::query::graphql::values::const_to_json;
use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    self as ast, BaseType, ConstDirective, TypeSystemDefinition,
};
use cypherql_common::utils::error::{ParseError, ParseKind, Result};

/// Parses annotated SDL into an owned [`SchemaDocument`].
///
/// Schema and directive definitions are accepted but not retained; the
/// compiler only reads type definitions. `extend type` definitions are merged
/// into their base type.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not valid SDL or extends a type
/// it never defines.
pub fn parse(sdl: &str) -> Result<SchemaDocument> {
    let doc = async_graphql_parser::parse_schema(sdl)
        .map_err(|e| ParseError::new(ParseKind::Schema, e.to_string()))?;

    let mut types: Vec<TypeDefinition> = Vec::new();
    let mut extensions = Vec::new();
    for def in doc.definitions {
        if let TypeSystemDefinition::Type(td) = def {
            if td.node.extend {
                extensions.push(convert_type(td.node));
            } else {
                types.push(convert_type(td.node));
            }
        }
    }

    for extension in extensions {
        match types.iter_mut().find(|t| t.name == extension.name) {
            Some(base) => {
                base.fields.extend(extension.fields);
                base.directives.extend(extension.directives);
            }
            None => {
                return Err(ParseError::new(
                    ParseKind::Schema,
                    format!("cannot extend undefined type '{}'", extension.name),
                )
                .into());
            }
        }
    }

    tracing::debug!(types = types.len(), "parsed schema document");
    Ok(SchemaDocument { types })
}

fn convert_type(td: ast::TypeDefinition) -> TypeDefinition {
    let (kind, fields) = match td.kind {
        ast::TypeKind::Object(object) => (
            TypeKind::Object,
            object.fields.into_iter().map(|f| convert_field(f.node)).collect(),
        ),
        ast::TypeKind::Interface(interface) => (
            TypeKind::Interface,
            interface.fields.into_iter().map(|f| convert_field(f.node)).collect(),
        ),
        ast::TypeKind::InputObject(input) => (
            TypeKind::InputObject,
            input
                .fields
                .into_iter()
                .map(|f| convert_input_field(f.node))
                .collect(),
        ),
        ast::TypeKind::Enum(_) => (TypeKind::Enum, Vec::new()),
        ast::TypeKind::Scalar => (TypeKind::Scalar, Vec::new()),
        ast::TypeKind::Union(_) => (TypeKind::Union, Vec::new()),
    };

    TypeDefinition {
        name: td.name.node.to_string(),
        kind,
        directives: convert_directives(&td.directives),
        fields,
    }
}

fn convert_field(field: ast::FieldDefinition) -> FieldDefinition {
    FieldDefinition {
        name: field.name.node.to_string(),
        ty: convert_type_ref(&field.ty.node),
        arguments: field
            .arguments
            .into_iter()
            .map(|a| convert_input_value(a.node))
            .collect(),
        directives: convert_directives(&field.directives),
    }
}

fn convert_input_field(field: ast::InputValueDefinition) -> FieldDefinition {
    FieldDefinition {
        name: field.name.node.to_string(),
        ty: convert_type_ref(&field.ty.node),
        arguments: Vec::new(),
        directives: convert_directives(&field.directives),
    }
}

fn convert_input_value(arg: ast::InputValueDefinition) -> InputValueDefinition {
    InputValueDefinition {
        name: arg.name.node.to_string(),
        ty: convert_type_ref(&arg.ty.node),
        default_value: arg.default_value.map(|v| const_to_json(v.node)),
        directives: convert_directives(&arg.directives),
    }
}

fn convert_type_ref(ty: &ast::Type) -> TypeRef {
    let required = !ty.nullable;
    match &ty.base {
        BaseType::Named(name) => TypeRef {
            name: name.to_string(),
            is_list: false,
            required,
        },
        BaseType::List(inner) => TypeRef {
            name: innermost_name(inner),
            is_list: true,
            required,
        },
    }
}

fn innermost_name(ty: &ast::Type) -> String {
    match &ty.base {
        BaseType::Named(name) => name.to_string(),
        BaseType::List(inner) => innermost_name(inner),
    }
}

fn convert_directives(directives: &[Positioned<ConstDirective>]) -> Vec<Directive> {
    directives
        .iter()
        .map(|d| Directive {
            name: d.node.name.node.to_string(),
            arguments: d
                .node
                .arguments
                .iter()
                .map(|(name, value)| (name.node.to_string(), const_to_json(value.node.clone())))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        type Person @alias(property: "person") {
            _id: ID! @id
            name: String
            friends(filter: PersonInput): [Person!]! @relationship(type: "knows", direction: OUT)
        }

        input PersonInput {
            _id: ID @id
            name: String
        }

        enum Color { RED GREEN }

        type Query {
            getPerson(filter: PersonInput): Person
        }

        schema { query: Query }
    "#;

    #[test]
    fn test_parse_types_in_order() {
        let doc = parse(SDL).unwrap();
        let names: Vec<_> = doc.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Person", "PersonInput", "Color", "Query"]);
        assert_eq!(doc.get_type("PersonInput").unwrap().kind, TypeKind::InputObject);
    }

    #[test]
    fn test_parse_type_refs() {
        let doc = parse(SDL).unwrap();
        let person = doc.get_type("Person").unwrap();
        let friends = person.field("friends").unwrap();
        assert_eq!(
            friends.ty,
            TypeRef {
                name: "Person".to_string(),
                is_list: true,
                required: true
            }
        );
        let id = person.field("_id").unwrap();
        assert!(id.ty.required);
        assert!(!id.ty.is_list);
    }

    #[test]
    fn test_parse_directive_arguments() {
        let doc = parse(SDL).unwrap();
        let person = doc.get_type("Person").unwrap();
        assert_eq!(
            person.directive("alias").unwrap().string_argument("property"),
            Some("person")
        );

        let rel = person.field("friends").unwrap().directive("relationship").unwrap();
        assert_eq!(rel.string_argument("type"), Some("knows"));
        // Enum tokens read as strings
        assert_eq!(rel.string_argument("direction"), Some("OUT"));
        assert!(person.field("_id").unwrap().has_directive("id"));
    }

    #[test]
    fn test_extensions_merge_into_base_type() {
        let doc = parse(
            r#"
            extend type Person @alias(property: "human") { age: Int }
            type Person { _id: ID! @id name: String }
            "#,
        )
        .unwrap();
        assert_eq!(doc.types.len(), 1);
        let person = doc.get_type("Person").unwrap();
        let fields: Vec<_> = person.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["_id", "name", "age"]);
        assert_eq!(
            person.directive("alias").unwrap().string_argument("property"),
            Some("human")
        );

        let err = parse("extend type Ghost { name: String }").unwrap_err();
        assert!(err.to_string().contains("cannot extend undefined type 'Ghost'"));
    }

    #[test]
    fn test_parse_invalid_sdl() {
        let err = parse("type { broken").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse schema"));
    }
}
