//! Schema Index and Field Resolver.

use super::descriptor::{ArgDescriptor, FieldDescriptor, FieldKind, QueryRootInfo};
use cypherql_adapters::schema::{
    self, FieldDefinition, InputValueDefinition, SchemaDocument, TypeDefinition, TypeKind,
};
use cypherql_common::utils::error::{Result, SchemaError};
use cypherql_common::utils::strings::find_similar;
use cypherql_common::{Direction, OperationKind};
use hashbrown::HashMap;
use indexmap::IndexMap;

/// Read-only index over an annotated schema.
///
/// Built once and shared by every compile.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    document: SchemaDocument,
    types: HashMap<String, usize>,
}

impl SchemaIndex {
    /// Parses SDL and indexes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDL does not parse or a type marks more than
    /// one field with `@id`.
    pub fn parse(sdl: &str) -> Result<Self> {
        Self::new(schema::parse(sdl)?)
    }

    /// Indexes an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateIdField`] if a type marks more than one
    /// field with `@id`.
    pub fn new(document: SchemaDocument) -> Result<Self> {
        let mut types = HashMap::with_capacity(document.types.len());
        for (i, td) in document.types.iter().enumerate() {
            check_single_id(td)?;
            types.insert(td.name.clone(), i);
        }
        Ok(Self { document, types })
    }

    /// The underlying document.
    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// Returns the type definition with the given name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name).map(|&i| &self.document.types[i])
    }

    /// Returns true if `name` is an object or interface type.
    pub fn is_object_type(&self, name: &str) -> bool {
        self.get_type(name)
            .is_some_and(|td| matches!(td.kind, TypeKind::Object | TypeKind::Interface))
    }

    /// Fields declared on the root type of `kind`, in schema order.
    pub fn root_fields(&self, kind: OperationKind) -> &[FieldDefinition] {
        self.get_type(kind.root_type_name())
            .map_or(&[][..], |td| td.fields.as_slice())
    }

    /// Graph label for a type: its `@alias(property:)`, else its name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] for an unknown type.
    pub fn type_alias(&self, type_name: &str) -> Result<String> {
        let td = self.require_type(type_name)?;
        Ok(alias_of(&td.directives).unwrap_or(&td.name).to_string())
    }

    /// Name of the field carrying `@id` on `type_name`, if any.
    pub fn identity_field(&self, type_name: &str) -> Option<&str> {
        self.get_type(type_name)?
            .fields
            .iter()
            .find(|f| f.has_directive("id"))
            .map(|f| f.name.as_str())
    }

    /// Resolves `type_name.field_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] or [`SchemaError::FieldNotFound`]
    /// with a spelling hint, or [`SchemaError::InvalidDirective`] if a
    /// compiler directive is missing its required argument.
    pub fn resolve_field(&self, type_name: &str, field_name: &str) -> Result<FieldDescriptor> {
        let td = self.require_type(type_name)?;
        let Some(field) = td.field(field_name) else {
            let names: Vec<&str> = td.fields.iter().map(|f| f.name.as_str()).collect();
            let suggestion = find_similar(field_name, names.as_slice()).map(str::to_string);
            tracing::warn!(type_name, field_name, "field not found in schema");
            return Err(SchemaError::FieldNotFound {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
                suggestion,
            }
            .into());
        };
        self.describe(td, field)
    }

    /// Resolves a root field on `Query` or `Mutation`.
    ///
    /// `limit` is left unset; the compiler fills it from the operation's
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::RootFieldNotFound`] with a spelling hint when
    /// neither root type declares the field.
    pub fn resolve_root(&self, field_name: &str) -> Result<QueryRootInfo> {
        for kind in [OperationKind::Query, OperationKind::Mutation] {
            let Some(td) = self.get_type(kind.root_type_name()) else {
                continue;
            };
            let Some(field) = td.field(field_name) else {
                continue;
            };

            let descriptor = self.describe(td, field)?;
            let return_is_object = self.is_object_type(&descriptor.graph_type);
            let return_type_alias = if return_is_object {
                self.type_alias(&descriptor.graph_type)?
            } else {
                descriptor.graph_type.clone()
            };
            let id_arg_name = descriptor
                .declared_args
                .iter()
                .find(|a| a.is_id)
                .map(|a| a.name.clone())
                .or_else(|| self.identity_field(&descriptor.graph_type).map(str::to_string));

            return Ok(QueryRootInfo {
                operation_kind: kind,
                path_name: format!("{}_{}", descriptor.name, descriptor.graph_type),
                name: descriptor.name,
                return_type: descriptor.graph_type,
                return_type_alias,
                return_is_array: descriptor.is_array,
                return_is_object,
                override_query: match descriptor.kind {
                    FieldKind::Overridden { fragment } => Some(fragment),
                    _ => None,
                },
                args: descriptor.declared_args,
                id_arg_name,
                limit: None,
            });
        }

        let names: Vec<&str> = [OperationKind::Query, OperationKind::Mutation]
            .into_iter()
            .flat_map(|kind| self.root_fields(kind))
            .map(|f| f.name.as_str())
            .collect();
        let suggestion = find_similar(field_name, names.as_slice()).map(str::to_string);
        tracing::warn!(field_name, "root field not found in schema");
        Err(SchemaError::RootFieldNotFound {
            field_name: field_name.to_string(),
            suggestion,
        }
        .into())
    }

    /// Resolves the fields of an input object type as argument descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] for an unknown type.
    pub fn resolve_input_args(&self, input_type: &str) -> Result<Vec<ArgDescriptor>> {
        let td = self.require_type(input_type)?;
        Ok(td
            .fields
            .iter()
            .map(|f| ArgDescriptor {
                name: f.name.clone(),
                graph_type: f.ty.name.clone(),
                is_list: f.ty.is_list,
                is_required: f.ty.required,
                alias: alias_of(&f.directives).map(str::to_string),
                is_id: f.has_directive("id"),
                default_value: None,
            })
            .collect())
    }

    /// Stored key to GraphQL field name, for reshaping Gremlin results.
    ///
    /// The identity field is keyed by `"id"`; relationship and override
    /// fields are not stored properties and are left out.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] for an unknown type.
    pub fn field_alias_map(&self, type_name: &str) -> Result<IndexMap<String, String>> {
        let td = self.require_type(type_name)?;
        let mut map = IndexMap::new();
        for field in &td.fields {
            match self.describe(td, field)?.kind {
                FieldKind::Identity => {
                    map.insert("id".to_string(), field.name.clone());
                }
                FieldKind::Plain => {
                    let stored = alias_of(&field.directives).unwrap_or(&field.name);
                    map.insert(stored.to_string(), field.name.clone());
                }
                FieldKind::Relationship { .. } | FieldKind::Overridden { .. } => {}
            }
        }
        Ok(map)
    }

    fn require_type(&self, type_name: &str) -> Result<&TypeDefinition> {
        self.get_type(type_name).ok_or_else(|| {
            let names: Vec<&str> = self.document.types.iter().map(|t| t.name.as_str()).collect();
            tracing::warn!(type_name, "type not found in schema");
            SchemaError::TypeNotFound {
                type_name: type_name.to_string(),
                suggestion: find_similar(type_name, names.as_slice()).map(str::to_string),
            }
            .into()
        })
    }

    fn describe(&self, td: &TypeDefinition, field: &FieldDefinition) -> Result<FieldDescriptor> {
        let location = format!("{}.{}", td.name, field.name);
        let kind = field_kind(field, &location)?;

        Ok(FieldDescriptor {
            name: field.name.clone(),
            alias: alias_of(&field.directives)
                .unwrap_or(&field.name)
                .to_string(),
            graph_type: field.ty.name.clone(),
            is_array: field.ty.is_list,
            is_required: field.ty.required,
            is_schema_type: self.is_object_type(&field.ty.name),
            kind,
            declared_args: field.arguments.iter().map(arg_descriptor).collect(),
        })
    }
}

fn field_kind(field: &FieldDefinition, location: &str) -> Result<FieldKind> {
    let invalid = |directive: &str, message: &str| SchemaError::InvalidDirective {
        directive: directive.to_string(),
        location: location.to_string(),
        message: message.to_string(),
    };

    for name in ["graphQuery", "cypher"] {
        if let Some(d) = field.directive(name) {
            let fragment = d
                .string_argument("statement")
                .or_else(|| d.first_string_argument())
                .ok_or_else(|| invalid(name, "missing 'statement' argument"))?;
            return Ok(FieldKind::Overridden {
                fragment: fragment.to_string(),
            });
        }
    }

    if let Some(d) = field.directive("relationship") {
        let edge_type = d
            .string_argument("type")
            .or_else(|| d.string_argument("edgeType"))
            .ok_or_else(|| invalid("relationship", "missing 'type' argument"))?;
        let direction = match d.string_argument("direction") {
            Some(s) => s
                .parse::<Direction>()
                .map_err(|e| invalid("relationship", &e))?,
            None => Direction::default(),
        };
        return Ok(FieldKind::Relationship {
            edge_type: edge_type.to_string(),
            direction,
        });
    }

    if field.has_directive("id") {
        return Ok(FieldKind::Identity);
    }
    Ok(FieldKind::Plain)
}

fn arg_descriptor(arg: &InputValueDefinition) -> ArgDescriptor {
    ArgDescriptor {
        name: arg.name.clone(),
        graph_type: arg.ty.name.clone(),
        is_list: arg.ty.is_list,
        is_required: arg.ty.required,
        alias: alias_of(&arg.directives).map(str::to_string),
        is_id: arg.directive("id").is_some(),
        default_value: arg.default_value.clone(),
    }
}

fn alias_of(directives: &[schema::Directive]) -> Option<&str> {
    let d = directives.iter().find(|d| d.name == "alias")?;
    d.string_argument("property")
        .or_else(|| d.string_argument("name"))
        .or_else(|| d.first_string_argument())
}

fn check_single_id(td: &TypeDefinition) -> Result<()> {
    let mut ids = td.fields.iter().filter(|f| f.has_directive("id"));
    if let (Some(first), Some(second)) = (ids.next(), ids.next()) {
        return Err(SchemaError::DuplicateIdField {
            type_name: td.name.clone(),
            first: first.name.clone(),
            second: second.name.clone(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cypherql_common::Error;

    const SDL: &str = r#"
        type Person @alias(property: "person") {
            _id: ID! @id
            name: String @alias(property: "fullName")
            friends(filter: PersonInput, options: Options): [Person] @relationship(type: "knows", direction: OUT)
            friendCount: Int @graphQuery(statement: "MATCH (this)-[:knows]->(f) RETURN count(f)")
        }

        input PersonInput {
            _id: ID @id
            name: String @alias(property: "fullName")
        }

        input Options { limit: Int }

        type Query {
            getPerson(filter: PersonInput): Person
            getPeople(filter: PersonInput, options: Options): [Person]
        }

        type Mutation {
            deleteNodePerson(_id: ID! @id): Boolean
        }
    "#;

    fn index() -> SchemaIndex {
        SchemaIndex::parse(SDL).unwrap()
    }

    #[test]
    fn test_resolve_plain_field_with_alias() {
        let field = index().resolve_field("Person", "name").unwrap();
        assert_eq!(field.alias, "fullName");
        assert_eq!(field.kind, FieldKind::Plain);
        assert!(!field.is_schema_type);
    }

    #[test]
    fn test_resolve_relationship_field() {
        let field = index().resolve_field("Person", "friends").unwrap();
        assert!(field.is_array);
        assert!(field.is_schema_type);
        assert_eq!(
            field.kind,
            FieldKind::Relationship {
                edge_type: "knows".to_string(),
                direction: Direction::Out
            }
        );
        assert_eq!(field.declared_args.len(), 2);
    }

    #[test]
    fn test_resolve_identity_and_override() {
        let idx = index();
        assert!(idx.resolve_field("Person", "_id").unwrap().is_id());
        let count = idx.resolve_field("Person", "friendCount").unwrap();
        assert_eq!(
            count.override_query(),
            Some("MATCH (this)-[:knows]->(f) RETURN count(f)")
        );
    }

    #[test]
    fn test_resolve_field_not_found_suggests() {
        let err = index().resolve_field("Person", "nmae").unwrap_err();
        assert_eq!(
            err,
            Error::Schema(SchemaError::FieldNotFound {
                type_name: "Person".to_string(),
                field_name: "nmae".to_string(),
                suggestion: Some("name".to_string()),
            })
        );
    }

    #[test]
    fn test_resolve_root() {
        let root = index().resolve_root("getPeople").unwrap();
        assert_eq!(root.operation_kind, OperationKind::Query);
        assert_eq!(root.path_name, "getPeople_Person");
        assert_eq!(root.return_type_alias, "person");
        assert!(root.return_is_array);
        assert!(root.return_is_object);
        assert_eq!(root.id_arg_name.as_deref(), Some("_id"));

        let del = index().resolve_root("deleteNodePerson").unwrap();
        assert_eq!(del.operation_kind, OperationKind::Mutation);
        assert!(!del.return_is_object);
        assert_eq!(del.id_arg_name.as_deref(), Some("_id"));
    }

    #[test]
    fn test_resolve_root_not_found() {
        let err = index().resolve_root("getPersn").unwrap_err();
        assert!(err.to_string().contains("Did you mean 'getPerson'?"));
    }

    #[test]
    fn test_resolve_input_args() {
        let args = index().resolve_input_args("PersonInput").unwrap();
        assert_eq!(args.len(), 2);
        assert!(args[0].is_id);
        assert_eq!(args[1].property(), "fullName");
    }

    #[test]
    fn test_field_alias_map() {
        let map = index().field_alias_map("Person").unwrap();
        assert_eq!(map.get("id").map(String::as_str), Some("_id"));
        assert_eq!(map.get("fullName").map(String::as_str), Some("name"));
        assert!(!map.contains_key("friends"));
        assert!(!map.contains_key("friendCount"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = SchemaIndex::parse("type T { a: ID @id b: ID @id }").unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::DuplicateIdField { .. })
        ));
    }

    #[test]
    fn test_invalid_relationship_direction() {
        let idx = SchemaIndex::parse(
            "type A { b: A @relationship(type: \"x\", direction: SIDEWAYS) }",
        )
        .unwrap();
        assert!(matches!(
            idx.resolve_field("A", "b"),
            Err(Error::Schema(SchemaError::InvalidDirective { .. }))
        ));
    }
}
