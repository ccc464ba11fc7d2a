//! Conversion from the GraphQL parser's executable tree to [`Document`].

use super::ast::{
    Document, Field, FragmentDefinition, InlineFragment, OperationDefinition, Selection,
    SelectionSet,
};
use super::values::{const_to_json, value_to_json};
use async_graphql_parser::Positioned;
use async_graphql_parser::types::{self as ast, OperationType};
use async_graphql_value::Name;
use cypherql_common::OperationKind;
use cypherql_common::utils::error::{ParseError, ParseKind, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Parses an executable document, inlining `variables` into argument values.
///
/// Variables missing from `variables` fall back to the declared default of
/// the operation being converted, then to `null`. Fragment definitions are
/// converted once per operation for the same reason. Fields excluded by
/// `@skip(if: true)` or `@include(if: false)` are dropped.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text is not a valid executable document or
/// it contains a subscription.
pub fn parse(source: &str, variables: &Map<String, Value>) -> Result<Document> {
    let doc = async_graphql_parser::parse_query(source)
        .map_err(|e| ParseError::new(ParseKind::Operation, e.to_string()))?;

    let mut operations = Vec::new();
    for (name, op) in doc.operations.iter() {
        operations.push(convert_operation(name, &op.node, &doc, variables)?);
    }
    // Multiple named operations come out of a hash map
    operations.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Document { operations })
}

fn convert_operation(
    name: Option<&Name>,
    op: &ast::OperationDefinition,
    doc: &ast::ExecutableDocument,
    variables: &Map<String, Value>,
) -> Result<OperationDefinition> {
    let kind = match op.ty {
        OperationType::Query => OperationKind::Query,
        OperationType::Mutation => OperationKind::Mutation,
        OperationType::Subscription => {
            return Err(ParseError::new(
                ParseKind::Operation,
                "subscriptions cannot be compiled to a graph query",
            )
            .into());
        }
    };

    let defaults: IndexMap<String, Value> = op
        .variable_definitions
        .iter()
        .filter_map(|def| {
            def.node
                .default_value
                .as_ref()
                .map(|v| (def.node.name.node.to_string(), const_to_json(v.node.clone())))
        })
        .collect();

    let resolve = |var: &Name| {
        variables
            .get(var.as_str())
            .or_else(|| defaults.get(var.as_str()))
            .cloned()
            .unwrap_or(Value::Null)
    };

    Ok(OperationDefinition {
        name: name.map(ToString::to_string),
        kind,
        selection_set: convert_selection_set(&op.selection_set.node, &resolve),
        fragments: convert_fragments(doc, &resolve),
    })
}

/// Converts every fragment definition, sorted by name.
fn convert_fragments(
    doc: &ast::ExecutableDocument,
    resolve: &impl Fn(&Name) -> Value,
) -> IndexMap<String, FragmentDefinition> {
    let mut fragments: Vec<FragmentDefinition> = doc
        .fragments
        .iter()
        .map(|(name, frag)| FragmentDefinition {
            name: name.to_string(),
            type_condition: frag.node.type_condition.node.on.node.to_string(),
            selection_set: convert_selection_set(&frag.node.selection_set.node, resolve),
        })
        .collect();
    fragments.sort_by(|a, b| a.name.cmp(&b.name));
    fragments.into_iter().map(|f| (f.name.clone(), f)).collect()
}

fn convert_selection_set(set: &ast::SelectionSet, resolve: &impl Fn(&Name) -> Value) -> SelectionSet {
    let selections = set
        .items
        .iter()
        .filter(|item| is_included(selection_directives(&item.node), resolve))
        .map(|item| match &item.node {
            ast::Selection::Field(field) => Selection::Field(convert_field(&field.node, resolve)),
            ast::Selection::FragmentSpread(spread) => {
                Selection::FragmentSpread(spread.node.fragment_name.node.to_string())
            }
            ast::Selection::InlineFragment(inline) => Selection::InlineFragment(InlineFragment {
                type_condition: inline
                    .node
                    .type_condition
                    .as_ref()
                    .map(|tc| tc.node.on.node.to_string()),
                selection_set: convert_selection_set(&inline.node.selection_set.node, resolve),
            }),
        })
        .collect();

    SelectionSet { selections }
}

fn convert_field(field: &ast::Field, resolve: &impl Fn(&Name) -> Value) -> Field {
    Field {
        alias: field.alias.as_ref().map(|a| a.node.to_string()),
        name: field.name.node.to_string(),
        arguments: field
            .arguments
            .iter()
            .map(|(name, value)| (name.node.to_string(), value_to_json(value.node.clone(), resolve)))
            .collect(),
        selection_set: convert_selection_set(&field.selection_set.node, resolve),
    }
}

fn selection_directives(selection: &ast::Selection) -> &[Positioned<ast::Directive>] {
    match selection {
        ast::Selection::Field(f) => &f.node.directives,
        ast::Selection::FragmentSpread(s) => &s.node.directives,
        ast::Selection::InlineFragment(i) => &i.node.directives,
    }
}

fn is_included(directives: &[Positioned<ast::Directive>], resolve: &impl Fn(&Name) -> Value) -> bool {
    directives.iter().all(|d| {
        let condition = || {
            d.node
                .arguments
                .iter()
                .find(|(name, _)| name.node.as_str() == "if")
                .map(|(_, v)| value_to_json(v.node.clone(), resolve))
                .and_then(|v| v.as_bool())
        };
        match d.node.name.node.as_str() {
            "skip" => condition() != Some(true),
            "include" => condition() != Some(false),
            _ => true,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_vars() -> Map<String, Value> {
        Map::new()
    }

    #[test]
    fn test_parse_simple_query() {
        let doc = parse("query { getPerson(filter: {name: \"A\"}) { _id name } }", &no_vars()).unwrap();
        let op = doc.operation(None).unwrap();
        assert_eq!(op.kind, OperationKind::Query);

        let root = op.root_field().unwrap();
        assert_eq!(root.name, "getPerson");
        assert_eq!(root.argument("filter"), Some(&json!({"name": "A"})));
        assert_eq!(root.selection_set.selections.len(), 2);
    }

    #[test]
    fn test_parse_inlines_variables() {
        let mut vars = Map::new();
        vars.insert("id".to_string(), json!("42"));
        let doc = parse(
            "mutation Del($id: ID!, $n: Int = 3) { deleteNodePerson(_id: $id, n: $n, x: $missing) }",
            &vars,
        )
        .unwrap();
        let op = doc.operation(Some("Del")).unwrap();
        assert_eq!(op.kind, OperationKind::Mutation);

        let root = op.root_field().unwrap();
        assert_eq!(root.argument("_id"), Some(&json!("42")));
        assert_eq!(root.argument("n"), Some(&json!(3)));
        assert_eq!(root.argument("x"), Some(&Value::Null));
    }

    #[test]
    fn test_parse_aliases_and_fragments() {
        let doc = parse(
            r#"
            query { me: getPerson { ...PersonFields ... on Person { age } } }
            fragment PersonFields on Person { name }
            "#,
            &no_vars(),
        )
        .unwrap();
        let op = doc.operation(None).unwrap();
        let root = op.root_field().unwrap();
        assert_eq!(root.response_key(), "me");
        assert!(matches!(
            &root.selection_set.selections[0],
            Selection::FragmentSpread(name) if name == "PersonFields"
        ));
        assert_eq!(op.fragments["PersonFields"].type_condition, "Person");
    }

    #[test]
    fn test_fragments_use_operation_defaults() {
        let source = r#"
            query A($c: String = "SFO") { getPerson { ...Friends } }
            query B($c: String = "JFK") { getPerson { ...Friends } }
            fragment Friends on Person { friends(code: $c) { name } }
        "#;
        let doc = parse(source, &no_vars()).unwrap();
        let code = |op: &str| {
            let Selection::Field(friends) = &doc.operation(Some(op)).unwrap().fragments["Friends"]
                .selection_set
                .selections[0]
            else {
                panic!("expected a field");
            };
            friends.argument("code").cloned()
        };
        assert_eq!(code("A"), Some(json!("SFO")));
        assert_eq!(code("B"), Some(json!("JFK")));

        let mut vars = Map::new();
        vars.insert("c".to_string(), json!("LAX"));
        let doc = parse(source, &vars).unwrap();
        let op = doc.operation(Some("A")).unwrap();
        let Selection::Field(friends) = &op.fragments["Friends"].selection_set.selections[0] else {
            panic!("expected a field");
        };
        assert_eq!(friends.argument("code"), Some(&json!("LAX")));
    }

    #[test]
    fn test_parse_skip_and_include() {
        let mut vars = Map::new();
        vars.insert("hide".to_string(), json!(true));
        let doc = parse(
            "query($hide: Boolean) { getPerson { name @skip(if: $hide) age @include(if: true) } }",
            &vars,
        )
        .unwrap();
        let root = doc.operation(None).unwrap().root_field().unwrap();
        assert_eq!(root.selection_set.selections.len(), 1);
        assert!(matches!(&root.selection_set.selections[0], Selection::Field(f) if f.name == "age"));
    }

    #[test]
    fn test_parse_rejects_subscription() {
        assert!(parse("subscription { onPerson { name } }", &no_vars()).is_err());
    }
}
