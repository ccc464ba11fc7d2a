//! End-to-end resolution through a stub executor.

use cypherql_common::QueryLanguage;
use cypherql_engine::{CompiledQuery, Compiler, Config, ExecutionError, GraphResolver, SchemaIndex};
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::sync::Arc;

const SDL: &str = r#"
    type Person {
        _id: ID! @id
        name: String
    }

    type Query {
        getPerson(_id: ID @id): Person
        gremlinPeople: [Person] @graphQuery(statement: "g.V().hasLabel('Person').valueMap(true).fold()")
    }
"#;

fn compiler() -> Compiler {
    Compiler::new(Arc::new(SchemaIndex::parse(SDL).unwrap()), Config::default()).unwrap()
}

#[test]
fn cypher_result_is_first_column_of_first_row() {
    let seen = RefCell::new(Vec::new());
    let executor = |q: &CompiledQuery| -> Result<Value, ExecutionError> {
        seen.borrow_mut().push(q.clone());
        Ok(json!({"results": [{"getPerson_Person": {"name": "Ann"}}]}))
    };
    let resolver = GraphResolver::new(compiler(), executor);

    let result = resolver.resolve(r#"{ getPerson(_id: "1") { name } }"#, &Map::new());
    assert_eq!(result, json!({"name": "Ann"}));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].language, QueryLanguage::OpenCypher);
    assert_eq!(seen[0].parameters["getPerson_Person__id"], json!("1"));
}

#[test]
fn no_rows_is_null() {
    let resolver = GraphResolver::new(compiler(), |_: &CompiledQuery| -> Result<Value, ExecutionError> {
        Ok(json!({"results": []}))
    });
    let result = resolver.resolve("{ getPerson { name } }", &Map::new());
    assert_eq!(result, Value::Null);
}

#[test]
fn gremlin_result_is_reshaped() {
    let executor = |q: &CompiledQuery| -> Result<Value, ExecutionError> {
        assert_eq!(q.language, QueryLanguage::Gremlin);
        Ok(json!({"result": {"data": {"@type": "g:List", "@value": [
            {"@type": "g:List", "@value": [
                {"@type": "g:Map", "@value": [
                    {"@type": "g:T", "@value": "id"}, "p1",
                    {"@type": "g:T", "@value": "label"}, "Person",
                    "name", "Ann"
                ]}
            ]}
        ]}}}))
    };
    let resolver = GraphResolver::new(compiler(), executor);
    let result = resolver.resolve("{ gremlinPeople { _id name } }", &Map::new());
    assert_eq!(result, json!([{"_id": "p1", "type": "Person", "name": "Ann"}]));
}

#[test]
fn execution_error_becomes_error_payload() {
    let resolver = GraphResolver::new(compiler(), |_: &CompiledQuery| -> Result<Value, ExecutionError> {
        Err(ExecutionError::new("connection refused"))
    });
    let result = resolver.resolve("{ getPerson { name } }", &Map::new());
    assert_eq!(result, json!({"error": [{"message": "connection refused"}]}));
}

#[test]
fn compile_error_becomes_error_payload() {
    let resolver = GraphResolver::new(compiler(), |_: &CompiledQuery| -> Result<Value, ExecutionError> {
        panic!("must not execute")
    });
    let result = resolver.resolve("{ getPerson { nam } }", &Map::new());
    let message = result["error"][0]["message"].as_str().unwrap();
    assert!(message.contains("field 'nam' not found on type 'Person'"));
    assert!(resolver.try_resolve("{ getPerson { nam } }", &Map::new()).is_err());
}
