use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use cypherql_engine::reshape::reshape;
use cypherql_engine::{Compiler, Config, SchemaIndex};
use indexmap::IndexMap;
use serde_json::{Map, json};

const SDL: &str = r#"
    type Person @alias(property: "person") {
        _id: ID! @id
        name: String
        age: Int
        friends(filter: PersonInput, options: Options): [Person] @relationship(type: "knows", direction: OUT)
        friendCount: Int @graphQuery(statement: "MATCH (this)-[:knows]->(f) RETURN count(f)")
    }

    input PersonInput { _id: ID @id name: String }
    input Options { limit: Int }

    type Query {
        getPerson(filter: PersonInput): Person
    }

    type Mutation {
        createNodePerson(input: PersonInput!): Person
    }
"#;

fn benchmark_compile(c: &mut Criterion) {
    let schema = Arc::new(SchemaIndex::parse(SDL).unwrap());
    let compiler = Compiler::new(schema, Config::default()).unwrap();
    let vars = Map::new();

    let flat = r#"{ getPerson(filter: {_id: "1"}) { _id name age } }"#;
    let nested = r#"{ getPerson(filter: {name: "Ann"}) {
        name
        friendCount
        friends(options: {limit: 10}) { name friends { name age friendCount } }
    } }"#;
    let create = r#"mutation { createNodePerson(input: {name: "Ann"}) { name } }"#;

    c.bench_function("compile_flat_query", |b| {
        b.iter(|| black_box(compiler.compile(flat, &vars).unwrap()));
    });
    c.bench_function("compile_nested_query", |b| {
        b.iter(|| black_box(compiler.compile(nested, &vars).unwrap()));
    });
    c.bench_function("compile_create_node", |b| {
        b.iter(|| black_box(compiler.compile(create, &vars).unwrap()));
    });
}

fn benchmark_reshape(c: &mut Criterion) {
    let aliases = IndexMap::from([("id".to_string(), "_id".to_string())]);
    let people: Vec<_> = (0..100)
        .map(|i| {
            json!({"@type": "g:Map", "@value": [
                {"@type": "g:T", "@value": "id"}, {"@type": "g:Int64", "@value": i},
                {"@type": "g:T", "@value": "label"}, "person",
                "name", format!("person-{i}")
            ]})
        })
        .collect();
    let response = json!({"@type": "g:List", "@value": [{"@type": "g:List", "@value": people}]});

    c.bench_function("reshape_100_maps", |b| {
        b.iter(|| black_box(reshape(&response, &aliases).unwrap()));
    });
}

criterion_group!(benches, benchmark_compile, benchmark_reshape);
criterion_main!(benches);
