//! Runs the `cypherql` binary against files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

const SDL: &str = r#"
type Person @alias(property: "person") {
    _id: ID! @id
    name: String @alias(property: "fullName")
    friends: [Person] @relationship(type: "knows", direction: OUT)
}

type Query {
    getPerson(_id: ID @id): Person
}

type Mutation {
    deleteNodePerson(_id: ID! @id): Boolean
}
"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn cypherql(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cypherql"))
        .args(args)
        .output()
        .unwrap()
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn compile_prints_json() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);

    let out = cypherql(&[
        "--format",
        "json",
        "-q",
        "compile",
        "--schema",
        path(&schema),
        r#"mutation { deleteNodePerson(_id: "42") }"#,
    ]);
    assert!(out.status.success());
    // quiet suppresses output entirely
    assert!(out.stdout.is_empty());

    let out = cypherql(&[
        "--format",
        "json",
        "compile",
        "--schema",
        path(&schema),
        r#"mutation { deleteNodePerson(_id: "42") }"#,
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let compiled: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(compiled["language"], json!("opencypher"));
    assert_eq!(compiled["parameters"]["deleteNodePerson_Boolean_whereId"], json!("42"));
    assert!(compiled["query"].as_str().unwrap().contains("DETACH DELETE"));
}

#[test]
fn compile_reads_operation_file_and_variables() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);
    let op = write(&dir, "op.graphql", "query Q($id: ID) { getPerson(_id: $id) { name } }");

    let out = cypherql(&[
        "--format",
        "json",
        "compile",
        "--schema",
        path(&schema),
        "--file",
        path(&op),
        "--variables",
        r#"{"id": "7"}"#,
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let compiled: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(compiled["parameters"]["getPerson_Person__id"], json!("7"));
}

#[test]
fn compile_table_shows_statement() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);

    let out = cypherql(&["compile", "--schema", path(&schema), "{ getPerson { name } }"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("MATCH (getPerson_Person:`person`)"));
    assert!(stdout.contains("opencypher"));
}

#[test]
fn compile_error_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);

    let out = cypherql(&["compile", "--schema", path(&schema), "{ getPerson { nmae } }"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("field 'nmae' not found on type 'Person'"));
    assert!(stderr.contains("name"));
}

#[test]
fn reshape_with_schema_aliases() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);
    let response = write(
        &dir,
        "response.json",
        r#"{"result": {"data": {"@type": "g:List", "@value": [
            {"@type": "g:Map", "@value": [
                {"@type": "g:T", "@value": "id"}, 1,
                {"@type": "g:T", "@value": "label"}, "person",
                "fullName", "Ann"
            ]}
        ]}}}"#,
    );

    let out = cypherql(&[
        "reshape",
        path(&response),
        "--schema",
        path(&schema),
        "--type",
        "Person",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let shaped: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(shaped, json!({"_id": 1, "type": "person", "name": "Ann"}));
}

#[test]
fn reshape_fail_policy() {
    let dir = TempDir::new().unwrap();
    let response = write(
        &dir,
        "response.json",
        r#"{"@type": "g:List", "@value": [{"@type": "g:List", "@value": [3]}]}"#,
    );

    let out = cypherql(&["reshape", path(&response), "--on-malformed", "fail"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("malformed element at index 0"));

    let out = cypherql(&["reshape", path(&response)]);
    assert!(out.status.success());
    let shaped: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(shaped, json!([]));
}

#[test]
fn schema_lists_descriptors() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "schema.graphql", SDL);

    let out = cypherql(&["--format", "json", "schema", path(&schema)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let types: Value = serde_json::from_slice(&out.stdout).unwrap();
    let types = types.as_array().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0]["name"], json!("Person"));
    assert_eq!(types[0]["alias"], json!("person"));
    assert_eq!(types[0]["fields"][1]["alias"], json!("fullName"));

    let out = cypherql(&["schema", path(&schema), "--type", "Nobody"]);
    assert!(!out.status.success());
}
