//! Schema command.

use std::path::Path;

use anyhow::{Result, bail};
use comfy_table::Cell;
use cypherql_engine::SchemaIndex;
use cypherql_engine::schema::{FieldDescriptor, FieldKind};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// One object type and its resolved fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeOutput {
    name: String,
    alias: String,
    fields: Vec<FieldDescriptor>,
}

/// Run the schema command.
pub fn run(path: &Path, type_name: Option<&str>, format: OutputFormat, quiet: bool) -> Result<()> {
    let schema = super::load_schema(path)?;
    let types = describe_types(&schema, type_name)?;

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&types, quiet)?,
        Format::Table => {
            for ty in &types {
                output::status(&format!("{} (label `{}`)", ty.name, ty.alias), quiet);
                if quiet {
                    continue;
                }
                let mut table = output::create_table();
                output::add_header(&mut table, &["Field", "Type", "Stored As", "Kind"]);
                for field in &ty.fields {
                    let graph_type = if field.is_array {
                        format!("[{}]", field.graph_type)
                    } else {
                        field.graph_type.clone()
                    };
                    table.add_row(vec![
                        Cell::new(&field.name),
                        Cell::new(graph_type),
                        Cell::new(&field.alias),
                        Cell::new(kind_label(&field.kind)),
                    ]);
                }
                println!("{table}\n");
            }
        }
    }

    Ok(())
}

/// Object types other than the operation roots, or the single requested type.
fn describe_types(schema: &SchemaIndex, only: Option<&str>) -> Result<Vec<TypeOutput>> {
    let names: Vec<&str> = match only {
        Some(name) => {
            if !schema.is_object_type(name) {
                bail!("'{name}' is not an object type of this schema");
            }
            vec![name]
        }
        None => schema
            .document()
            .types
            .iter()
            .map(|t| t.name.as_str())
            .filter(|n| schema.is_object_type(n) && !matches!(*n, "Query" | "Mutation"))
            .collect(),
    };

    names
        .into_iter()
        .map(|name| -> Result<TypeOutput> {
            let td = schema.get_type(name).map(|t| &t.fields);
            let fields = td
                .into_iter()
                .flatten()
                .map(|f| schema.resolve_field(name, &f.name))
                .collect::<cypherql_common::Result<Vec<_>>>()?;
            Ok(TypeOutput {
                name: name.to_string(),
                alias: schema.type_alias(name)?,
                fields,
            })
        })
        .collect()
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Plain => "property".to_string(),
        FieldKind::Identity => "@id".to_string(),
        FieldKind::Relationship {
            edge_type,
            direction,
        } => format!("{direction} :{edge_type}"),
        FieldKind::Overridden { .. } => "@graphQuery".to_string(),
    }
}
