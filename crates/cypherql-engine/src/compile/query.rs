//! Query Synthesizer: read operations and root override fragments.

use super::CompiledQuery;
use super::builder::Closing;
use super::context::CompileContext;
use super::literal::raw_text;
use crate::schema::QueryRootInfo;
use cypherql_adapters::query::graphql::Field;
use cypherql_adapters::query::template::substitute_placeholders;
use cypherql_common::QueryLanguage;
use cypherql_common::utils::error::{CompileError, Result};
use indexmap::IndexMap;

/// Compiles a root query field without an override fragment.
pub(super) fn synthesize(mut ctx: CompileContext<'_>, root: &QueryRootInfo, field: &Field) -> Result<CompiledQuery> {
    if !root.return_is_object {
        return Err(CompileError::UnresolvedType {
            type_name: root.return_type.clone(),
        }
        .into());
    }
    if field.selection_set.is_empty() {
        return Err(CompileError::EmptySelection {
            operation: root.name.clone(),
        }
        .into());
    }

    let path = &root.path_name;
    let filter = ctx.filter(path, &root.return_type, &root.args, &field.arguments)?;
    ctx.builder.push_match(format!(
        "MATCH ({path}:`{}`{}){}",
        root.return_type_alias, filter.properties, filter.where_id
    ));
    project_root(ctx, root, field, path)
}

/// Compiles a root field (query or mutation) carrying an override fragment.
///
/// A fragment starting with `g.` is a Gremlin script and is passed through
/// with the arguments substituted. With a scalar return type the openCypher
/// fragment is the whole statement. Otherwise its body is inlined and the
/// selection projected after it: a fragment without `RETURN` binds the root
/// as `this`, and one returning a variable binds the root to that variable.
pub(super) fn synthesize_override(
    mut ctx: CompileContext<'_>,
    root: &QueryRootInfo,
    field: &Field,
    fragment: &str,
) -> Result<CompiledQuery> {
    let path = &root.path_name;

    if fragment.trim_start().starts_with("g.") {
        let query = substitute_placeholders(fragment, |name| field.argument(name).map(raw_text));
        let fields_alias = if root.return_is_object {
            Some(ctx.schema.field_alias_map(&root.return_type)?)
        } else {
            None
        };
        return Ok(CompiledQuery {
            query,
            language: QueryLanguage::Gremlin,
            parameters: IndexMap::new(),
            fields_alias,
        });
    }

    let fragment = ctx.parse_fragment(fragment, field)?;
    if !root.return_is_object || field.selection_set.is_empty() {
        let query = fragment
            .rename_variables(|v| (v == "this").then(|| path.clone()))
            .to_string();
        return Ok(CompiledQuery::cypher(query, IndexMap::new()));
    }

    let (body, returned) = match fragment.split_return() {
        None if fragment.mentions("this") => (fragment, None),
        None => {
            return Err(CompileError::InvalidFragment {
                field_name: field.name.clone(),
                message: "fragment needs a top-level RETURN or a `this` node".to_string(),
            }
            .into());
        }
        Some((body, tail)) => match tail.as_variable() {
            Some(var) => (body, Some(var.to_string())),
            None => {
                return Err(CompileError::InvalidFragment {
                    field_name: field.name.clone(),
                    message: format!("an object field must return a single node variable, not '{tail}'"),
                }
                .into());
            }
        },
    };

    // The returned node takes the root path; `this` keeps a distinct name
    let this = match returned.as_deref() {
        Some(var) if var != "this" => format!("{path}_this"),
        _ => path.clone(),
    };
    let body = body.rename_variables(|v| {
        if v == "this" {
            Some(this.clone())
        } else if returned.as_deref() == Some(v) {
            Some(path.clone())
        } else {
            None
        }
    });
    if !body.is_empty() {
        ctx.builder.push_match(body.to_string());
    }
    project_root(ctx, root, field, path)
}

/// Opens the root frame, projects the selection, and renders the statement.
fn project_root(mut ctx: CompileContext<'_>, root: &QueryRootInfo, field: &Field, path: &str) -> Result<CompiledQuery> {
    let limit = root.limit;
    if let Some(n) = limit {
        ctx.builder.push_match(format!("WITH {path} LIMIT {n}"));
    }

    let frame = ctx.builder.open_frame(
        path,
        Closing::Root {
            array: root.return_is_array,
            limit: limit.filter(|_| root.return_is_array),
            limit_one: !root.return_is_array,
        },
    );
    ctx.project_selection(&root.return_type, path, frame, &field.selection_set, 1)?;

    let (query, parameters) = ctx.builder.finish();
    Ok(CompiledQuery::cypher(query, parameters))
}
