//! Mutation Synthesizer: the six write templates.

use super::CompiledQuery;
use super::builder::Closing;
use super::context::CompileContext;
use super::naming::{MutationConvention, MutationName, MutationShape};
use crate::schema::{ArgDescriptor, QueryRootInfo};
use cypherql_adapters::query::graphql::Field;
use cypherql_common::utils::error::{CompileError, Result};
use serde_json::{Map, Value};

/// Compiles a root mutation field without an override fragment.
pub(super) fn synthesize(
    mut ctx: CompileContext<'_>,
    convention: &MutationConvention,
    root: &QueryRootInfo,
    field: &Field,
) -> Result<CompiledQuery> {
    let Some(MutationName { shape, type_name }) = convention.classify(&root.name) else {
        return Err(CompileError::UnsupportedMutationShape {
            field_name: root.name.clone(),
            reason: "the name matches no mutation convention and the field has no @graphQuery"
                .to_string(),
        }
        .into());
    };
    tracing::debug!(field = %root.name, ?shape, type_name = %type_name, "mutation template");

    let args = MutationArgs::new(&ctx, root, field)?;
    let p = root.path_name.as_str();

    match shape {
        MutationShape::CreateNode => {
            let label = label_for(&ctx, &type_name);
            let mut props = Vec::new();
            for (k, v, arg) in args.input_fields() {
                if arg.is_some_and(|a| a.is_id) {
                    continue;
                }
                let param = ctx.builder.bind_param(&format!("{p}_{k}"), v.clone());
                props.push(format!("{}: ${param}", property(k, arg)));
            }
            let props = if props.is_empty() {
                String::new()
            } else {
                format!(" {{{}}}", props.join(", "))
            };
            ctx.builder.push_match(format!("CREATE ({p}:`{label}`{props})"));
            project_written(ctx, root, field)
        }
        MutationShape::UpdateNode => {
            let (id_name, id) = args.node_id(&ctx, root, false)?;
            let param = ctx.builder.bind_param(&format!("{p}_whereId"), id);
            ctx.builder
                .push_match(format!("MATCH ({p}) WHERE ID({p}) = ${param}"));
            set_clause(&mut ctx, p, &args, Some(&id_name));
            project_written(ctx, root, field)
        }
        MutationShape::DeleteNode => {
            let (_, id) = args.node_id(&ctx, root, true)?;
            let param = ctx.builder.bind_param(&format!("{p}_whereId"), id);
            ctx.builder
                .push_match(format!("MATCH ({p}) WHERE ID({p}) = ${param}"));
            ctx.builder.push_match(format!("DETACH DELETE {p}"));
            let (query, parameters) = ctx.builder.finish_returning("true");
            Ok(CompiledQuery::cypher(query, parameters))
        }
        MutationShape::ConnectEdge => {
            let label = label_for(&ctx, &type_name);
            let (from, to) = args.endpoints(root)?;
            let from = ctx.builder.bind_param(&format!("{p}_whereFromId"), from);
            let to = ctx.builder.bind_param(&format!("{p}_whereToId"), to);
            ctx.builder.push_match(format!(
                "MATCH ({p}_from), ({p}_to) WHERE ID({p}_from) = ${from} AND ID({p}_to) = ${to}"
            ));

            let mut props = Vec::new();
            for (k, v, arg) in args.input_fields() {
                if arg.is_some_and(|a| a.is_id) {
                    continue;
                }
                let param = ctx.builder.bind_param(&format!("{p}_{k}"), v.clone());
                props.push(format!("{}: ${param}", property(k, arg)));
            }
            let props = if props.is_empty() {
                String::new()
            } else {
                format!("{{{}}}", props.join(", "))
            };
            ctx.builder.push_match(format!(
                "CREATE ({p}_from)-[{p}:`{label}`{props}]->({p}_to)"
            ));
            project_written(ctx, root, field)
        }
        MutationShape::UpdateEdge => {
            let label = label_for(&ctx, &type_name);
            let condition = edge_condition(&mut ctx, p, &args, root)?;
            ctx.builder.push_match(format!(
                "MATCH ({p}_from)-[{p}:`{label}`]->({p}_to) WHERE {condition}"
            ));
            set_clause(&mut ctx, p, &args, None);
            project_written(ctx, root, field)
        }
        MutationShape::DeleteEdge => {
            let label = label_for(&ctx, &type_name);
            let condition = edge_condition(&mut ctx, p, &args, root)?;
            ctx.builder.push_match(format!(
                "MATCH ({p}_from)-[{p}:`{label}`]->({p}_to) WHERE {condition}"
            ));
            ctx.builder.push_match(format!("DELETE {p}"));
            let (query, parameters) = ctx.builder.finish_returning("true");
            Ok(CompiledQuery::cypher(query, parameters))
        }
    }
}

/// Projects the written node or edge, or returns its identity when nothing
/// is selected.
fn project_written(mut ctx: CompileContext<'_>, root: &QueryRootInfo, field: &Field) -> Result<CompiledQuery> {
    let p = root.path_name.as_str();
    if field.selection_set.is_empty() || !root.return_is_object {
        let (query, parameters) = ctx.builder.finish_returning(&format!("ID({p})"));
        return Ok(CompiledQuery::cypher(query, parameters));
    }

    let write_end = ctx.builder.match_count();
    let frame = ctx.builder.open_frame(
        p,
        Closing::Root {
            array: false,
            limit: None,
            limit_one: false,
        },
    );
    ctx.project_selection(&root.return_type, p, frame, &field.selection_set, 1)?;
    if ctx.builder.match_count() > write_end {
        ctx.builder.insert_match(write_end, format!("WITH {p}"));
    }

    let (query, parameters) = ctx.builder.finish();
    Ok(CompiledQuery::cypher(query, parameters))
}

fn set_clause(ctx: &mut CompileContext<'_>, p: &str, args: &MutationArgs<'_>, skip: Option<&str>) {
    let mut sets = Vec::new();
    for (k, v, arg) in args.input_fields() {
        if Some(k) == skip || arg.is_some_and(|a| a.is_id) {
            continue;
        }
        let param = ctx.builder.bind_param(&format!("{p}_{k}"), v.clone());
        sets.push(format!("{p}.`{}` = ${param}", property(k, arg)));
    }
    if !sets.is_empty() {
        ctx.builder.push_match(format!("SET {}", sets.join(", ")));
    }
}

/// `ID(from) = .. AND ID(to) = ..`, or `ID(edge) = ..` when the edge is
/// addressed by its own identity.
fn edge_condition(
    ctx: &mut CompileContext<'_>,
    p: &str,
    args: &MutationArgs<'_>,
    root: &QueryRootInfo,
) -> Result<String> {
    match args.endpoints(root) {
        Ok((from, to)) => {
            let from = ctx.builder.bind_param(&format!("{p}_whereFromId"), from);
            let to = ctx.builder.bind_param(&format!("{p}_whereToId"), to);
            Ok(format!("ID({p}_from) = ${from} AND ID({p}_to) = ${to}"))
        }
        Err(missing) => match args.top_level_id() {
            Some((_, id)) => {
                let param = ctx.builder.bind_param(&format!("{p}_whereId"), id);
                Ok(format!("ID({p}) = ${param}"))
            }
            None => Err(missing),
        },
    }
}

/// Graph label for the written type: the named type's alias when the
/// schema declares it, else the name itself.
fn label_for(ctx: &CompileContext<'_>, type_name: &str) -> String {
    match ctx.schema.get_type(type_name) {
        Some(_) => ctx
            .schema
            .type_alias(type_name)
            .unwrap_or_else(|_| type_name.to_string()),
        None => type_name.to_string(),
    }
}

fn property<'s>(name: &'s str, arg: Option<&'s ArgDescriptor>) -> &'s str {
    arg.map_or(name, ArgDescriptor::property)
}

/// The supplied arguments of a mutation, with the input object resolved
/// against its declared type.
struct MutationArgs<'f> {
    field: &'f Field,
    declared: &'f [ArgDescriptor],
    input: Option<&'f Map<String, Value>>,
    input_args: Vec<ArgDescriptor>,
}

impl<'f> MutationArgs<'f> {
    fn new(ctx: &CompileContext<'_>, root: &'f QueryRootInfo, field: &'f Field) -> Result<Self> {
        let input = field
            .arguments
            .iter()
            .find_map(|(name, value)| value.as_object().map(|obj| (name, obj)));
        let input_args = match input.and_then(|(name, _)| root.args.iter().find(|a| &a.name == name)) {
            Some(arg) if ctx.schema.get_type(&arg.graph_type).is_some() => {
                ctx.schema.resolve_input_args(&arg.graph_type)?
            }
            _ => Vec::new(),
        };
        Ok(Self {
            field,
            declared: &root.args,
            input: input.map(|(_, obj)| obj),
            input_args,
        })
    }

    /// Non-null fields of the input object with their declarations.
    fn input_fields(&self) -> impl Iterator<Item = (&str, &Value, Option<&ArgDescriptor>)> {
        self.input
            .into_iter()
            .flat_map(|obj| obj.iter())
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v, self.input_args.iter().find(|a| &a.name == k)))
    }

    /// A top-level argument marked `@id`, else the first supplied `ID` argument.
    fn top_level_id(&self) -> Option<(String, Value)> {
        let supplied = |a: &&ArgDescriptor| {
            self.field
                .argument(&a.name)
                .is_some_and(|v| !v.is_null() && !v.is_object())
        };
        self.declared
            .iter()
            .filter(supplied)
            .find(|a| a.is_id)
            .or_else(|| self.declared.iter().filter(supplied).find(|a| a.graph_type == "ID"))
            .and_then(|a| Some((a.name.clone(), self.field.argument(&a.name)?.clone())))
    }

    /// Identity of the node being updated or deleted.
    ///
    /// Looks at top-level arguments first, then at the input object's `@id`
    /// field, its field named like the type's identity field, or its first
    /// `ID` field. With `first_fallback` the first supplied scalar argument
    /// is used as a last resort.
    fn node_id(&self, ctx: &CompileContext<'_>, root: &QueryRootInfo, first_fallback: bool) -> Result<(String, Value)> {
        if let Some(found) = self.top_level_id() {
            return Ok(found);
        }

        let identity = ctx.schema.identity_field(&root.return_type);
        let from_input = self
            .input_fields()
            .find(|(_, _, a)| a.is_some_and(|a| a.is_id))
            .or_else(|| self.input_fields().find(|(k, _, _)| Some(*k) == identity))
            .or_else(|| {
                self.input_fields()
                    .find(|(_, _, a)| a.is_some_and(|a| a.graph_type == "ID"))
            });
        if let Some((k, v, _)) = from_input {
            return Ok((k.to_string(), v.clone()));
        }

        if first_fallback
            && let Some((k, v)) = self.field.arguments.iter().find(|(_, v)| !v.is_null())
        {
            let v = match v {
                Value::Object(obj) => obj.values().find(|v| !v.is_null()).cloned().unwrap_or(Value::Null),
                other => other.clone(),
            };
            return Ok((k.clone(), v));
        }

        Err(CompileError::MissingArgument {
            field_name: root.name.clone(),
            argument: root.id_arg_name.clone().unwrap_or_else(|| "id".to_string()),
        }
        .into())
    }

    /// Identities of the edge's endpoints: arguments named `from*`/`to*`,
    /// else the first and second supplied `ID` arguments.
    fn endpoints(&self, root: &QueryRootInfo) -> Result<(Value, Value)> {
        let named = |prefix: &str| {
            self.field
                .arguments
                .iter()
                .find(|(k, v)| k.starts_with(prefix) && !v.is_null() && !v.is_object())
                .map(|(_, v)| v.clone())
        };
        let mut rest = self
            .declared
            .iter()
            .filter(|a| a.graph_type == "ID" && !a.name.starts_with("from") && !a.name.starts_with("to"))
            .filter_map(|a| self.field.argument(&a.name))
            .filter(|v| !v.is_null());

        let from = named("from").or_else(|| rest.next().cloned());
        let to = named("to").or_else(|| rest.next().cloned());
        match (from, to) {
            (Some(from), Some(to)) => Ok((from, to)),
            (None, _) => Err(missing(root, "from")),
            (_, None) => Err(missing(root, "to")),
        }
    }
}

fn missing(root: &QueryRootInfo, argument: &str) -> cypherql_common::Error {
    CompileError::MissingArgument {
        field_name: root.name.clone(),
        argument: argument.to_string(),
    }
    .into()
}
